#![allow(dead_code)]

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use msixpack::PackageBuilder;
use serde::Deserialize;
use tempfile::TempDir;

/// Write a payload tree into a scratch directory. Names use `/` as the
/// separator and are mapped to the host layout here.
pub fn stage_payload(files: &[(&str, &[u8])]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in files {
        let path = payload_path(dir.path(), name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
    dir
}

pub fn payload_path(root: &Path, name: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in name.split('/') {
        path.push(segment);
    }
    path
}

/// Pin a file's mtime so ordering assertions don't depend on how fast
/// the test staged the tree.
pub fn set_mtime(root: &Path, name: &str, unix_seconds: i64) {
    let path = payload_path(root, name);
    filetime::set_file_mtime(&path, filetime::FileTime::from_unix_time(unix_seconds, 0)).unwrap();
}

/// Build a package from the staged payload and return the scratch dir
/// holding it together with its path.
pub fn pack(payload: &Path) -> (TempDir, PathBuf) {
    let out = tempfile::tempdir().unwrap();
    let package = out.path().join("out.msix");
    PackageBuilder::new(payload, &package).build().unwrap();
    (out, package)
}

#[derive(Debug)]
pub struct EntryInfo {
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
    pub crc32: u32,
    pub method: zip::CompressionMethod,
}

/// Central-directory view of the package through an independent reader.
pub fn entries(package: &Path) -> Vec<EntryInfo> {
    let mut archive = zip::ZipArchive::new(fs::File::open(package).unwrap()).unwrap();
    (0..archive.len())
        .map(|index| {
            let entry = archive.by_index_raw(index).unwrap();
            EntryInfo {
                name: entry.name().to_owned(),
                size: entry.size(),
                compressed_size: entry.compressed_size(),
                crc32: entry.crc32(),
                method: entry.compression(),
            }
        })
        .collect()
}

pub fn entry_names(package: &Path) -> Vec<String> {
    entries(package).into_iter().map(|entry| entry.name).collect()
}

/// Decompressed bytes of one entry; the reader verifies the CRC while
/// decoding.
pub fn read_entry(package: &Path, name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(fs::File::open(package).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut contents = Vec::new();
    entry.read_to_end(&mut contents).unwrap();
    contents
}

pub fn read_blockmap(package: &Path) -> BlockMap {
    let xml = String::from_utf8(read_entry(package, "AppxBlockMap.xml")).unwrap();
    quick_xml::de::from_str(&xml).unwrap()
}

pub fn read_content_types(package: &Path) -> String {
    String::from_utf8(read_entry(package, "[Content_Types].xml")).unwrap()
}

// Deserialized shape of AppxBlockMap.xml, for assertions only.

#[derive(Debug, Deserialize)]
pub struct BlockMap {
    #[serde(rename = "@HashMethod")]
    pub hash_method: String,
    #[serde(rename = "File", default)]
    pub files: Vec<BlockMapFile>,
}

#[derive(Debug, Deserialize)]
pub struct BlockMapFile {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@Size")]
    pub size: u64,
    #[serde(rename = "@LfhSize")]
    pub lfh_size: u64,
    #[serde(rename = "Block", default)]
    pub blocks: Vec<BlockMapBlock>,
}

#[derive(Debug, Deserialize)]
pub struct BlockMapBlock {
    #[serde(rename = "@Hash")]
    pub hash: String,
    #[serde(rename = "@Size")]
    pub size: Option<u64>,
}

impl BlockMap {
    pub fn file(&self, name: &str) -> &BlockMapFile {
        self.files
            .iter()
            .find(|file| file.name == name)
            .unwrap_or_else(|| panic!("no blockmap file named {name}"))
    }
}

/// Deterministic incompressible-ish filler for store-side fixtures.
pub fn patterned_bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state >> 24) as u8
        })
        .collect()
}
