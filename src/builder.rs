//! End-to-end package construction.
//!
//! The builder enumerates the payload tree in modification-time order,
//! chunks every file into 64 KiB blocks (hashing before, deflating
//! after), writes the entries through the ZIP state machine with the
//! manifest deferred to the end, then serializes the block map and
//! content types parts and appends them as the final two entries.

use std::cmp::min;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crc32fast::Hasher;
use log::{debug, info};

use crate::blockmap::BlockMapWriter;
use crate::constants::{
    APPXBLOCKMAP_XML, APPXMANIFEST_XML, BLOCKMAP_CONTENT_TYPE, CONTENT_TYPES_XML,
    DEFAULT_BLOCK_SIZE, MANIFEST_CONTENT_TYPE,
};
use crate::content_types::{self, CompressionOption, ContentTypeWriter};
use crate::deflate::deflate_buffer;
use crate::directory;
use crate::encoding::{encode_file_name, sha256_base64};
use crate::error::{PackError, Result};
use crate::writer::ZipWriter;

/// One 64 KiB chunk of a payload file: the bytes that go into the
/// archive (raw or deflated) and the hash of the bytes before deflate.
struct Block {
    data: Vec<u8>,
    hash: String,
}

struct PayloadFile {
    relative_name: String,
    compression: CompressionOption,
    crc: u32,
    uncompressed_size: u64,
    blocks: Vec<Block>,
}

pub struct PackageBuilder {
    root: PathBuf,
    package: PathBuf,
}

impl PackageBuilder {
    pub fn new(root: impl Into<PathBuf>, package: impl Into<PathBuf>) -> PackageBuilder {
        PackageBuilder {
            root: root.into(),
            package: package.into(),
        }
    }

    pub fn build(self) -> Result<()> {
        let files = directory::list_files(&self.root)?;
        info!(
            "packing {} files from {} into {}",
            files.len(),
            self.root.display(),
            self.package.display()
        );

        let mut content_types = ContentTypeWriter::new();
        let mut payload_files = Vec::new();
        let mut manifest = None;
        for (_, relative_name) in files {
            let is_manifest = manifest.is_none() && relative_name == APPXMANIFEST_XML;
            let payload = self.process_file(relative_name, is_manifest, &mut content_types)?;
            if is_manifest {
                manifest = Some(payload);
            } else {
                payload_files.push(payload);
            }
        }
        if payload_files.is_empty() && manifest.is_none() {
            return Err(PackError::Invariant(
                "there should be some payload files".to_owned(),
            ));
        }
        let manifest = manifest
            .ok_or_else(|| PackError::Invariant("AppxManifest.xml not found".to_owned()))?;

        let mut zip = ZipWriter::create(&self.package)?;
        let mut blockmap = BlockMapWriter::new();
        for payload in &payload_files {
            write_payload_entry(&mut zip, &mut blockmap, payload)?;
        }
        // the manifest is the last payload entry
        write_payload_entry(&mut zip, &mut blockmap, &manifest)?;

        let blockmap_bytes = blockmap.get_dom()?;
        write_xml_part(&mut zip, APPXBLOCKMAP_XML, &blockmap_bytes)?;
        content_types.add_override(BLOCKMAP_CONTENT_TYPE, "/AppxBlockMap.xml");

        let content_types_bytes = content_types.get_dom()?;
        write_xml_part(&mut zip, CONTENT_TYPES_XML, &content_types_bytes)?;

        zip.close()
    }

    /// Classify a file, register its content type and read it into
    /// hashed (and possibly deflated) blocks.
    fn process_file(
        &self,
        relative_name: String,
        is_manifest: bool,
        content_types: &mut ContentTypeWriter,
    ) -> Result<PayloadFile> {
        let (extension, content_type, compression) = if is_manifest {
            (
                "xml".to_owned(),
                MANIFEST_CONTENT_TYPE,
                CompressionOption::Normal,
            )
        } else {
            // The "extension" of a dot-less name is the whole name; it
            // misses the table and packs as an octet stream.
            let extension = relative_name
                .rsplit('.')
                .next()
                .unwrap_or("")
                .to_ascii_lowercase();
            match content_types::lookup_extension(&extension) {
                Some((content_type, compression)) => (extension, content_type, compression),
                None => {
                    let (content_type, compression) = content_types::default_classification();
                    (extension, content_type, compression)
                }
            }
        };
        content_types.add_default(content_type, &extension, is_manifest);

        let mut file = File::open(self.root.join(&relative_name))?;
        let uncompressed_size = file.metadata()?.len();
        let mut hasher = Hasher::new();
        let mut blocks = Vec::new();
        let mut bytes_to_read = uncompressed_size;
        while bytes_to_read > 0 {
            let block_size = min(bytes_to_read, DEFAULT_BLOCK_SIZE);
            bytes_to_read -= block_size;

            let mut buffer = vec![0u8; block_size as usize];
            file.read_exact(&mut buffer)?;
            hasher.update(&buffer);
            let hash = sha256_base64(&buffer);

            let data = if compression == CompressionOption::Normal {
                deflate_buffer(&buffer)?
            } else {
                buffer
            };
            blocks.push(Block { data, hash });
        }
        debug!(
            "{}: {} bytes, {} blocks, {}",
            relative_name,
            uncompressed_size,
            blocks.len(),
            content_type
        );

        Ok(PayloadFile {
            relative_name,
            compression,
            crc: hasher.finalize(),
            uncompressed_size,
            blocks,
        })
    }
}

/// Write one payload file into the archive and mirror its blocks into
/// the block map. The block map gets the original relative name; the
/// archive gets the OPC-encoded one.
fn write_payload_entry(
    zip: &mut ZipWriter,
    blockmap: &mut BlockMapWriter,
    payload: &PayloadFile,
) -> Result<()> {
    let compressed = payload.compression == CompressionOption::Normal;
    let opc_name = encode_file_name(&payload.relative_name)?;
    let lfh = zip.write_lfh(&opc_name, compressed)?;

    let file_node = blockmap.add_file(
        &payload.relative_name,
        payload.uncompressed_size,
        lfh.serialized_size() as u32,
    );

    let mut stored_size = 0u64;
    for block in &payload.blocks {
        stored_size += block.data.len() as u64;
        zip.write_buffer(&block.data)?;
        // uncompressed entries omit the per-block stored size
        let block_stored_size = if compressed { block.data.len() as u64 } else { 0 };
        blockmap.add_block(file_node, block.hash.clone(), block_stored_size);
    }
    if payload.blocks.is_empty() {
        // a zero-byte file still closes through the legal write sequence
        zip.write_buffer(&[])?;
    }

    zip.write_cdh(lfh, payload.crc, stored_size, payload.uncompressed_size)
}

/// Append a generated XML part (block map or content types) as a
/// deflated entry. These parts are compressed as one buffer and never
/// appear in the block map.
fn write_xml_part(zip: &mut ZipWriter, name: &str, buffer: &[u8]) -> Result<()> {
    let lfh = zip.write_lfh(name, true)?;
    let mut hasher = Hasher::new();
    hasher.update(buffer);
    let compressed = deflate_buffer(buffer)?;
    zip.write_buffer(&compressed)?;
    zip.write_cdh(
        lfh,
        hasher.finalize(),
        compressed.len() as u64,
        buffer.len() as u64,
    )
}
