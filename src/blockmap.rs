//! Incremental writer for the `AppxBlockMap.xml` part.
//!
//! The block map associates every payload file with the base64 SHA-256
//! hashes of its 64 KiB chunks, so readers can verify and consume the
//! package block by block.

use serde::Serialize;

use crate::constants::{BLOCKMAP_HASH_METHOD, BLOCKMAP_NAMESPACE};
use crate::error::Result;
use crate::xml::serialize_document;

#[derive(Debug, Serialize)]
#[serde(rename = "BlockMap")]
struct BlockMapDocument {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "@HashMethod")]
    hash_method: &'static str,
    #[serde(rename = "File")]
    files: Vec<FileElement>,
}

#[derive(Debug, Serialize)]
struct FileElement {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "@Size")]
    size: u64,
    #[serde(rename = "@LfhSize")]
    lfh_size: u32,
    #[serde(rename = "Block")]
    blocks: Vec<BlockElement>,
}

#[derive(Debug, Serialize)]
struct BlockElement {
    #[serde(rename = "@Hash")]
    hash: String,
    #[serde(rename = "@Size", skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
}

/// Handle to a `<File>` element; only meaningful against the writer that
/// returned it.
#[derive(Debug, Clone, Copy)]
pub struct FileNode(usize);

#[derive(Debug)]
pub struct BlockMapWriter {
    document: BlockMapDocument,
}

impl Default for BlockMapWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockMapWriter {
    pub fn new() -> BlockMapWriter {
        BlockMapWriter {
            document: BlockMapDocument {
                xmlns: BLOCKMAP_NAMESPACE,
                hash_method: BLOCKMAP_HASH_METHOD,
                files: Vec::new(),
            },
        }
    }

    /// Append a `<File>` element. The block map always uses windows
    /// separators regardless of what the host produced.
    pub fn add_file(&mut self, name: &str, uncompressed_size: u64, lfh_size: u32) -> FileNode {
        self.document.files.push(FileElement {
            name: name.replace('/', "\\"),
            size: uncompressed_size,
            lfh_size,
            blocks: Vec::new(),
        });
        FileNode(self.document.files.len() - 1)
    }

    /// Append a `<Block>` to a previously added file. A `stored_size` of
    /// zero means the file is stored uncompressed and the `Size`
    /// attribute is omitted; readers then default it to 64 KiB, or the
    /// remainder of the file for the last block.
    pub fn add_block(&mut self, file: FileNode, hash: String, stored_size: u64) {
        self.document.files[file.0].blocks.push(BlockElement {
            hash,
            size: (stored_size != 0).then_some(stored_size),
        });
    }

    /// Serialized UTF-8 bytes of the document.
    pub fn get_dom(&self) -> Result<Vec<u8>> {
        serialize_document(&self.document, false)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn file_names_use_windows_separators() {
        let mut writer = BlockMapWriter::new();
        writer.add_file("Assets/Wide310x150Logo.scale-200.png", 3204, 66);
        let xml = String::from_utf8(writer.get_dom().unwrap()).unwrap();
        assert!(xml.contains(r#"Name="Assets\Wide310x150Logo.scale-200.png""#));
    }

    #[test]
    fn block_size_attribute_only_for_compressed_blocks() {
        let mut writer = BlockMapWriter::new();
        let stored = writer.add_file("a.png", 100, 35);
        writer.add_block(stored, "hashA".to_owned(), 0);
        let compressed = writer.add_file("b.txt", 100, 35);
        writer.add_block(compressed, "hashB".to_owned(), 42);
        let xml = String::from_utf8(writer.get_dom().unwrap()).unwrap();

        assert!(xml.contains(r#"<Block Hash="hashA"/>"#));
        assert!(xml.contains(r#"<Block Hash="hashB" Size="42"/>"#));
    }

    #[test]
    fn document_shape() {
        let mut writer = BlockMapWriter::new();
        let file = writer.add_file("resources.pri", 3760, 43);
        writer.add_block(file, "omadFn5zXbBfDtmAZjbjF54bh3HKZbrcD8UpBoUTiRY=".to_owned(), 1501);
        let xml = String::from_utf8(writer.get_dom().unwrap()).unwrap();

        assert!(xml.starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>"
        ));
        assert!(xml.contains(
            r#"<BlockMap xmlns="http://schemas.microsoft.com/appx/2010/blockmap" HashMethod="http://www.w3.org/2001/04/xmlenc#sha256">"#
        ));
        assert!(xml.contains(r#"<File Name="resources.pri" Size="3760" LfhSize="43">"#));
        assert!(xml.ends_with("</File></BlockMap>"));
    }

    #[test]
    fn empty_file_has_no_block_children() {
        let mut writer = BlockMapWriter::new();
        writer.add_file("empty.txt", 0, 39);
        let xml = String::from_utf8(writer.get_dom().unwrap()).unwrap();
        assert!(!xml.contains("<Block"));
        assert!(xml.contains(r#"Size="0""#));
    }
}
