//! Signatures, versions and fixed field values shared by the ZIP records
//! and the package builder.

pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x04034b50;
pub const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x08074b50;
pub const CENTRAL_DIRECTORY_ENTRY_SIGNATURE: u32 = 0x02014b50;
pub const ZIP64_END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x06064b50;
pub const ZIP64_END_OF_CENTRAL_DIRECTORY_LOCATOR_SIGNATURE: u32 = 0x07064b50;
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x06054b50;

/// Tag of the ZIP64 extended information extra field (APPNOTE 4.5.3).
pub const ZIP64_EXTENDED_INFO_TAG: u16 = 0x0001;

/// Every record claims the ZIP64 format extension version, both as the
/// version made by and the version needed to extract.
pub const VERSION_ZIP64_FORMAT_EXTENSION: u16 = 45;

/// General purpose bit 3: crc and sizes are zero in the local header and
/// the authoritative values follow the payload in a data descriptor.
pub const DATA_DESCRIPTOR_FLAG: u16 = 1 << 3;

pub const COMPRESSION_STORE: u16 = 0;
pub const COMPRESSION_DEFLATE: u16 = 8;

// Placeholder DOS stamps. Nothing consumes the modification time of an
// MSIX entry, so every record carries the same arbitrary non-zero values.
pub const LAST_MOD_FILE_TIME: u16 = 0x4552;
pub const LAST_MOD_FILE_DATE: u16 = 0x5347;

/// Payload files are hashed and stored in chunks of this size; only the
/// last block of a file may be shorter.
pub const DEFAULT_BLOCK_SIZE: u64 = 65536;

// Well-known package part names.
pub const APPXMANIFEST_XML: &str = "AppxManifest.xml";
pub const APPXBLOCKMAP_XML: &str = "AppxBlockMap.xml";
pub const CONTENT_TYPES_XML: &str = "[Content_Types].xml";

pub const BLOCKMAP_NAMESPACE: &str = "http://schemas.microsoft.com/appx/2010/blockmap";
pub const BLOCKMAP_HASH_METHOD: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
pub const CONTENT_TYPES_NAMESPACE: &str =
    "http://schemas.openxmlformats.org/package/2006/content-types";

pub const BLOCKMAP_CONTENT_TYPE: &str = "application/vnd.ms-appx.blockmap+xml";
pub const MANIFEST_CONTENT_TYPE: &str = "application/vnd.ms-appx.manifest+xml";
pub const OCTET_STREAM_CONTENT_TYPE: &str = "application/octet-stream";
