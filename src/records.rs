//! The ZIP64 record set written into the package.
//!
//! Every record is a named aggregate with explicit `serialize` and
//! `serialized_size` methods; all multi-byte fields are little-endian.
//! The archive always uses the ZIP64 single-disk convention: local
//! headers carry zeroed crc/sizes (authoritative values follow in the
//! data descriptor) and central headers carry `0xFFFFFFFF` sentinels with
//! the true 64-bit values in a ZIP64 extended information extra field.

use crate::constants::*;

pub const LOCAL_FILE_HEADER_BASE_SIZE: u64 = 30;
pub const DATA_DESCRIPTOR_SIZE: u64 = 24;
pub const CENTRAL_DIRECTORY_ENTRY_BASE_SIZE: u64 = 46;
pub const ZIP64_EXTENDED_INFO_SIZE: u64 = 28;
pub const ZIP64_END_OF_CENTRAL_DIRECTORY_SIZE: u64 = 56;
pub const ZIP64_END_OF_CENTRAL_DIRECTORY_LOCATOR_SIZE: u64 = 20;
pub const END_OF_CENTRAL_DIRECTORY_SIZE: u64 = 22;

/// Little-endian append buffer the records serialize through.
#[derive(Debug)]
pub struct RecordBuilder {
    buffer: Vec<u8>,
}

impl RecordBuilder {
    pub fn with_capacity(capacity: u64) -> RecordBuilder {
        RecordBuilder {
            buffer: Vec::with_capacity(capacity as usize),
        }
    }

    pub fn write_u16(&mut self, val: u16) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u32(&mut self, val: u32) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u64(&mut self, val: u64) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_bytes(&mut self, val: &[u8]) {
        self.buffer.extend_from_slice(val);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

/// APPNOTE 4.3.7. The crc and size fields are always zero here; bit 3 of
/// the general purpose flags moves the real values into the data
/// descriptor. The name is the OPC-encoded part name.
#[derive(Debug)]
pub struct LocalFileHeader {
    name: String,
    compression_method: u16,
    offset: u64,
}

impl LocalFileHeader {
    pub fn new(name: &str, compressed: bool, offset: u64) -> LocalFileHeader {
        LocalFileHeader {
            name: name.to_owned(),
            compression_method: if compressed {
                COMPRESSION_DEFLATE
            } else {
                COMPRESSION_STORE
            },
            offset,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Archive offset the header was written at.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn compression_method(&self) -> u16 {
        self.compression_method
    }

    /// Exact byte length of the serialized header, including the
    /// variable-length name. This is the `LfhSize` the block map records.
    pub fn serialized_size(&self) -> u64 {
        LOCAL_FILE_HEADER_BASE_SIZE + self.name.len() as u64
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut header = RecordBuilder::with_capacity(self.serialized_size());
        header.write_u32(LOCAL_FILE_HEADER_SIGNATURE);
        header.write_u16(VERSION_ZIP64_FORMAT_EXTENSION);
        header.write_u16(DATA_DESCRIPTOR_FLAG);
        header.write_u16(self.compression_method);
        header.write_u16(LAST_MOD_FILE_TIME);
        header.write_u16(LAST_MOD_FILE_DATE);
        header.write_u32(0); // crc-32, in the data descriptor
        header.write_u32(0); // compressed size, in the data descriptor
        header.write_u32(0); // uncompressed size, in the data descriptor
        header.write_u16(self.name.len() as u16);
        header.write_u16(0); // extra field length
        header.write_bytes(self.name.as_bytes());
        header.into_bytes()
    }
}

/// APPNOTE 4.3.9. The descriptor is optional in general but this writer
/// always emits it, and always with 8-byte sizes per 4.3.9.3.
#[derive(Debug)]
pub struct DataDescriptor {
    pub crc: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
}

impl DataDescriptor {
    pub fn serialized_size(&self) -> u64 {
        DATA_DESCRIPTOR_SIZE
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut descriptor = RecordBuilder::with_capacity(DATA_DESCRIPTOR_SIZE);
        descriptor.write_u32(DATA_DESCRIPTOR_SIGNATURE);
        descriptor.write_u32(self.crc);
        descriptor.write_u64(self.compressed_size);
        descriptor.write_u64(self.uncompressed_size);
        descriptor.into_bytes()
    }
}

/// APPNOTE 4.5.3. Lives in the central header's extra field and holds the
/// 64-bit values the sentinel fields point at.
#[derive(Debug)]
struct Zip64ExtendedInformation {
    uncompressed_size: u64,
    compressed_size: u64,
    relative_offset: u64,
}

impl Zip64ExtendedInformation {
    fn serialized_size(&self) -> u64 {
        ZIP64_EXTENDED_INFO_SIZE
    }

    fn serialize(&self) -> Vec<u8> {
        let mut extra = RecordBuilder::with_capacity(ZIP64_EXTENDED_INFO_SIZE);
        extra.write_u16(ZIP64_EXTENDED_INFO_TAG);
        // Data size excludes the tag and size fields themselves.
        extra.write_u16((ZIP64_EXTENDED_INFO_SIZE - 4) as u16);
        extra.write_u64(self.uncompressed_size);
        extra.write_u64(self.compressed_size);
        extra.write_u64(self.relative_offset);
        extra.into_bytes()
    }
}

/// APPNOTE 4.3.12. Accumulated in memory while entries are written and
/// emitted during close.
#[derive(Debug)]
pub struct CentralDirectoryFileHeader {
    name: String,
    compression_method: u16,
    crc: u32,
    compressed_size: u64,
    uncompressed_size: u64,
    relative_offset: u64,
}

impl CentralDirectoryFileHeader {
    pub fn new(
        name: String,
        crc: u32,
        compressed_size: u64,
        uncompressed_size: u64,
        relative_offset: u64,
        compression_method: u16,
    ) -> CentralDirectoryFileHeader {
        CentralDirectoryFileHeader {
            name,
            compression_method,
            crc,
            compressed_size,
            uncompressed_size,
            relative_offset,
        }
    }

    pub fn serialized_size(&self) -> u64 {
        CENTRAL_DIRECTORY_ENTRY_BASE_SIZE + self.name.len() as u64 + ZIP64_EXTENDED_INFO_SIZE
    }

    pub fn serialize(&self) -> Vec<u8> {
        let extended_info = Zip64ExtendedInformation {
            uncompressed_size: self.uncompressed_size,
            compressed_size: self.compressed_size,
            relative_offset: self.relative_offset,
        };
        let mut header = RecordBuilder::with_capacity(self.serialized_size());
        header.write_u32(CENTRAL_DIRECTORY_ENTRY_SIGNATURE);
        header.write_u16(VERSION_ZIP64_FORMAT_EXTENSION); // version made by
        header.write_u16(VERSION_ZIP64_FORMAT_EXTENSION); // version needed
        header.write_u16(DATA_DESCRIPTOR_FLAG);
        header.write_u16(self.compression_method);
        header.write_u16(LAST_MOD_FILE_TIME);
        header.write_u16(LAST_MOD_FILE_DATE);
        header.write_u32(self.crc);
        header.write_u32(u32::MAX); // compressed size, in the zip64 extra
        header.write_u32(u32::MAX); // uncompressed size, in the zip64 extra
        header.write_u16(self.name.len() as u16);
        header.write_u16(extended_info.serialized_size() as u16);
        header.write_u16(0); // file comment length
        header.write_u16(0); // disk number start
        header.write_u16(0); // internal file attributes
        header.write_u32(0); // external file attributes
        header.write_u32(u32::MAX); // local header offset, in the zip64 extra
        header.write_bytes(self.name.as_bytes());
        header.write_bytes(&extended_info.serialize());
        header.into_bytes()
    }
}

/// APPNOTE 4.3.14.
#[derive(Debug)]
pub struct Zip64EndOfCentralDirectoryRecord {
    pub total_entries: u64,
    pub central_directory_size: u64,
    pub central_directory_offset: u64,
}

impl Zip64EndOfCentralDirectoryRecord {
    pub fn serialized_size(&self) -> u64 {
        ZIP64_END_OF_CENTRAL_DIRECTORY_SIZE
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut record = RecordBuilder::with_capacity(ZIP64_END_OF_CENTRAL_DIRECTORY_SIZE);
        record.write_u32(ZIP64_END_OF_CENTRAL_DIRECTORY_SIGNATURE);
        // Size of the record counted from the field that follows it.
        record.write_u64(ZIP64_END_OF_CENTRAL_DIRECTORY_SIZE - 12);
        record.write_u16(VERSION_ZIP64_FORMAT_EXTENSION); // version made by
        record.write_u16(VERSION_ZIP64_FORMAT_EXTENSION); // version needed
        record.write_u32(0); // number of this disk
        record.write_u32(0); // disk with the start of the central directory
        record.write_u64(self.total_entries); // entries on this disk
        record.write_u64(self.total_entries);
        record.write_u64(self.central_directory_size);
        record.write_u64(self.central_directory_offset);
        record.into_bytes()
    }
}

/// APPNOTE 4.3.15.
#[derive(Debug)]
pub struct Zip64EndOfCentralDirectoryLocator {
    pub zip64_end_of_central_directory_offset: u64,
}

impl Zip64EndOfCentralDirectoryLocator {
    pub fn serialized_size(&self) -> u64 {
        ZIP64_END_OF_CENTRAL_DIRECTORY_LOCATOR_SIZE
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut locator = RecordBuilder::with_capacity(ZIP64_END_OF_CENTRAL_DIRECTORY_LOCATOR_SIZE);
        locator.write_u32(ZIP64_END_OF_CENTRAL_DIRECTORY_LOCATOR_SIGNATURE);
        locator.write_u32(0); // disk with the zip64 end of central directory
        locator.write_u64(self.zip64_end_of_central_directory_offset);
        locator.write_u32(1); // always one disk
        locator.into_bytes()
    }
}

/// APPNOTE 4.3.16. Every legacy field is a sentinel; the zip64 locator
/// directly before this record carries the authoritative values.
#[derive(Debug)]
pub struct EndCentralDirectoryRecord;

impl EndCentralDirectoryRecord {
    pub fn serialized_size(&self) -> u64 {
        END_OF_CENTRAL_DIRECTORY_SIZE
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut record = RecordBuilder::with_capacity(END_OF_CENTRAL_DIRECTORY_SIZE);
        record.write_u32(END_OF_CENTRAL_DIRECTORY_SIGNATURE);
        record.write_u16(u16::MAX); // number of this disk
        record.write_u16(u16::MAX); // disk with the central directory
        record.write_u16(u16::MAX); // entries on this disk
        record.write_u16(u16::MAX); // total entries
        record.write_u32(u32::MAX); // central directory size
        record.write_u32(u32::MAX); // central directory offset
        record.write_u16(0); // comment length
        record.into_bytes()
    }
}
