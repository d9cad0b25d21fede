//! Append-only ZIP64 writer with an enforced write sequence.
//!
//! Entries go through `write_lfh` → `write_buffer`… → `write_cdh`; the
//! archive ends with `close`. Central directory headers accumulate in
//! memory and are only emitted during close, followed by the ZIP64 end
//! of central directory record, its locator and the legacy end record.

use std::path::Path;

use log::debug;

use crate::error::{PackError, Result};
use crate::records::{
    CentralDirectoryFileHeader, DataDescriptor, EndCentralDirectoryRecord, LocalFileHeader,
    Zip64EndOfCentralDirectoryLocator, Zip64EndOfCentralDirectoryRecord,
};
use crate::sink::FileSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadyForLfhOrClose,
    ReadyForBuffer,
    ReadyForBufferOrCdh,
    Closed,
}

#[derive(Debug)]
pub struct ZipWriter {
    sink: FileSink,
    state: State,
    central_directory: Vec<CentralDirectoryFileHeader>,
}

impl ZipWriter {
    /// Open the package file for writing. An empty zip would be valid,
    /// an empty package would not, but that is validated well before
    /// this point.
    pub fn create(path: &Path) -> Result<ZipWriter> {
        Ok(ZipWriter {
            sink: FileSink::create(path)?,
            state: State::ReadyForLfhOrClose,
            central_directory: Vec::new(),
        })
    }

    /// Begin an entry. The returned header is handed back through
    /// `write_cdh` once the entry's payload has been written; its
    /// `serialized_size` is what the block map records as `LfhSize`.
    pub fn write_lfh(&mut self, name: &str, compressed: bool) -> Result<LocalFileHeader> {
        if self.state != State::ReadyForLfhOrClose {
            return Err(PackError::Protocol("previous entry is still open"));
        }
        let lfh = LocalFileHeader::new(name, compressed, self.sink.offset());
        self.sink.write(&lfh.serialize())?;
        self.state = State::ReadyForBuffer;
        debug!("lfh {} at offset {}", lfh.name(), lfh.offset());
        Ok(lfh)
    }

    /// Append payload bytes for the open entry.
    pub fn write_buffer(&mut self, buffer: &[u8]) -> Result<()> {
        if self.state != State::ReadyForBuffer && self.state != State::ReadyForBufferOrCdh {
            return Err(PackError::Protocol("no entry is open"));
        }
        self.sink.write(buffer)?;
        self.state = State::ReadyForBufferOrCdh;
        Ok(())
    }

    /// Finish the open entry: verify the sink landed where the declared
    /// sizes say it should, emit the data descriptor and retain the
    /// central directory header for close.
    pub fn write_cdh(
        &mut self,
        lfh: LocalFileHeader,
        crc: u32,
        compressed_size: u64,
        uncompressed_size: u64,
    ) -> Result<()> {
        if self.state != State::ReadyForBufferOrCdh {
            return Err(PackError::Protocol("expected entry data first"));
        }
        let expected = lfh.offset() + lfh.serialized_size() + compressed_size;
        if expected != self.sink.offset() {
            return Err(PackError::Invariant(format!(
                "entry {} should end at offset {} but the sink is at {}",
                lfh.name(),
                expected,
                self.sink.offset()
            )));
        }
        let descriptor = DataDescriptor {
            crc,
            compressed_size,
            uncompressed_size,
        };
        self.sink.write(&descriptor.serialize())?;
        self.central_directory.push(CentralDirectoryFileHeader::new(
            lfh.name().to_owned(),
            crc,
            compressed_size,
            uncompressed_size,
            lfh.offset(),
            lfh.compression_method(),
        ));
        self.state = State::ReadyForLfhOrClose;
        Ok(())
    }

    /// Emit the central directory and the end-of-archive records.
    pub fn close(&mut self) -> Result<()> {
        if self.state != State::ReadyForLfhOrClose {
            return Err(PackError::Protocol("an entry is still open"));
        }
        let central_directory_offset = self.sink.offset();
        let mut central_directory_size = 0u64;
        for cdh in &self.central_directory {
            central_directory_size += cdh.serialized_size();
            self.sink.write(&cdh.serialize())?;
        }

        let zip64_record_offset = self.sink.offset();
        let zip64_record = Zip64EndOfCentralDirectoryRecord {
            total_entries: self.central_directory.len() as u64,
            central_directory_size,
            central_directory_offset,
        };
        self.sink.write(&zip64_record.serialize())?;

        let locator = Zip64EndOfCentralDirectoryLocator {
            zip64_end_of_central_directory_offset: zip64_record_offset,
        };
        self.sink.write(&locator.serialize())?;
        self.sink.write(&EndCentralDirectoryRecord.serialize())?;
        self.sink.flush()?;

        debug!(
            "closed archive: {} entries, central directory at {}",
            self.central_directory.len(),
            central_directory_offset
        );
        self.state = State::Closed;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scratch_writer(name: &str) -> (tempfile::TempDir, ZipWriter) {
        let dir = tempfile::tempdir().unwrap();
        let writer = ZipWriter::create(&dir.path().join(name)).unwrap();
        (dir, writer)
    }

    #[test]
    fn buffer_before_lfh_is_a_protocol_error() {
        let (_dir, mut writer) = scratch_writer("a.zip");
        let err = writer.write_buffer(b"data").unwrap_err();
        assert!(matches!(err, PackError::Protocol(_)));
    }

    #[test]
    fn cdh_before_buffer_is_a_protocol_error() {
        let (_dir, mut writer) = scratch_writer("b.zip");
        let lfh = writer.write_lfh("entry.bin", true).unwrap();
        let err = writer.write_cdh(lfh, 0, 0, 0).unwrap_err();
        assert!(matches!(err, PackError::Protocol(_)));
    }

    #[test]
    fn double_lfh_is_a_protocol_error() {
        let (_dir, mut writer) = scratch_writer("c.zip");
        writer.write_lfh("entry.bin", true).unwrap();
        let err = writer.write_lfh("other.bin", true).unwrap_err();
        assert!(matches!(err, PackError::Protocol(_)));
    }

    #[test]
    fn close_mid_entry_is_a_protocol_error() {
        let (_dir, mut writer) = scratch_writer("d.zip");
        writer.write_lfh("entry.bin", true).unwrap();
        let err = writer.close().unwrap_err();
        assert!(matches!(err, PackError::Protocol(_)));
    }

    #[test]
    fn mismatched_compressed_size_is_fatal() {
        let (_dir, mut writer) = scratch_writer("e.zip");
        let lfh = writer.write_lfh("entry.bin", true).unwrap();
        writer.write_buffer(b"12345").unwrap();
        let err = writer.write_cdh(lfh, 0, 99, 5).unwrap_err();
        assert!(matches!(err, PackError::Invariant(_)));
    }

    #[test]
    fn entry_then_close_walks_the_legal_sequence() {
        let (_dir, mut writer) = scratch_writer("f.zip");
        let lfh = writer.write_lfh("entry.bin", false).unwrap();
        writer.write_buffer(b"123").unwrap();
        writer.write_buffer(b"45").unwrap();
        let crc = {
            let mut hasher = crc32fast::Hasher::new();
            hasher.update(b"12345");
            hasher.finalize()
        };
        writer.write_cdh(lfh, crc, 5, 5).unwrap();
        writer.close().unwrap();
        assert!(writer.close().is_err());
    }
}
