use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Append-only byte sink over the package file.
///
/// The sink counts every byte it writes instead of asking the operating
/// system for the cursor; the running count is the authoritative
/// coordinate for every offset recorded in ZIP records. The handle is
/// released when the sink is dropped.
#[derive(Debug)]
pub struct FileSink {
    file: File,
    written: u64,
}

impl FileSink {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            file: File::create(path)?,
            written: 0,
        })
    }

    /// Write the whole buffer. Short writes surface as I/O errors.
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(())
    }

    /// Position the next write lands at.
    pub fn offset(&self) -> u64 {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}
