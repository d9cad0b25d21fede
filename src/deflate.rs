use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{PackError, Result};

/// Compress a whole buffer with raw deflate (no zlib wrapper).
///
/// A fresh encoder is created per buffer; no compressor state survives
/// across calls. The level matches the original packer, which always ran
/// zlib at best compression.
pub fn deflate_buffer(input: &[u8]) -> Result<Vec<u8>> {
    let out = Vec::with_capacity(input.len() / 2 + 64);
    let mut encoder = DeflateEncoder::new(out, Compression::best());
    encoder
        .write_all(input)
        .map_err(|e| PackError::Codec(format!("deflate: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| PackError::Codec(format!("deflate finish: {}", e)))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Read;

    #[test]
    fn deflate_round_trips() {
        let input = b"the quick brown fox jumps over the lazy dog".repeat(100);
        let compressed = deflate_buffer(&input).unwrap();
        assert!(compressed.len() < input.len());

        let mut decoder = flate2::read::DeflateDecoder::new(compressed.as_slice());
        let mut restored = Vec::new();
        decoder.read_to_end(&mut restored).unwrap();
        assert_eq!(restored, input);
    }

    #[test]
    fn deflate_is_raw() {
        // A zlib stream would start with a 0x78 header byte at best
        // compression; raw deflate of this input does not.
        let compressed = deflate_buffer(b"example").unwrap();
        assert_ne!(compressed[0], 0x78);
    }

    #[test]
    fn deflate_empty_buffer() {
        let compressed = deflate_buffer(&[]).unwrap();
        let mut decoder = flate2::read::DeflateDecoder::new(compressed.as_slice());
        let mut restored = Vec::new();
        decoder.read_to_end(&mut restored).unwrap();
        assert!(restored.is_empty());
    }
}
