//! Hash encoding and OPC part-name escaping.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::error::{PackError, Result};

/// Base64 (RFC 4648, padded) of the SHA-256 digest of `data`. This is the
/// form the block map stores for every 64 KiB chunk.
pub fn sha256_base64(data: &[u8]) -> String {
    STANDARD.encode(Sha256::digest(data))
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

// OPC reserved characters below 0x7F and their literal escapes.
fn reserved_escape(c: char) -> Option<&'static str> {
    Some(match c {
        ' ' => "%20",
        '!' => "%21",
        '#' => "%23",
        '$' => "%24",
        '%' => "%25",
        '&' => "%26",
        '\'' => "%27",
        '(' => "%28",
        ')' => "%29",
        '+' => "%2B",
        ',' => "%2C",
        ';' => "%3B",
        '=' => "%3D",
        '@' => "%40",
        '[' => "%5B",
        ']' => "%5D",
        '{' => "%7B",
        '}' => "%7D",
        _ => return None,
    })
}

/// Percent-encode a relative file name for use as an OPC part name.
///
/// Reserved ASCII characters take their literal escape, backslashes
/// become forward slashes, and anything at or above 0x80 is re-encoded as
/// UTF-8 with every byte escaped as uppercase `%HH`. The result is what
/// the ZIP local and central headers store; the block map keeps the
/// unescaped name.
pub fn encode_file_name(file_name: &str) -> Result<String> {
    if file_name.is_empty() {
        return Err(PackError::Invariant(
            "cannot encode an empty file name".to_string(),
        ));
    }
    let mut result = String::with_capacity(file_name.len());
    for c in file_name.chars() {
        if let Some(escape) = reserved_escape(c) {
            result.push_str(escape);
        } else if c == '\\' {
            result.push('/');
        } else if (c as u32) >= 0x80 {
            let mut utf8 = [0u8; 4];
            for byte in c.encode_utf8(&mut utf8).bytes() {
                result.push('%');
                result.push(HEX[(byte >> 4) as usize] as char);
                result.push(HEX[(byte & 0x0F) as usize] as char);
            }
        } else {
            result.push(c);
        }
    }
    Ok(result)
}
