use serde::Serialize;

use crate::error::{PackError, Result};

/// Serialize a document tree to UTF-8 XML with a declaration in front.
///
/// The declaration is emitted by hand because the serde serializer only
/// produces the element tree.
pub fn serialize_document<T: Serialize>(document: &T, standalone: bool) -> Result<Vec<u8>> {
    let body = quick_xml::se::to_string(document)
        .map_err(|e| PackError::Codec(format!("xml serialization: {}", e)))?;
    let standalone = if standalone { "yes" } else { "no" };
    let mut bytes = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"{}\"?>",
        standalone
    )
    .into_bytes();
    bytes.extend_from_slice(body.as_bytes());
    Ok(bytes)
}
