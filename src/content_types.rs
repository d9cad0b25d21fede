//! Writer for the `[Content_Types].xml` part and the static extension
//! table that drives both the advertised MIME type and the choice
//! between storing and deflating a payload file.

use std::collections::HashSet;

use serde::Serialize;

use crate::constants::{CONTENT_TYPES_NAMESPACE, OCTET_STREAM_CONTENT_TYPE};
use crate::error::Result;
use crate::xml::serialize_document;

/// Whether a payload file is deflated into the archive or stored as-is.
/// Already-compressed formats are stored; everything else deflates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionOption {
    None,
    Normal,
}

use self::CompressionOption::{None as Store, Normal as Deflate};

// Extension table, sorted for binary search. Lifted from the appx
// packaging SDK's defaults.
#[rustfmt::skip]
static EXTENSION_CONTENT_TYPES: &[(&str, &str, CompressionOption)] = &[
    ("aiff",  "audio/x-aiff", Deflate),
    ("appx",  "application/vnd.ms-appx", Store),
    ("atom",  "application/atom+xml", Deflate),
    ("au",    "audio/basic", Deflate),
    ("avi",   "video/avi", Store),
    ("b64",   "application/base64", Deflate),
    ("bmp",   "image/bmp", Deflate),
    ("c",     "text/plain", Deflate),
    ("cab",   "application/vnd.ms-cab-compressed", Store),
    ("cpp",   "text/plain", Deflate),
    ("cs",    "text/plain", Deflate),
    ("css",   "text/css", Deflate),
    ("csv",   "text/csv", Deflate),
    ("dll",   "application/x-msdownload", Deflate),
    ("doc",   "application/msword", Deflate),
    ("docm",  "application/vnd.ms-word.document.macroenabled.12", Store),
    ("docx",  "application/vnd.openxmlformats-officedocument.wordprocessingml.document", Store),
    ("dot",   "application/msword", Deflate),
    ("dotm",  "application/vnd.ms-word.document.macroenabled.12", Store),
    ("dotx",  "application/vnd.openxmlformats-officedocument.wordprocessingml.document", Store),
    ("dtd",   "application/xml-dtd", Deflate),
    ("emf",   "image/x-emf", Deflate),
    ("exe",   "application/x-msdownload", Deflate),
    ("gif",   "image/gif", Store),
    ("gz",    "application/x-gzip-compressed", Store),
    ("h",     "text/plain", Deflate),
    ("htm",   "text/html", Deflate),
    ("html",  "text/html", Deflate),
    ("ico",   "image/vnd.microsoft.icon", Deflate),
    ("java",  "application/java", Deflate),
    ("jpeg",  "image/jpeg", Store),
    ("jpg",   "image/jpeg", Store),
    ("js",    "application/x-javascript", Deflate),
    ("json",  "application/json", Deflate),
    ("m4a",   "audio/mp4", Store),
    ("mid",   "audio/mid", Deflate),
    ("mov",   "video/quicktime", Store),
    ("mp3",   "audio/mpeg", Store),
    ("mpeg",  "video/mpeg", Store),
    ("mpg",   "video/mpeg", Store),
    ("p7s",   "application/x-pkcs7-signature", Deflate),
    ("pdf",   "application/pdf", Deflate),
    ("png",   "image/png", Store),
    ("pot",   "application/vnd.ms-powerpoint", Deflate),
    ("potm",  "application/vnd.ms-powerpoint.template.macroenabled.12", Store),
    ("potx",  "application/vnd.openxmlformats-officedocument.presentationml.template", Store),
    ("ppa",   "application/vnd.ms-powerpoint", Deflate),
    ("ppam",  "application/vnd.ms-powerpoint.addin.macroenabled.12", Store),
    ("pps",   "application/vnd.ms-powerpoint", Deflate),
    ("ppsm",  "application/vnd.ms-powerpoint.slideshow.macroenabled.12", Store),
    ("ppsx",  "application/vnd.openxmlformats-officedocument.presentationml.slideshow", Store),
    ("ppt",   "application/vnd.ms-powerpoint", Deflate),
    ("pptm",  "application/vnd.ms-powerpoint.presentation.macroenabled.12", Store),
    ("pptx",  "application/vnd.openxmlformats-officedocument.presentationml.presentation", Store),
    ("ps",    "application/postscript", Deflate),
    ("rar",   "application/x-rar-compressed", Store),
    ("rss",   "application/rss+xml", Deflate),
    ("rtf",   "text/richtext", Deflate),
    ("sct",   "text/scriptlet", Deflate),
    ("smf",   "audio/mid", Deflate),
    ("soap",  "application/soap+xml", Deflate),
    ("svg",   "image/svg+xml", Deflate),
    ("tar",   "application/x-tar", Store),
    ("tif",   "image/tiff", Deflate),
    ("tiff",  "image/tiff", Deflate),
    ("txt",   "text/plain", Deflate),
    ("wav",   "audio/wav", Deflate),
    ("wma",   "audio/x-ms-wma", Store),
    ("wmf",   "image/x-wmf", Deflate),
    ("wmv",   "video/x-ms-wmv", Store),
    ("xaml",  "application/xaml+xml", Deflate),
    ("xap",   "application/x-silverlight-app", Store),
    ("xbap",  "application/x-ms-xbap", Deflate),
    ("xhtml", "application/xhtml+xml", Deflate),
    ("xla",   "application/vnd.ms-excel", Deflate),
    ("xlam",  "application/vnd.ms-excel.addin.macroenabled.12", Store),
    ("xls",   "application/vnd.ms-excel", Deflate),
    ("xlsb",  "application/vnd.ms-excel.sheet.binary.macroEnabled.12", Store),
    ("xlsm",  "application/vnd.ms-excel.sheet.macroEnabled.12", Store),
    ("xlsx",  "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet", Store),
    ("xlt",   "application/vnd.ms-excel", Deflate),
    ("xltm",  "application/vnd.ms-excel.template.macroEnabled.12", Store),
    ("xltx",  "application/vnd.openxmlformats-officedocument.spreadsheetml.template", Store),
    ("xml",   "text/xml", Deflate),
    ("xsd",   "text/xml", Deflate),
    ("xsl",   "application/xslt+xml", Deflate),
    ("xslt",  "application/xslt+xml", Deflate),
    ("zip",   "application/x-zip-compressed", Store),
];

/// Look up an extension (matched case-insensitively). A miss means the
/// caller falls back to `application/octet-stream` with deflate.
pub fn lookup_extension(extension: &str) -> Option<(&'static str, CompressionOption)> {
    let lowered = extension.to_ascii_lowercase();
    EXTENSION_CONTENT_TYPES
        .binary_search_by_key(&lowered.as_str(), |entry| entry.0)
        .ok()
        .map(|index| {
            let (_, content_type, compression) = EXTENSION_CONTENT_TYPES[index];
            (content_type, compression)
        })
}

/// MIME type and compression for an extension missing from the table.
pub fn default_classification() -> (&'static str, CompressionOption) {
    (OCTET_STREAM_CONTENT_TYPE, Deflate)
}

#[derive(Debug, Serialize)]
#[serde(rename = "Types")]
struct TypesDocument {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "Default")]
    defaults: Vec<DefaultElement>,
    #[serde(rename = "Override")]
    overrides: Vec<OverrideElement>,
}

#[derive(Debug, Serialize)]
struct DefaultElement {
    #[serde(rename = "@ContentType")]
    content_type: String,
    #[serde(rename = "@Extension")]
    extension: String,
}

#[derive(Debug, Serialize)]
struct OverrideElement {
    #[serde(rename = "@ContentType")]
    content_type: String,
    #[serde(rename = "@PartName")]
    part_name: String,
}

#[derive(Debug)]
pub struct ContentTypeWriter {
    document: TypesDocument,
    extensions: HashSet<String>,
}

impl Default for ContentTypeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTypeWriter {
    pub fn new() -> ContentTypeWriter {
        ContentTypeWriter {
            document: TypesDocument {
                xmlns: CONTENT_TYPES_NAMESPACE,
                defaults: Vec::new(),
                overrides: Vec::new(),
            },
            extensions: HashSet::new(),
        }
    }

    /// Register a `<Default>` for an extension. Repeated registrations
    /// of the same extension are dropped unless `force` is set; the
    /// manifest forces its entry so `xml` maps to the appx manifest type
    /// even when payload `.xml` files already claimed the extension.
    pub fn add_default(&mut self, content_type: &str, extension: &str, force: bool) {
        if self.extensions.insert(extension.to_owned()) || force {
            self.document.defaults.push(DefaultElement {
                content_type: content_type.to_owned(),
                extension: extension.to_owned(),
            });
        }
    }

    /// Register an `<Override>` for a specific part.
    pub fn add_override(&mut self, content_type: &str, part_name: &str) {
        self.document.overrides.push(OverrideElement {
            content_type: content_type.to_owned(),
            part_name: part_name.to_owned(),
        });
    }

    /// Serialized UTF-8 bytes of the document.
    pub fn get_dom(&self) -> Result<Vec<u8>> {
        serialize_document(&self.document, true)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::CompressionOption::{None as Store, Normal as Deflate};

    #[test]
    fn table_is_sorted_for_binary_search() {
        for pair in EXTENSION_CONTENT_TYPES.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn known_extensions_classify() {
        assert_eq!(lookup_extension("png"), Some(("image/png", Store)));
        assert_eq!(lookup_extension("txt"), Some(("text/plain", Deflate)));
        assert_eq!(lookup_extension("xml"), Some(("text/xml", Deflate)));
        assert_eq!(
            lookup_extension("zip"),
            Some(("application/x-zip-compressed", Store))
        );
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup_extension("PNG"), lookup_extension("png"));
        assert_eq!(lookup_extension("Jpeg"), lookup_extension("jpeg"));
    }

    #[test]
    fn unknown_extensions_miss() {
        assert_eq!(lookup_extension("bin"), None);
        assert_eq!(lookup_extension(""), None);
        assert_eq!(
            default_classification(),
            ("application/octet-stream", Deflate)
        );
    }

    #[test]
    fn duplicate_defaults_are_dropped() {
        let mut writer = ContentTypeWriter::new();
        writer.add_default("image/png", "png", false);
        writer.add_default("image/png", "png", false);
        let xml = String::from_utf8(writer.get_dom().unwrap()).unwrap();
        assert_eq!(xml.matches("Extension=\"png\"").count(), 1);
    }

    #[test]
    fn forced_defaults_are_always_emitted() {
        let mut writer = ContentTypeWriter::new();
        writer.add_default("text/xml", "xml", false);
        writer.add_default("application/vnd.ms-appx.manifest+xml", "xml", true);
        let xml = String::from_utf8(writer.get_dom().unwrap()).unwrap();
        assert_eq!(xml.matches("Extension=\"xml\"").count(), 2);
        assert!(xml.contains("application/vnd.ms-appx.manifest+xml"));
    }

    #[test]
    fn document_shape() {
        let mut writer = ContentTypeWriter::new();
        writer.add_default("image/png", "png", false);
        writer.add_override("application/vnd.ms-appx.blockmap+xml", "/AppxBlockMap.xml");
        let xml = String::from_utf8(writer.get_dom().unwrap()).unwrap();

        assert!(xml.starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"
        ));
        assert!(xml.contains(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#
        ));
        assert!(xml.contains(r#"<Default ContentType="image/png" Extension="png"/>"#));
        assert!(xml.contains(
            r#"<Override ContentType="application/vnd.ms-appx.blockmap+xml" PartName="/AppxBlockMap.xml"/>"#
        ));
    }
}
