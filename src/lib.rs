//! ## Features
//!
//! - Pack a directory tree into an MSIX/APPX package: a ZIP64 archive
//!   with a generated `AppxBlockMap.xml` and `[Content_Types].xml`.
//! - Single pass, append only (the CRC and sizes are calculated while
//!   streaming and sent afterwards in data descriptors).
//! - Per-file 64 KiB blocking with SHA-256 hashes for every block, so
//!   readers can verify and stream the package chunk by chunk.
//! - Content-type classification decides per file between storing and
//!   deflating, with OPC percent-encoding of entry names.
//!
//! ## Limitations
//!
//! - Write only; reading and unpacking are out of scope.
//! - No signing (`AppxSignature.p7x` is never produced).
//! - Store and deflate are the only compression methods, per the
//!   package format.
//! - Always ZIP64, always a single logical disk.
//!
//! ## Example
//!
//! ```no_run
//! use msixpack::PackageBuilder;
//!
//! fn main() -> msixpack::Result<()> {
//!     PackageBuilder::new("./app", "./app.msix").build()
//! }
//! ```

pub mod blockmap;
pub mod builder;
pub mod constants;
pub mod content_types;
pub mod deflate;
pub mod directory;
pub mod encoding;
pub mod error;
pub mod records;
pub mod sink;
pub mod writer;
mod xml;

pub use builder::PackageBuilder;
pub use error::{PackError, Result};
