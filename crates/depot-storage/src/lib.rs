//! # depot-storage
//!
//! Physical content storage for FileDepot: a single-root local filesystem
//! content store with path containment and atomic writes, filename
//! sanitization, and the streaming checksum engine used by the upload
//! pipeline.

pub mod checksum;
pub mod sanitize;
pub mod store;

pub use checksum::{ChecksumEngine, StreamDigest};
pub use sanitize::sanitize_filename;
pub use store::{ByteStream, ContentStore};
