//! File services: upload pipeline, deduplication, download, listing,
//! deletion, and version management.

pub mod dedup;
pub mod download;
pub mod service;
pub mod upload;
pub mod version;

pub use dedup::{DedupOutcome, DedupResolver};
pub use download::{DownloadResult, DownloadService};
pub use service::{FileInfo, FileService};
pub use upload::{UploadOutcome, UploadParams, UploadService};
pub use version::VersionService;
