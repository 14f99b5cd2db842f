//! Content store configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all stored file content.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum upload size in bytes (default 100 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Buffer size in bytes used when streaming uploads (default 1 MiB).
    #[serde(default = "default_stream_chunk")]
    pub stream_chunk_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
            stream_chunk_bytes: default_stream_chunk(),
        }
    }
}

fn default_root_path() -> String {
    "./data/storage".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MiB
}

fn default_stream_chunk() -> usize {
    1_048_576 // 1 MiB
}
