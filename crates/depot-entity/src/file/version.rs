//! File version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One immutable snapshot of a logical file's content.
///
/// Version numbers are per-file, strictly increasing from 1, and never
/// reused. Records are only removed by cascade when the parent file is
/// deleted. Two records may share a `storage_path` when their content was
/// deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileVersion {
    /// Unique version identifier (UUIDv7, time-ordered).
    pub id: Uuid,
    /// The file this version belongs to.
    pub file_id: Uuid,
    /// Sequential version number within the file.
    pub version_number: i32,
    /// Path to this version's content in the content store.
    pub storage_path: String,
    /// SHA-256 checksum of the content.
    pub checksum_sha256: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Optional free-text note attached at upload time.
    pub note: Option<String>,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new version record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVersion {
    /// The file the version belongs to.
    pub file_id: Uuid,
    /// Version number to record (caller computes `max + 1` under the
    /// per-file lock).
    pub version_number: i32,
    /// Storage path backing this version.
    pub storage_path: String,
    /// SHA-256 checksum.
    pub checksum_sha256: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Optional note.
    pub note: Option<String>,
}
