//! Logical file entity model.
//!
//! A `File` is the stable, user-facing identity for a named artifact; its
//! content at any point in time lives in an immutable [`super::version::
//! FileVersion`] record. The `current_version`/`storage_path`/`size_bytes`
//! fields mirror exactly one version record: the latest upload, or the
//! rollback target after a rollback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A logical file owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The file name as uploaded (sanitized for storage separately).
    pub filename: String,
    /// The owning user.
    pub owner_id: Uuid,
    /// Version number the current pointer refers to.
    pub current_version: i32,
    /// Storage path of the current version's content.
    pub storage_path: String,
    /// Size in bytes of the current version's content.
    pub size_bytes: i64,
    /// Opaque public-share token, if the file has been shared.
    pub share_token: Option<String>,
    /// When the file was created (first upload).
    pub created_at: DateTime<Utc>,
    /// When the file was last updated (upload or rollback).
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Whether a public share token is active for this file.
    pub fn is_shared(&self) -> bool {
        self.share_token.is_some()
    }
}

/// Data required to create a new logical file record.
///
/// The id is generated by the caller before the content-store commit so
/// the versioned storage path can embed it; nothing is persisted for a
/// failed upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// Pre-generated file identifier.
    pub id: Uuid,
    /// The file name.
    pub filename: String,
    /// The owning user.
    pub owner_id: Uuid,
    /// Initial current version number.
    pub current_version: i32,
    /// Initial storage path.
    pub storage_path: String,
    /// Initial size in bytes.
    pub size_bytes: i64,
}
