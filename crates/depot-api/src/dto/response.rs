//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use depot_entity::file::{File, FileVersion};
use depot_entity::user::User;

/// Public view of a user (no credential material).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

/// POST /api/auth/login response.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

/// File summary used by listings.
#[derive(Debug, Clone, Serialize)]
pub struct FileResponse {
    pub id: Uuid,
    pub filename: String,
    pub size: i64,
    pub version: i32,
    pub is_shared: bool,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<File> for FileResponse {
    fn from(file: File) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            size: file.size_bytes,
            version: file.current_version,
            is_shared: file.share_token.is_some(),
            uploaded_at: file.created_at,
            updated_at: file.updated_at,
        }
    }
}

/// POST /api/upload response.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub file_id: Uuid,
    pub filename: String,
    pub size: i64,
    pub version: i32,
    pub deduplicated: bool,
    pub message: String,
}

/// One row of GET /api/files/{id}/versions.
#[derive(Debug, Clone, Serialize)]
pub struct VersionResponse {
    pub version: i32,
    pub size: i64,
    pub checksum_sha256: String,
    pub note: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<FileVersion> for VersionResponse {
    fn from(version: FileVersion) -> Self {
        Self {
            version: version.version_number,
            size: version.size_bytes,
            checksum_sha256: version.checksum_sha256,
            note: version.note,
            uploaded_at: version.created_at,
        }
    }
}

/// POST /api/files/{id}/share response.
#[derive(Debug, Clone, Serialize)]
pub struct ShareResponse {
    pub file_id: Uuid,
    pub share_token: String,
    pub share_url: String,
}
