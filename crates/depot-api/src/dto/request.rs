//! Request body and query DTOs.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// POST /api/auth/register
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// GET /api/files query parameters.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListFilesQuery {
    /// Filename substring filter.
    pub search: Option<String>,
    /// Sort key (`name_asc`, `date_desc`, ...).
    pub sort: Option<String>,
}

/// GET /api/download/{id} query parameters.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DownloadQuery {
    /// Specific version to download; current when absent.
    pub version: Option<i32>,
}

/// POST /api/delete-multiple and /api/download-zip bodies.
#[derive(Debug, Clone, Deserialize)]
pub struct FileIdsRequest {
    /// Target file ids.
    pub file_ids: Vec<Uuid>,
}

/// PUT /api/admin/users/{id}/role
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleRequest {
    /// New role, `admin` or `user`.
    pub role: String,
}

/// GET /api/logbook query parameters.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuditQuery {
    /// Filter by acting user.
    pub user_id: Option<Uuid>,
    /// Filter by action name.
    pub action: Option<String>,
    /// Entries at or after this time (RFC 3339).
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Entries before this time (RFC 3339).
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    /// `timestamp_asc` or `timestamp_desc` (default).
    pub sort_by: Option<String>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Page size.
    pub page_size: Option<u64>,
}
