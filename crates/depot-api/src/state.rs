//! Shared application state injected into every handler.

use depot_auth::JwtDecoder;
use depot_core::config::storage::StorageConfig;
use depot_service::audit::AuditService;
use depot_service::file::{DownloadService, FileService, UploadService, VersionService};
use depot_service::share::ShareService;
use depot_service::user::UserService;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload pipeline.
    pub upload_service: UploadService,
    /// Download paths (authorized, shared, zip).
    pub download_service: DownloadService,
    /// Listing, info, deletion.
    pub file_service: FileService,
    /// Version listing and rollback.
    pub version_service: VersionService,
    /// Share token management.
    pub share_service: ShareService,
    /// Accounts and credentials.
    pub user_service: UserService,
    /// Audit log queries.
    pub audit_service: AuditService,
    /// Access token validation.
    pub jwt_decoder: JwtDecoder,
    /// Storage limits (body size cap).
    pub storage_config: StorageConfig,
}
