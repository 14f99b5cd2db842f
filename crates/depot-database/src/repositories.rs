//! Repository traits consumed by the service layer.
//!
//! Two implementations exist for each trait: PostgreSQL ([`crate::postgres`])
//! and in-memory ([`crate::memory`]). The service layer only sees the
//! traits, so the scenario tests run against the memory variant without a
//! database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use depot_core::result::AppResult;
use depot_core::types::pagination::{PageRequest, PageResponse};
use depot_core::types::sorting::FileSortKey;
use depot_entity::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry};
use depot_entity::file::{CreateFile, File, FileVersion, NewVersion};
use depot_entity::user::{CreateUser, User, UserRole};

/// User account persistence.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Create a new user. Duplicate username or email is a `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// List all users ordered by creation time.
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Change a user's role.
    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User>;

    /// Delete a user. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Logical file persistence.
#[async_trait]
pub trait FileRepository: Send + Sync + 'static {
    /// Create a new logical file. Duplicate (owner, filename) is a
    /// `Conflict`.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Find a file by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Find a file by its owner and filename.
    async fn find_by_owner_and_name(&self, owner_id: Uuid, filename: &str)
    -> AppResult<Option<File>>;

    /// List a user's files, optionally filtered by a filename substring,
    /// ordered by the given sort key.
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        search: Option<&str>,
        sort: FileSortKey,
    ) -> AppResult<Vec<File>>;

    /// Move the file's current pointer to the given version fields.
    async fn update_current(
        &self,
        file_id: Uuid,
        version_number: i32,
        storage_path: &str,
        size_bytes: i64,
    ) -> AppResult<File>;

    /// Set or clear the public share token.
    async fn set_share_token(&self, file_id: Uuid, token: Option<&str>) -> AppResult<File>;

    /// Resolve a file from its public share token.
    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<File>>;

    /// Delete a file (version records cascade). Returns `true` if a row
    /// was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Version ledger persistence.
///
/// Version records are immutable once appended; the only removal path is
/// the cascade from file deletion.
#[async_trait]
pub trait VersionRepository: Send + Sync + 'static {
    /// Next version number for a file: `max + 1`, or 1 if none exist.
    async fn next_version_number(&self, file_id: Uuid) -> AppResult<i32>;

    /// Append a version record. A duplicate `(file_id, version_number)`
    /// is a `Conflict`.
    async fn append(&self, data: &NewVersion) -> AppResult<FileVersion>;

    /// All versions of a file, ascending by version number.
    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<FileVersion>>;

    /// A specific version of a file.
    async fn get(&self, file_id: Uuid, version_number: i32) -> AppResult<Option<FileVersion>>;

    /// The version with the highest version number for a file.
    async fn current(&self, file_id: Uuid) -> AppResult<Option<FileVersion>>;

    /// All versions with the given checksum, ascending by id (ids are
    /// time-ordered, so iteration order is deterministic).
    async fn find_by_checksum(&self, checksum: &str) -> AppResult<Vec<FileVersion>>;

    /// Count version records referencing `storage_path` that belong to
    /// files other than `exclude_file`. Used as the reference count
    /// guarding physical deletion of deduplicated content.
    async fn count_path_references(&self, storage_path: &str, exclude_file: Uuid)
    -> AppResult<u64>;

    /// Number of versions recorded for a file.
    async fn count_for_file(&self, file_id: Uuid) -> AppResult<u64>;
}

/// Filters accepted by the audit log search.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Only entries by this actor.
    pub actor_id: Option<Uuid>,
    /// Only entries with this action.
    pub action: Option<AuditAction>,
    /// Only entries at or after this time.
    pub from: Option<DateTime<Utc>>,
    /// Only entries before this time.
    pub until: Option<DateTime<Utc>>,
    /// Sort ascending by time instead of the default descending.
    pub ascending: bool,
}

/// Append-only audit log persistence.
#[async_trait]
pub trait AuditLogRepository: Send + Sync + 'static {
    /// Append an audit entry.
    async fn create(&self, data: &CreateAuditLogEntry) -> AppResult<AuditLogEntry>;

    /// Search entries with filters and pagination.
    async fn search(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>>;

    /// All entries, newest first (CSV export).
    async fn list_all_desc(&self) -> AppResult<Vec<AuditLogEntry>>;

    /// Entry counts grouped by action.
    async fn action_stats(&self) -> AppResult<Vec<(AuditAction, u64)>>;

    /// Number of distinct authenticated actors seen in the log.
    async fn distinct_actor_count(&self) -> AppResult<u64>;
}
