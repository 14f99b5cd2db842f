//! Version listing and rollback.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use depot_auth::AccessGate;
use depot_auth::rbac::Action;
use depot_core::error::AppError;
use depot_database::repositories::{FileRepository, VersionRepository};
use depot_entity::audit::AuditAction;
use depot_entity::file::{File, FileVersion};

use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::locks::FileLockArena;

/// Read access to the version ledger plus the rollback operation.
#[derive(Clone)]
pub struct VersionService {
    file_repo: Arc<dyn FileRepository>,
    version_repo: Arc<dyn VersionRepository>,
    gate: Arc<AccessGate>,
    locks: FileLockArena,
    audit: AuditService,
}

impl std::fmt::Debug for VersionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionService").finish()
    }
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(
        file_repo: Arc<dyn FileRepository>,
        version_repo: Arc<dyn VersionRepository>,
        gate: Arc<AccessGate>,
        locks: FileLockArena,
        audit: AuditService,
    ) -> Self {
        Self {
            file_repo,
            version_repo,
            gate,
            locks,
            audit,
        }
    }

    /// List all versions of a file, ascending by version number.
    pub async fn list_versions(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<Vec<FileVersion>, AppError> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.gate
            .require_file(ctx.role, ctx.user_id, file.owner_id, Action::Read)?;

        self.version_repo.list_for_file(file_id).await
    }

    /// The ledger's view of the latest version: the record with the
    /// highest version number. After a rollback this differs from the
    /// file's current pointer.
    pub async fn latest_version(&self, file_id: Uuid) -> Result<FileVersion, AppError> {
        self.version_repo
            .current(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File has no versions"))
    }

    /// Roll the file's current pointer back to a prior version.
    ///
    /// This is a pointer move, not a content copy: no version record is
    /// created and no later version is deleted. The next upload still
    /// gets `max(version_number) + 1`.
    pub async fn rollback(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        version_number: i32,
    ) -> Result<File, AppError> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.gate
            .require_file(ctx.role, ctx.user_id, file.owner_id, Action::Update)?;

        // Pointer moves must not interleave with an in-flight upload.
        let _guard = self.locks.acquire(file.owner_id, &file.filename).await;

        let target = self
            .version_repo
            .get(file_id, version_number)
            .await?
            .ok_or_else(|| AppError::not_found("Version not found"))?;

        let file = self
            .file_repo
            .update_current(
                file_id,
                target.version_number,
                &target.storage_path,
                target.size_bytes,
            )
            .await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            version = version_number,
            "File rolled back"
        );

        self.audit
            .record(
                Some(ctx.user_id),
                AuditAction::Rollback,
                Some(file_id),
                Some(serde_json::json!({ "rolled_back_to": version_number })),
                ctx.ip_address.clone(),
            )
            .await;

        Ok(file)
    }
}
