//! File listing, metadata, and deletion.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use depot_auth::AccessGate;
use depot_auth::rbac::Action;
use depot_core::error::AppError;
use depot_core::types::sorting::FileSortKey;
use depot_database::repositories::{FileRepository, VersionRepository};
use depot_entity::audit::AuditAction;
use depot_entity::file::File;
use depot_storage::ContentStore;

use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::locks::FileLockArena;

/// File metadata plus its version count.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileInfo {
    /// The file record.
    #[serde(flatten)]
    pub file: File,
    /// Number of versions in the ledger.
    pub version_count: u64,
}

/// Listing, info, and deletion for logical files.
#[derive(Clone)]
pub struct FileService {
    file_repo: Arc<dyn FileRepository>,
    version_repo: Arc<dyn VersionRepository>,
    store: Arc<ContentStore>,
    gate: Arc<AccessGate>,
    locks: FileLockArena,
    audit: AuditService,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService").finish()
    }
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        file_repo: Arc<dyn FileRepository>,
        version_repo: Arc<dyn VersionRepository>,
        store: Arc<ContentStore>,
        gate: Arc<AccessGate>,
        locks: FileLockArena,
        audit: AuditService,
    ) -> Self {
        Self {
            file_repo,
            version_repo,
            store,
            gate,
            locks,
            audit,
        }
    }

    /// List the caller's files, filtered by a filename substring and
    /// ordered by the given sort key. An unknown sort key is a
    /// validation error.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        search: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Vec<File>, AppError> {
        let sort = match sort {
            Some(key) => key.parse::<FileSortKey>()?,
            None => FileSortKey::default(),
        };
        let search = search.filter(|s| !s.is_empty());
        self.file_repo
            .list_by_owner(ctx.user_id, search, sort)
            .await
    }

    /// File metadata plus version count.
    pub async fn info(&self, ctx: &RequestContext, file_id: Uuid) -> Result<FileInfo, AppError> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.gate
            .require_file(ctx.role, ctx.user_id, file.owner_id, Action::Read)?;

        let version_count = self.version_repo.count_for_file(file_id).await?;
        Ok(FileInfo {
            file,
            version_count,
        })
    }

    /// Delete a file with its whole version history.
    pub async fn delete(&self, ctx: &RequestContext, file_id: Uuid) -> Result<(), AppError> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.gate
            .require_file(ctx.role, ctx.user_id, file.owner_id, Action::Delete)?;

        // Deletion mutates the same logical file state as uploads and
        // rollbacks; serialize on the same key.
        let _guard = self.locks.acquire(file.owner_id, &file.filename).await;

        self.remove_file_and_content(&file).await?;

        self.audit
            .record(
                Some(ctx.user_id),
                AuditAction::Delete,
                Some(file_id),
                Some(serde_json::json!({ "filename": file.filename })),
                ctx.ip_address.clone(),
            )
            .await;

        Ok(())
    }

    /// Delete several files. Missing ids are skipped; a permission
    /// failure aborts the request. Returns the ids actually deleted.
    pub async fn delete_multiple(
        &self,
        ctx: &RequestContext,
        file_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, AppError> {
        let mut deleted = Vec::new();
        for &id in file_ids {
            match self.delete(ctx, id).await {
                Ok(()) => deleted.push(id),
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(deleted)
    }

    /// Delete every file owned by a user, without access checks. Called
    /// by the account-deletion cascade after the admin gate has already
    /// passed.
    pub async fn delete_all_for_owner(&self, owner_id: Uuid) -> Result<u64, AppError> {
        let files = self
            .file_repo
            .list_by_owner(owner_id, None, FileSortKey::DateAsc)
            .await?;
        let mut removed = 0u64;
        for file in files {
            let _guard = self.locks.acquire(file.owner_id, &file.filename).await;
            self.remove_file_and_content(&file).await?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Remove the ledger rows for a file, then unlink any physical path
    /// no longer referenced by another file's versions.
    ///
    /// The reference count guards deduplicated content: a path aliased by
    /// an unrelated file's version survives this file's deletion. The
    /// metadata delete is the operation of record; physical unlinks are
    /// best-effort and failures only warn.
    async fn remove_file_and_content(&self, file: &File) -> Result<(), AppError> {
        let versions = self.version_repo.list_for_file(file.id).await?;
        let mut paths: BTreeSet<String> =
            versions.into_iter().map(|v| v.storage_path).collect();
        paths.insert(file.storage_path.clone());

        self.file_repo.delete(file.id).await?;

        for path in paths {
            let external_refs = self
                .version_repo
                .count_path_references(&path, file.id)
                .await?;
            if external_refs > 0 {
                info!(
                    file_id = %file.id,
                    path = %path,
                    refs = external_refs,
                    "Keeping physical content still referenced by other versions"
                );
                continue;
            }
            if let Err(e) = self.store.delete(&path).await {
                warn!(
                    file_id = %file.id,
                    path = %path,
                    error = %e,
                    "Physical delete failed; metadata already removed"
                );
            }
        }

        info!(file_id = %file.id, filename = %file.filename, "File deleted");
        Ok(())
    }
}
