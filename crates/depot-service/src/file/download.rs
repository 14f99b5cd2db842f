//! File download service.
//!
//! Existence is always checked before permission, so a missing file is
//! NotFound even for callers who would not have been allowed to see it.

use std::io::Write;
use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;
use zip::write::{SimpleFileOptions, ZipWriter};

use depot_auth::AccessGate;
use depot_auth::rbac::Action;
use depot_core::error::AppError;
use depot_database::repositories::{FileRepository, VersionRepository};
use depot_entity::audit::AuditAction;
use depot_entity::file::File;
use depot_storage::ContentStore;

use crate::audit::AuditService;
use crate::context::RequestContext;

/// Result containing file metadata and content bytes for a download.
#[derive(Debug)]
pub struct DownloadResult {
    /// File metadata.
    pub file: File,
    /// File content bytes.
    pub data: Bytes,
    /// Suggested filename for Content-Disposition.
    pub filename: String,
}

/// Handles authorized and public (share token) downloads.
#[derive(Clone)]
pub struct DownloadService {
    file_repo: Arc<dyn FileRepository>,
    version_repo: Arc<dyn VersionRepository>,
    store: Arc<ContentStore>,
    gate: Arc<AccessGate>,
    audit: AuditService,
}

impl std::fmt::Debug for DownloadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadService").finish()
    }
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(
        file_repo: Arc<dyn FileRepository>,
        version_repo: Arc<dyn VersionRepository>,
        store: Arc<ContentStore>,
        gate: Arc<AccessGate>,
        audit: AuditService,
    ) -> Self {
        Self {
            file_repo,
            version_repo,
            store,
            gate,
            audit,
        }
    }

    /// Download the current version of a file, or a specific version when
    /// `version` is given.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        version: Option<i32>,
    ) -> Result<DownloadResult, AppError> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.gate
            .require_file(ctx.role, ctx.user_id, file.owner_id, Action::Read)?;

        let storage_path = match version {
            Some(number) => {
                self.version_repo
                    .get(file_id, number)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Version {number} not found")))?
                    .storage_path
            }
            // The current pointer is authoritative; after a rollback it
            // refers to the rollback target, not the max version.
            None => file.storage_path.clone(),
        };

        let data = self.store.read_bytes(&storage_path).await?;

        self.audit
            .record(
                Some(ctx.user_id),
                AuditAction::Download,
                Some(file.id),
                version.map(|v| serde_json::json!({ "version": v })),
                ctx.ip_address.clone(),
            )
            .await;

        Ok(DownloadResult {
            filename: file.filename.clone(),
            file,
            data,
        })
    }

    /// Download a file's current version via its public share token.
    ///
    /// No authenticated context exists here; the action is audited with a
    /// null actor. The stored path still passes through the content
    /// store's containment and existence checks.
    pub async fn download_shared(
        &self,
        token: &str,
        ip_address: Option<String>,
    ) -> Result<DownloadResult, AppError> {
        let file = self
            .file_repo
            .find_by_share_token(token)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Share link is invalid or the file was deleted")
            })?;

        let data = self.store.read_bytes(&file.storage_path).await?;

        self.audit
            .record(
                None,
                AuditAction::DownloadShare,
                Some(file.id),
                Some(serde_json::json!({ "share_token": token })),
                ip_address,
            )
            .await;

        info!(file_id = %file.id, "Public share download");

        Ok(DownloadResult {
            filename: file.filename.clone(),
            file,
            data,
        })
    }

    /// Bundle several files' current versions into a single zip archive.
    ///
    /// Missing ids are skipped; a file the caller may not read fails the
    /// whole request. Requesting only nonexistent files is NotFound.
    pub async fn download_zip(
        &self,
        ctx: &RequestContext,
        file_ids: &[Uuid],
    ) -> Result<Vec<u8>, AppError> {
        let mut files = Vec::new();
        for &id in file_ids {
            let Some(file) = self.file_repo.find_by_id(id).await? else {
                continue;
            };
            self.gate
                .require_file(ctx.role, ctx.user_id, file.owner_id, Action::Read)
                .map_err(|_| {
                    AppError::forbidden(format!("Permission denied for file {id}"))
                })?;
            files.push(file);
        }

        if files.is_empty() {
            return Err(AppError::not_found("No files found for the given ids"));
        }

        let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        for file in &files {
            let data = self.store.read_bytes(&file.storage_path).await?;
            writer
                .start_file(file.filename.as_str(), options)
                .map_err(|e| AppError::internal(format!("Zip write failed: {e}")))?;
            writer
                .write_all(&data)
                .map_err(|e| AppError::internal(format!("Zip write failed: {e}")))?;

            self.audit
                .record(
                    Some(ctx.user_id),
                    AuditAction::Download,
                    Some(file.id),
                    Some(serde_json::json!({ "zip_part": true })),
                    ctx.ip_address.clone(),
                )
                .await;
        }

        let cursor = writer
            .finish()
            .map_err(|e| AppError::internal(format!("Zip finish failed: {e}")))?;
        Ok(cursor.into_inner())
    }
}
