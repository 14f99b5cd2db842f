//! File upload pipeline.
//!
//! One entry point drives the whole flow: access gate → per-file lock →
//! checksum engine (stream to temp) → deduplication resolver → content
//! store commit → version ledger append → current-pointer update → audit.
//! The ledger is only touched after the content store commit succeeds, so
//! an aborted stream leaves no partially-visible version.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use depot_auth::AccessGate;
use depot_core::error::AppError;
use depot_database::repositories::{FileRepository, VersionRepository};
use depot_entity::audit::AuditAction;
use depot_entity::file::{CreateFile, File, FileVersion, NewVersion};
use depot_storage::{ByteStream, ChecksumEngine, ContentStore};

use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::file::dedup::DedupResolver;
use crate::locks::FileLockArena;

/// Parameters for one upload request.
pub struct UploadParams {
    /// Client-supplied filename (identifies the logical file together
    /// with the owner).
    pub filename: String,
    /// Optional free-text note stored on the version record.
    pub note: Option<String>,
    /// Declared content size, when the transport knows it up front.
    pub declared_size: Option<u64>,
    /// The upload byte stream.
    pub stream: ByteStream,
}

impl std::fmt::Debug for UploadParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadParams")
            .field("filename", &self.filename)
            .field("note", &self.note)
            .field("declared_size", &self.declared_size)
            .finish()
    }
}

/// Result of a completed upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// The logical file (created on first upload, updated after).
    pub file: File,
    /// The version record appended for this upload.
    pub version: FileVersion,
    /// Whether the content aliased an existing physical object.
    pub was_deduplicated: bool,
}

/// Handles versioned, deduplicated uploads.
#[derive(Clone)]
pub struct UploadService {
    file_repo: Arc<dyn FileRepository>,
    version_repo: Arc<dyn VersionRepository>,
    store: Arc<ContentStore>,
    engine: ChecksumEngine,
    dedup: DedupResolver,
    gate: Arc<AccessGate>,
    locks: FileLockArena,
    audit: AuditService,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService").finish()
    }
}

impl UploadService {
    /// Creates a new upload service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        file_repo: Arc<dyn FileRepository>,
        version_repo: Arc<dyn VersionRepository>,
        store: Arc<ContentStore>,
        engine: ChecksumEngine,
        gate: Arc<AccessGate>,
        locks: FileLockArena,
        audit: AuditService,
    ) -> Self {
        let dedup = DedupResolver::new(Arc::clone(&version_repo), Arc::clone(&store));
        Self {
            file_repo,
            version_repo,
            store,
            engine,
            dedup,
            gate,
            locks,
            audit,
        }
    }

    /// Upload one file version for the calling user.
    ///
    /// The first upload of a `(owner, filename)` pair creates the logical
    /// file at version 1; subsequent uploads append the next version and
    /// move the current pointer.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        params: UploadParams,
    ) -> Result<UploadOutcome, AppError> {
        if params.filename.trim().is_empty() {
            return Err(AppError::validation("Missing filename"));
        }
        self.gate.require_file_create(ctx.role)?;
        self.engine.check_declared_size(params.declared_size)?;

        // Everything from version-number assignment to the ledger append
        // is a read-modify-write on this logical file; hold its lock for
        // the duration.
        let _guard = self.locks.acquire(ctx.user_id, &params.filename).await;

        let existing = self
            .file_repo
            .find_by_owner_and_name(ctx.user_id, &params.filename)
            .await?;

        let (file_id, version_number) = match &existing {
            Some(file) => (file.id, self.version_repo.next_version_number(file.id).await?),
            None => (Uuid::new_v4(), 1),
        };

        let final_rel =
            ContentStore::version_path(ctx.user_id, file_id, version_number, &params.filename);
        let temp_rel = ContentStore::temp_path(&final_rel);

        let digest = self
            .engine
            .stream_to_temp(&self.store, &temp_rel, params.stream)
            .await?;

        let outcome = self
            .dedup
            .resolve(
                &digest.sha256_hex,
                digest.size_bytes as i64,
                &temp_rel,
                &final_rel,
            )
            .await?;

        // Content is durable; record the metadata. On the first upload the
        // file row itself is created here, after the commit, so a failed
        // stream never leaves a file without content.
        let file = match existing {
            Some(_) => None,
            None => Some(
                self.file_repo
                    .create(&CreateFile {
                        id: file_id,
                        filename: params.filename.clone(),
                        owner_id: ctx.user_id,
                        current_version: version_number,
                        storage_path: outcome.storage_path.clone(),
                        size_bytes: outcome.size_bytes,
                    })
                    .await?,
            ),
        };

        let version = self
            .version_repo
            .append(&NewVersion {
                file_id,
                version_number,
                storage_path: outcome.storage_path.clone(),
                checksum_sha256: digest.sha256_hex.clone(),
                size_bytes: outcome.size_bytes,
                note: params.note,
            })
            .await?;

        let file = match file {
            Some(created) => created,
            None => {
                self.file_repo
                    .update_current(
                        file_id,
                        version_number,
                        &outcome.storage_path,
                        outcome.size_bytes,
                    )
                    .await?
            }
        };

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            filename = %file.filename,
            version = version_number,
            size = outcome.size_bytes,
            deduplicated = outcome.was_deduplicated,
            "Upload committed"
        );

        self.audit
            .record(
                Some(ctx.user_id),
                AuditAction::Upload,
                Some(file.id),
                Some(serde_json::json!({
                    "version": version_number,
                    "size": outcome.size_bytes,
                    "deduplicated": outcome.was_deduplicated,
                })),
                ctx.ip_address.clone(),
            )
            .await;

        Ok(UploadOutcome {
            file,
            version,
            was_deduplicated: outcome.was_deduplicated,
        })
    }
}
