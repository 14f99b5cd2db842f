//! Issues and revokes public share tokens.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use tracing::info;
use uuid::Uuid;

use depot_auth::AccessGate;
use depot_auth::rbac::Action;
use depot_core::error::AppError;
use depot_database::repositories::FileRepository;
use depot_entity::audit::AuditAction;
use depot_entity::file::File;

use crate::audit::AuditService;
use crate::context::RequestContext;

/// Number of random bytes behind each share token.
const TOKEN_BYTES: usize = 32;

/// Manages public share tokens on logical files.
#[derive(Clone)]
pub struct ShareService {
    file_repo: Arc<dyn FileRepository>,
    gate: Arc<AccessGate>,
    audit: AuditService,
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService").finish()
    }
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        file_repo: Arc<dyn FileRepository>,
        gate: Arc<AccessGate>,
        audit: AuditService,
    ) -> Self {
        Self {
            file_repo,
            gate,
            audit,
        }
    }

    /// Generate an opaque URL-safe token.
    fn generate_token() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Issue (or re-issue) a public share token for a file.
    ///
    /// Anyone holding the token may download the file's current version
    /// without authenticating.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<File, AppError> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.gate
            .require_file(ctx.role, ctx.user_id, file.owner_id, Action::Update)?;

        let token = Self::generate_token();
        let file = self.file_repo.set_share_token(file_id, Some(&token)).await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "Share token issued");

        self.audit
            .record(
                Some(ctx.user_id),
                AuditAction::Share,
                Some(file_id),
                None,
                ctx.ip_address.clone(),
            )
            .await;

        Ok(file)
    }

    /// Revoke a file's public share token.
    pub async fn revoke_share(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<File, AppError> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.gate
            .require_file(ctx.role, ctx.user_id, file.owner_id, Action::Update)?;

        self.file_repo.set_share_token(file_id, None).await
    }
}
