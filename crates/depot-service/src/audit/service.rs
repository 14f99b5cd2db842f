//! Best-effort audit recording plus the admin query surface.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use depot_core::error::AppError;
use depot_core::types::pagination::{PageRequest, PageResponse};
use depot_database::repositories::{AuditFilter, AuditLogRepository};
use depot_entity::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry};

use crate::context::RequestContext;

/// Records and queries audit log entries.
///
/// Recording is best-effort: a failed audit write is logged and swallowed,
/// never aborting the operation it describes. Querying is admin-only.
#[derive(Clone)]
pub struct AuditService {
    /// Audit log repository.
    audit_repo: Arc<dyn AuditLogRepository>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish()
    }
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(audit_repo: Arc<dyn AuditLogRepository>) -> Self {
        Self { audit_repo }
    }

    /// Append an audit entry. Never fails the caller.
    pub async fn record(
        &self,
        actor_id: Option<Uuid>,
        action: AuditAction,
        file_id: Option<Uuid>,
        details: Option<serde_json::Value>,
        ip_address: Option<String>,
    ) {
        let entry = CreateAuditLogEntry {
            actor_id,
            action,
            file_id,
            details,
            ip_address,
        };
        if let Err(e) = self.audit_repo.create(&entry).await {
            warn!(
                action = %action,
                actor_id = ?actor_id,
                file_id = ?file_id,
                error = %e,
                "Audit write failed; continuing"
            );
        }
    }

    /// Search the audit log (admin only).
    pub async fn search(
        &self,
        ctx: &RequestContext,
        filter: AuditFilter,
        page: PageRequest,
    ) -> Result<PageResponse<AuditLogEntry>, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Audit log access requires admin role"));
        }
        self.audit_repo.search(&filter, &page).await
    }

    /// Per-action entry counts plus the number of distinct actors
    /// (admin only).
    pub async fn stats(&self, ctx: &RequestContext) -> Result<serde_json::Value, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Audit log access requires admin role"));
        }

        let mut stats = serde_json::Map::new();
        for (action, count) in self.audit_repo.action_stats().await? {
            stats.insert(format!("total_{}s", action.as_str()), count.into());
        }
        let unique = self.audit_repo.distinct_actor_count().await?;
        stats.insert("total_unique_users".to_string(), unique.into());
        Ok(serde_json::Value::Object(stats))
    }

    /// Export the complete audit log as CSV, newest entries first
    /// (admin only).
    pub async fn export_csv(&self, ctx: &RequestContext) -> Result<String, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Audit log access requires admin role"));
        }

        let entries = self.audit_repo.list_all_desc().await?;
        if entries.is_empty() {
            return Err(AppError::not_found("No log entries"));
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["id", "actor_id", "action", "file_id", "ip_address", "timestamp", "details"])
            .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;

        for entry in &entries {
            writer
                .write_record([
                    entry.id.to_string(),
                    entry.actor_id.map(|a| a.to_string()).unwrap_or_default(),
                    entry.action.to_string(),
                    entry.file_id.map(|f| f.to_string()).unwrap_or_default(),
                    entry.ip_address.clone().unwrap_or_default(),
                    entry.created_at.to_rfc3339(),
                    entry
                        .details
                        .as_ref()
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                ])
                .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::internal(format!("CSV flush failed: {e}")))?;
        String::from_utf8(bytes).map_err(|e| AppError::internal(format!("CSV encoding: {e}")))
    }
}
