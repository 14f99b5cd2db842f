//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::AuditAction;

/// An immutable audit log entry recording an action.
///
/// `actor_id` is null for anonymous actions (public share downloads) and
/// becomes null when the referenced user is deleted; `file_id` likewise
/// survives file deletion as a null reference. Entries are never updated
/// or deleted by the application.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// The user who performed the action, if authenticated.
    pub actor_id: Option<Uuid>,
    /// The action that was performed.
    pub action: AuditAction,
    /// The target file, if the action concerned one.
    pub file_id: Option<Uuid>,
    /// Additional details about the action (JSON).
    pub details: Option<serde_json::Value>,
    /// Client network origin of the actor.
    pub ip_address: Option<String>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// The user who performed the action, if authenticated.
    pub actor_id: Option<Uuid>,
    /// The action performed.
    pub action: AuditAction,
    /// Target file.
    pub file_id: Option<Uuid>,
    /// Additional details.
    pub details: Option<serde_json::Value>,
    /// Actor's network origin.
    pub ip_address: Option<String>,
}
