//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use depot_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted at the HTTP boundary and passed into service methods so that
/// every operation knows *who* is acting. Services never default to an
/// implicit identity; anonymous flows (public share downloads) have
/// dedicated entry points that take no context at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
    /// The username (convenience field from the token claims).
    pub username: String,
    /// Network origin of the request, if known.
    pub ip_address: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: Uuid,
        role: UserRole,
        username: String,
        ip_address: Option<String>,
    ) -> Self {
        Self {
            user_id,
            role,
            username,
            ip_address,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
