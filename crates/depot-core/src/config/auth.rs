//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign JWT access tokens.
    pub jwt_secret: String,
    /// Access token time-to-live in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
}

fn default_access_ttl() -> u64 {
    60
}
