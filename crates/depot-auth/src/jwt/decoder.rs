//! JWT access token validation.

use jsonwebtoken::{DecodingKey, Validation, decode};

use depot_core::config::auth::AuthConfig;
use depot_core::error::AppError;

use super::claims::Claims;

/// Validates signed JWT access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation parameters (HS256, exp required).
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder").finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Decodes and validates an access token, returning its claims.
    ///
    /// Expired, malformed, or tampered tokens are all reported as
    /// unauthenticated.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::unauthenticated(format!("Invalid access token: {e}")))
    }
}
