//! `AuthUser` extractor — pulls the Bearer token from the Authorization
//! header, validates it, and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use depot_core::error::AppError;
use depot_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Pull the client origin from headers (reverse-proxy aware).
pub(crate) fn client_ip(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthenticated("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthenticated("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode(token)?;

        let ctx = RequestContext::new(
            claims.user_id(),
            claims.role,
            claims.username,
            client_ip(parts),
        );

        Ok(AuthUser(ctx))
    }
}
