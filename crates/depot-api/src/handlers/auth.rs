//! Registration, login, and logout handlers.

use axum::Json;
use axum::extract::State;
use axum::http::request::Parts;
use validator::Validate;

use depot_core::error::AppError;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{LoginResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::extractors::auth::client_ip;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    parts: Parts,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = state
        .user_service
        .register(&req.username, &req.email, &req.password, client_ip(&parts))
        .await?;

    Ok(Json(user.into()))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    parts: Parts,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (user, token) = state
        .user_service
        .login(&req.username, &req.password, client_ip(&parts))
        .await?;

    Ok(Json(LoginResponse {
        access_token: token.access_token,
        token_type: "Bearer",
        expires_at: token.expires_at,
        user: user.into(),
    }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.user_service.logout(&auth).await;
    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_service.profile(&auth).await?;
    Ok(Json(user.into()))
}
