//! Share link handlers, including the unauthenticated public download.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::Response;
use uuid::Uuid;

use depot_core::error::AppError;

use crate::dto::response::ShareResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::extractors::auth::client_ip;
use crate::state::AppState;

/// POST /api/files/{id}/share
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ShareResponse>, ApiError> {
    let file = state.share_service.create_share(&auth, id).await?;
    let token = file
        .share_token
        .clone()
        .ok_or_else(|| AppError::internal("Share token missing after creation"))?;

    Ok(Json(ShareResponse {
        file_id: file.id,
        share_url: format!("/share/{token}"),
        share_token: token,
    }))
}

/// DELETE /api/files/{id}/share
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.share_service.revoke_share(&auth, id).await?;
    Ok(Json(serde_json::json!({ "message": "Share revoked" })))
}

/// GET /share/{token} — anonymous download via share token.
pub async fn public_download(
    State(state): State<AppState>,
    parts: Parts,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let result = state
        .download_service
        .download_shared(&token, client_ip(&parts))
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", result.filename),
        )
        .header(header::CONTENT_LENGTH, result.data.len())
        .body(Body::from(result.data))
        .map_err(|e| ApiError(AppError::internal(format!("Response build failed: {e}"))))
}
