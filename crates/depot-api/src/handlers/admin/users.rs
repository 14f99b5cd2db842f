//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use depot_entity::user::UserRole;

use crate::dto::request::ChangeRoleRequest;
use crate::dto::response::UserResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.user_service.list_users(&auth).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.user_service.delete_user(&auth, id).await?;
    Ok(Json(serde_json::json!({ "message": "User deleted" })))
}

/// PUT /api/admin/users/{id}/role
pub async fn change_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let role: UserRole = req.role.parse()?;
    let user = state.user_service.change_role(&auth, id, role).await?;
    Ok(Json(user.into()))
}
