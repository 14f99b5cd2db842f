//! Admin audit log handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;

use depot_core::error::AppError;
use depot_core::types::pagination::PageRequest;
use depot_database::repositories::AuditFilter;
use depot_entity::audit::AuditAction;

use crate::dto::request::AuditQuery;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

fn filter_from_query(query: &AuditQuery) -> Result<AuditFilter, AppError> {
    let action = match &query.action {
        Some(name) => Some(name.parse::<AuditAction>()?),
        None => None,
    };
    let ascending = match query.sort_by.as_deref() {
        None | Some("timestamp_desc") => false,
        Some("timestamp_asc") => true,
        Some(other) => {
            return Err(AppError::validation(format!("Unknown sort key: '{other}'")));
        }
    };
    Ok(AuditFilter {
        actor_id: query.user_id,
        action,
        from: query.start_date,
        until: query.end_date,
        ascending,
    })
}

/// GET /api/logbook
pub async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AuditQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let filter = filter_from_query(&query)?;
    let page = PageRequest::new(query.page.unwrap_or(1), query.page_size.unwrap_or(25));

    let result = state.audit_service.search(&auth, filter, page).await?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "page": result.page,
        "page_size": result.page_size,
        "total_items": result.total_items,
        "total_pages": result.total_pages,
    })))
}

/// GET /api/logbook/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stats = state.audit_service.stats(&auth).await?;
    Ok(Json(stats))
}

/// GET /api/logbook/export — CSV download.
pub async fn export_csv(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Response, ApiError> {
    let csv = state.audit_service.export_csv(&auth).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=logbook_export.csv",
        )
        .body(Body::from(csv))
        .map_err(|e| ApiError(AppError::internal(format!("Response build failed: {e}"))))
}
