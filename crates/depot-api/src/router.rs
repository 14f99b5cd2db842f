//! Route definitions for the FileDepot HTTP API.
//!
//! Authenticated routes live under `/api`; the anonymous share download
//! sits at the root. The router receives `AppState` and passes it to all
//! handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    // Headroom over the content cap for multipart framing; the checksum
    // engine enforces the exact limit.
    let body_limit = state.storage_config.max_upload_size_bytes as usize + 1024 * 1024;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(file_routes())
        .merge(logbook_routes())
        .merge(admin_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .route("/share/{token}", get(handlers::share::public_download))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_origins))
        .with_state(state)
}

/// Auth endpoints: register, login, logout, me.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
}

/// File upload, listing, download, deletion, versions, shares.
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::file::upload))
        .route("/files", get(handlers::file::list_files))
        .route("/files/{id}/info", get(handlers::file::file_info))
        .route("/files/{id}/versions", get(handlers::file::list_versions))
        .route(
            "/files/{id}/rollback/{version}",
            post(handlers::file::rollback),
        )
        .route("/files/{id}/share", post(handlers::share::create_share))
        .route("/files/{id}/share", delete(handlers::share::revoke_share))
        .route("/download/{id}", get(handlers::file::download))
        .route("/download-zip", post(handlers::file::download_zip))
        .route("/delete/{id}", delete(handlers::file::delete_file))
        .route("/delete-multiple", post(handlers::file::delete_multiple))
}

/// Admin audit log endpoints.
fn logbook_routes() -> Router<AppState> {
    Router::new()
        .route("/logbook", get(handlers::admin::audit::list_entries))
        .route("/logbook/stats", get(handlers::admin::audit::stats))
        .route("/logbook/export", get(handlers::admin::audit::export_csv))
}

/// Admin user management endpoints.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(handlers::admin::users::list_users))
        .route(
            "/admin/users/{id}",
            delete(handlers::admin::users::delete_user),
        )
        .route(
            "/admin/users/{id}/role",
            put(handlers::admin::users::change_role),
        )
}

/// CORS layer: explicit origins from config, or permissive when none are
/// configured (development).
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
