//! FileDepot server — versioned, deduplicated multi-user file storage.
//!
//! Main entry point that wires all crates together and starts the HTTP
//! server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use depot_auth::{AccessGate, JwtDecoder, JwtEncoder, PasswordHasher};
use depot_core::config::AppConfig;
use depot_core::error::AppError;
use depot_database::DatabasePool;
use depot_database::postgres::{
    PgAuditLogRepository, PgFileRepository, PgUserRepository, PgVersionRepository,
};
use depot_database::repositories::{
    AuditLogRepository, FileRepository, UserRepository, VersionRepository,
};
use depot_service::audit::AuditService;
use depot_service::file::{DownloadService, FileService, UploadService, VersionService};
use depot_service::locks::FileLockArena;
use depot_service::share::ShareService;
use depot_service::user::UserService;
use depot_storage::{ChecksumEngine, ContentStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("DEPOT_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing from the logging config (RUST_LOG overrides).
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FileDepot v{}", env!("CARGO_PKG_VERSION"));

    let pool = DatabasePool::connect(&config.database).await?;
    depot_database::migration::run_migrations(pool.pool()).await?;

    let store = Arc::new(ContentStore::new(&config.storage.root_path).await?);
    tracing::info!(root = %config.storage.root_path, "Content store ready");

    let user_repo: Arc<dyn UserRepository> =
        Arc::new(PgUserRepository::new(pool.pool().clone()));
    let file_repo: Arc<dyn FileRepository> =
        Arc::new(PgFileRepository::new(pool.pool().clone()));
    let version_repo: Arc<dyn VersionRepository> =
        Arc::new(PgVersionRepository::new(pool.pool().clone()));
    let audit_repo: Arc<dyn AuditLogRepository> =
        Arc::new(PgAuditLogRepository::new(pool.pool().clone()));

    let gate = Arc::new(AccessGate::new());
    let locks = FileLockArena::new();
    let audit_service = AuditService::new(Arc::clone(&audit_repo));
    let engine = ChecksumEngine::new(config.storage.max_upload_size_bytes);

    let upload_service = UploadService::new(
        Arc::clone(&file_repo),
        Arc::clone(&version_repo),
        Arc::clone(&store),
        engine,
        Arc::clone(&gate),
        locks.clone(),
        audit_service.clone(),
    );
    let download_service = DownloadService::new(
        Arc::clone(&file_repo),
        Arc::clone(&version_repo),
        Arc::clone(&store),
        Arc::clone(&gate),
        audit_service.clone(),
    );
    let file_service = FileService::new(
        Arc::clone(&file_repo),
        Arc::clone(&version_repo),
        Arc::clone(&store),
        Arc::clone(&gate),
        locks.clone(),
        audit_service.clone(),
    );
    let version_service = VersionService::new(
        Arc::clone(&file_repo),
        Arc::clone(&version_repo),
        Arc::clone(&gate),
        locks.clone(),
        audit_service.clone(),
    );
    let share_service = ShareService::new(
        Arc::clone(&file_repo),
        Arc::clone(&gate),
        audit_service.clone(),
    );
    let user_service = UserService::new(
        Arc::clone(&user_repo),
        file_service.clone(),
        PasswordHasher::new(),
        JwtEncoder::new(&config.auth),
        Arc::clone(&gate),
        audit_service.clone(),
    );

    let state = depot_api::AppState {
        upload_service,
        download_service,
        file_service,
        version_service,
        share_service,
        user_service,
        audit_service,
        jwt_decoder: JwtDecoder::new(&config.auth),
        storage_config: config.storage.clone(),
    };

    let router = depot_api::build_router(state, &config.server.cors_origins);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(addr = %addr, "FileDepot listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    pool.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
