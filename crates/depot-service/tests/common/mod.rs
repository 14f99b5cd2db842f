//! Shared harness for the service scenario tests: every service wired
//! against the in-memory repositories and a tempdir-backed content store.

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use depot_auth::{AccessGate, JwtEncoder, PasswordHasher};
use depot_core::config::auth::AuthConfig;
use depot_database::memory::MemoryBackend;
use depot_database::repositories::{
    AuditLogRepository, FileRepository, UserRepository, VersionRepository,
};
use depot_entity::user::{CreateUser, User, UserRole};
use depot_service::audit::AuditService;
use depot_service::context::RequestContext;
use depot_service::file::{
    DownloadService, FileService, UploadOutcome, UploadParams, UploadService, VersionService,
};
use depot_service::locks::FileLockArena;
use depot_service::share::ShareService;
use depot_service::user::UserService;
use depot_storage::{ByteStream, ChecksumEngine, ContentStore};

/// Everything a scenario test needs, in one place.
pub struct Harness {
    pub _tmp: tempfile::TempDir,
    pub store: Arc<ContentStore>,
    pub backend: MemoryBackend,
    pub user_repo: Arc<dyn UserRepository>,
    pub file_repo: Arc<dyn FileRepository>,
    pub version_repo: Arc<dyn VersionRepository>,
    pub audit_repo: Arc<dyn AuditLogRepository>,
    pub upload: UploadService,
    pub download: DownloadService,
    pub files: FileService,
    pub versions: VersionService,
    pub shares: ShareService,
    pub users: UserService,
    pub audit: AuditService,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_max_upload(10 * 1024 * 1024).await
    }

    pub async fn with_max_upload(max_bytes: u64) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(
            ContentStore::new(tmp.path().to_str().unwrap())
                .await
                .unwrap(),
        );

        let backend = MemoryBackend::new();
        let user_repo: Arc<dyn UserRepository> = Arc::new(backend.users());
        let file_repo: Arc<dyn FileRepository> = Arc::new(backend.files());
        let version_repo: Arc<dyn VersionRepository> = Arc::new(backend.versions());
        let audit_repo: Arc<dyn AuditLogRepository> = Arc::new(backend.audit());

        let gate = Arc::new(AccessGate::new());
        let locks = FileLockArena::new();
        let audit = AuditService::new(Arc::clone(&audit_repo));
        let engine = ChecksumEngine::new(max_bytes);

        let upload = UploadService::new(
            Arc::clone(&file_repo),
            Arc::clone(&version_repo),
            Arc::clone(&store),
            engine,
            Arc::clone(&gate),
            locks.clone(),
            audit.clone(),
        );
        let download = DownloadService::new(
            Arc::clone(&file_repo),
            Arc::clone(&version_repo),
            Arc::clone(&store),
            Arc::clone(&gate),
            audit.clone(),
        );
        let files = FileService::new(
            Arc::clone(&file_repo),
            Arc::clone(&version_repo),
            Arc::clone(&store),
            Arc::clone(&gate),
            locks.clone(),
            audit.clone(),
        );
        let versions = VersionService::new(
            Arc::clone(&file_repo),
            Arc::clone(&version_repo),
            Arc::clone(&gate),
            locks.clone(),
            audit.clone(),
        );
        let shares = ShareService::new(Arc::clone(&file_repo), Arc::clone(&gate), audit.clone());
        let users = UserService::new(
            Arc::clone(&user_repo),
            files.clone(),
            PasswordHasher::new(),
            JwtEncoder::new(&AuthConfig {
                jwt_secret: "test-secret".to_string(),
                jwt_access_ttl_minutes: 60,
            }),
            Arc::clone(&gate),
            audit.clone(),
        );

        Self {
            _tmp: tmp,
            store,
            backend,
            user_repo,
            file_repo,
            version_repo,
            audit_repo,
            upload,
            download,
            files,
            versions,
            shares,
            users,
            audit,
        }
    }

    /// Create a user directly in the repository (bypassing registration).
    pub async fn seed_user(&self, username: &str, role: UserRole) -> User {
        self.user_repo
            .create(&CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: "x".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    pub fn ctx(&self, user: &User) -> RequestContext {
        RequestContext::new(
            user.id,
            user.role,
            user.username.clone(),
            Some("127.0.0.1".to_string()),
        )
    }

    /// Upload `data` under `filename` for the given context.
    pub async fn upload_bytes(
        &self,
        ctx: &RequestContext,
        filename: &str,
        data: &[u8],
    ) -> UploadOutcome {
        self.try_upload_bytes(ctx, filename, data).await.unwrap()
    }

    pub async fn try_upload_bytes(
        &self,
        ctx: &RequestContext,
        filename: &str,
        data: &[u8],
    ) -> Result<UploadOutcome, depot_core::AppError> {
        self.upload
            .upload(
                ctx,
                UploadParams {
                    filename: filename.to_string(),
                    note: None,
                    declared_size: Some(data.len() as u64),
                    stream: byte_stream(data),
                },
            )
            .await
    }
}

/// A one-chunk byte stream over owned data.
pub fn byte_stream(data: &[u8]) -> ByteStream {
    let owned = Bytes::copy_from_slice(data);
    Box::pin(futures::stream::iter(vec![Ok::<_, std::io::Error>(owned)]))
}

/// A stream that yields one chunk then fails, simulating a client
/// disconnect mid-upload.
pub fn broken_stream(first: &[u8]) -> ByteStream {
    let owned = Bytes::copy_from_slice(first);
    Box::pin(futures::stream::iter(vec![
        Ok(owned),
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionAborted,
            "client disconnected",
        )),
    ]))
}

pub fn sha256_hex(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    format!("{:x}", Sha256::digest(data))
}

pub fn nil_ctx_id() -> Uuid {
    Uuid::nil()
}
