//! PostgreSQL repository implementations.

pub mod audit;
pub mod file;
pub mod user;
pub mod version;

pub use audit::PgAuditLogRepository;
pub use file::PgFileRepository;
pub use user::PgUserRepository;
pub use version::PgVersionRepository;
