//! # depot-database
//!
//! Persistence layer for FileDepot. Defines the repository traits the
//! service layer depends on, plus two complete sets of implementations:
//! PostgreSQL (sqlx, runtime-checked queries) for production and an
//! in-memory variant (dashmap) used by tests and standalone mode.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{
    AuditFilter, AuditLogRepository, FileRepository, UserRepository, VersionRepository,
};
