//! # depot-entity
//!
//! Domain entity models for FileDepot: users, logical files, immutable
//! version records, and audit log entries. Models derive `sqlx::FromRow`
//! for the PostgreSQL repositories and `serde` for API serialization.

pub mod audit;
pub mod file;
pub mod user;

pub use audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry};
pub use file::{CreateFile, File, FileVersion, NewVersion};
pub use user::{CreateUser, User, UserRole};
