//! In-memory repository implementations.
//!
//! All collections live in one shared [`MemoryBackend`] so that cross-table
//! behavior (the version cascade on file deletion) matches the foreign-key
//! semantics of the PostgreSQL schema. Used by the service test suites and
//! by standalone mode; not durable.

pub mod audit;
pub mod file;
pub mod user;
pub mod version;

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use uuid::Uuid;

use depot_entity::audit::AuditLogEntry;
use depot_entity::file::{File, FileVersion};
use depot_entity::user::User;

pub use audit::MemoryAuditLogRepository;
pub use file::MemoryFileRepository;
pub use user::MemoryUserRepository;
pub use version::MemoryVersionRepository;

/// Shared state behind every in-memory repository handle.
#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    /// User rows by id.
    pub users: DashMap<Uuid, User>,
    /// Logical file rows by id.
    pub files: DashMap<Uuid, File>,
    /// Version ledger, insertion-ordered (ids are v7, so id order ==
    /// insertion order).
    pub versions: Mutex<Vec<FileVersion>>,
    /// Append-only audit log.
    pub audit: Mutex<Vec<AuditLogEntry>>,
    /// Serializes uniqueness-checked inserts (the stand-in for the
    /// database unique constraints).
    pub write_lock: Mutex<()>,
}

/// Factory for in-memory repository handles sharing one state.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<MemoryState>,
}

impl MemoryBackend {
    /// Create a fresh, empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// User repository handle.
    pub fn users(&self) -> MemoryUserRepository {
        MemoryUserRepository::new(Arc::clone(&self.state))
    }

    /// File repository handle.
    pub fn files(&self) -> MemoryFileRepository {
        MemoryFileRepository::new(Arc::clone(&self.state))
    }

    /// Version ledger repository handle.
    pub fn versions(&self) -> MemoryVersionRepository {
        MemoryVersionRepository::new(Arc::clone(&self.state))
    }

    /// Audit log repository handle.
    pub fn audit(&self) -> MemoryAuditLogRepository {
        MemoryAuditLogRepository::new(Arc::clone(&self.state))
    }
}
