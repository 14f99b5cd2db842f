//! Per-logical-file lock arena.
//!
//! Serializes every mutation of one logical file — upload (compute next
//! version → append), rollback, delete — on the `(owner_id, filename)`
//! key that identifies it. Different files proceed concurrently. The
//! database's `UNIQUE (file_id, version_number)` constraint remains the
//! transactional backstop should a second process bypass the arena.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Arena of per-(owner, filename) async mutexes.
#[derive(Debug, Clone, Default)]
pub struct FileLockArena {
    locks: Arc<DashMap<(Uuid, String), Arc<Mutex<()>>>>,
}

impl FileLockArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive lock for one logical file, waiting if another
    /// mutation holds it. The guard releases on drop.
    pub async fn acquire(&self, owner_id: Uuid, filename: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry((owner_id, filename.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_same_key_serializes() {
        let arena = FileLockArena::new();
        let owner = Uuid::new_v4();
        let in_section = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let arena = arena.clone();
            let in_section = Arc::clone(&in_section);
            tasks.push(tokio::spawn(async move {
                let _guard = arena.acquire(owner, "report.pdf").await;
                let now = in_section.fetch_add(1, Ordering::SeqCst);
                assert_eq!(now, 0, "two tasks inside the critical section");
                tokio::task::yield_now().await;
                in_section.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let arena = FileLockArena::new();
        let owner = Uuid::new_v4();

        let _a = arena.acquire(owner, "a.txt").await;
        // Must not deadlock: a different filename is a different lock.
        let _b = arena.acquire(owner, "b.txt").await;
        // Same filename under a different owner is also independent.
        let _c = arena.acquire(Uuid::new_v4(), "a.txt").await;
    }
}
