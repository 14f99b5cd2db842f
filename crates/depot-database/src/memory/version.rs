//! In-memory version ledger repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use depot_core::error::AppError;
use depot_core::result::AppResult;
use depot_entity::file::{FileVersion, NewVersion};

use super::MemoryState;
use crate::repositories::VersionRepository;

/// In-memory version ledger repository handle.
#[derive(Debug, Clone)]
pub struct MemoryVersionRepository {
    state: Arc<MemoryState>,
}

impl MemoryVersionRepository {
    pub(crate) fn new(state: Arc<MemoryState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl VersionRepository for MemoryVersionRepository {
    async fn next_version_number(&self, file_id: Uuid) -> AppResult<i32> {
        let versions = self.state.versions.lock().unwrap();
        let max = versions
            .iter()
            .filter(|v| v.file_id == file_id)
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    async fn append(&self, data: &NewVersion) -> AppResult<FileVersion> {
        let mut versions = self.state.versions.lock().unwrap();

        // The check and the push happen under one lock, mirroring the
        // UNIQUE (file_id, version_number) constraint.
        if versions
            .iter()
            .any(|v| v.file_id == data.file_id && v.version_number == data.version_number)
        {
            return Err(AppError::conflict(format!(
                "Version {} already exists for file {}",
                data.version_number, data.file_id
            )));
        }

        let version = FileVersion {
            id: Uuid::now_v7(),
            file_id: data.file_id,
            version_number: data.version_number,
            storage_path: data.storage_path.clone(),
            checksum_sha256: data.checksum_sha256.clone(),
            size_bytes: data.size_bytes,
            note: data.note.clone(),
            created_at: Utc::now(),
        };
        versions.push(version.clone());
        Ok(version)
    }

    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<FileVersion>> {
        let versions = self.state.versions.lock().unwrap();
        let mut result: Vec<FileVersion> = versions
            .iter()
            .filter(|v| v.file_id == file_id)
            .cloned()
            .collect();
        result.sort_by_key(|v| v.version_number);
        Ok(result)
    }

    async fn get(&self, file_id: Uuid, version_number: i32) -> AppResult<Option<FileVersion>> {
        let versions = self.state.versions.lock().unwrap();
        Ok(versions
            .iter()
            .find(|v| v.file_id == file_id && v.version_number == version_number)
            .cloned())
    }

    async fn current(&self, file_id: Uuid) -> AppResult<Option<FileVersion>> {
        let versions = self.state.versions.lock().unwrap();
        Ok(versions
            .iter()
            .filter(|v| v.file_id == file_id)
            .max_by_key(|v| v.version_number)
            .cloned())
    }

    async fn find_by_checksum(&self, checksum: &str) -> AppResult<Vec<FileVersion>> {
        let versions = self.state.versions.lock().unwrap();
        let mut result: Vec<FileVersion> = versions
            .iter()
            .filter(|v| v.checksum_sha256 == checksum)
            .cloned()
            .collect();
        result.sort_by_key(|v| v.id);
        Ok(result)
    }

    async fn count_path_references(
        &self,
        storage_path: &str,
        exclude_file: Uuid,
    ) -> AppResult<u64> {
        let versions = self.state.versions.lock().unwrap();
        Ok(versions
            .iter()
            .filter(|v| v.storage_path == storage_path && v.file_id != exclude_file)
            .count() as u64)
    }

    async fn count_for_file(&self, file_id: Uuid) -> AppResult<u64> {
        let versions = self.state.versions.lock().unwrap();
        Ok(versions.iter().filter(|v| v.file_id == file_id).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    fn new_version(file_id: Uuid, number: i32, path: &str, checksum: &str) -> NewVersion {
        NewVersion {
            file_id,
            version_number: number,
            storage_path: path.to_string(),
            checksum_sha256: checksum.to_string(),
            size_bytes: 1,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_numbering_starts_at_one_and_increments() {
        let repo = MemoryBackend::new().versions();
        let file_id = Uuid::new_v4();

        assert_eq!(repo.next_version_number(file_id).await.unwrap(), 1);
        repo.append(&new_version(file_id, 1, "p1", "c1")).await.unwrap();
        assert_eq!(repo.next_version_number(file_id).await.unwrap(), 2);

        // Numbering is per-file.
        assert_eq!(repo.next_version_number(Uuid::new_v4()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_number_is_conflict() {
        let repo = MemoryBackend::new().versions();
        let file_id = Uuid::new_v4();

        repo.append(&new_version(file_id, 1, "p1", "c1")).await.unwrap();
        let err = repo.append(&new_version(file_id, 1, "p2", "c2")).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_checksum_lookup_is_id_ordered() {
        let repo = MemoryBackend::new().versions();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let first = repo.append(&new_version(a, 1, "pa", "same")).await.unwrap();
        let second = repo.append(&new_version(b, 1, "pb", "same")).await.unwrap();

        let found = repo.find_by_checksum("same").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, first.id);
        assert_eq!(found[1].id, second.id);
    }

    #[tokio::test]
    async fn test_current_is_highest_number() {
        let repo = MemoryBackend::new().versions();
        let file_id = Uuid::new_v4();

        repo.append(&new_version(file_id, 1, "p1", "c1")).await.unwrap();
        repo.append(&new_version(file_id, 3, "p3", "c3")).await.unwrap();
        repo.append(&new_version(file_id, 2, "p2", "c2")).await.unwrap();

        let current = repo.current(file_id).await.unwrap().unwrap();
        assert_eq!(current.version_number, 3);
    }
}
