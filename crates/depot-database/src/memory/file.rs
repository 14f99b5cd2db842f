//! In-memory logical file repository.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use depot_core::error::AppError;
use depot_core::result::AppResult;
use depot_core::types::sorting::FileSortKey;
use depot_entity::file::{CreateFile, File};

use super::MemoryState;
use crate::repositories::FileRepository;

/// In-memory logical file repository handle.
#[derive(Debug, Clone)]
pub struct MemoryFileRepository {
    state: Arc<MemoryState>,
}

impl MemoryFileRepository {
    pub(crate) fn new(state: Arc<MemoryState>) -> Self {
        Self { state }
    }
}

fn compare(sort: FileSortKey, a: &File, b: &File) -> Ordering {
    match sort {
        FileSortKey::NameAsc => a.filename.cmp(&b.filename),
        FileSortKey::NameDesc => b.filename.cmp(&a.filename),
        FileSortKey::DateAsc => a.created_at.cmp(&b.created_at),
        FileSortKey::DateDesc => b.created_at.cmp(&a.created_at),
        FileSortKey::SizeAsc => a.size_bytes.cmp(&b.size_bytes),
        FileSortKey::SizeDesc => b.size_bytes.cmp(&a.size_bytes),
    }
}

#[async_trait]
impl FileRepository for MemoryFileRepository {
    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let _guard = self.state.write_lock.lock().unwrap();

        if self
            .state
            .files
            .iter()
            .any(|f| f.owner_id == data.owner_id && f.filename == data.filename)
        {
            return Err(AppError::conflict(format!(
                "File '{}' already exists for this user",
                data.filename
            )));
        }

        let now = Utc::now();
        let file = File {
            id: data.id,
            filename: data.filename.clone(),
            owner_id: data.owner_id,
            current_version: data.current_version,
            storage_path: data.storage_path.clone(),
            size_bytes: data.size_bytes,
            share_token: None,
            created_at: now,
            updated_at: now,
        };
        self.state.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self.state.files.get(&id).map(|f| f.clone()))
    }

    async fn find_by_owner_and_name(
        &self,
        owner_id: Uuid,
        filename: &str,
    ) -> AppResult<Option<File>> {
        Ok(self
            .state
            .files
            .iter()
            .find(|f| f.owner_id == owner_id && f.filename == filename)
            .map(|f| f.clone()))
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        search: Option<&str>,
        sort: FileSortKey,
    ) -> AppResult<Vec<File>> {
        let needle = search.map(|s| s.to_lowercase());
        let mut files: Vec<File> = self
            .state
            .files
            .iter()
            .filter(|f| f.owner_id == owner_id)
            .filter(|f| match &needle {
                Some(n) => f.filename.to_lowercase().contains(n),
                None => true,
            })
            .map(|f| f.clone())
            .collect();
        files.sort_by(|a, b| compare(sort, a, b));
        Ok(files)
    }

    async fn update_current(
        &self,
        file_id: Uuid,
        version_number: i32,
        storage_path: &str,
        size_bytes: i64,
    ) -> AppResult<File> {
        let mut file = self
            .state
            .files
            .get_mut(&file_id)
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;
        file.current_version = version_number;
        file.storage_path = storage_path.to_string();
        file.size_bytes = size_bytes;
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    async fn set_share_token(&self, file_id: Uuid, token: Option<&str>) -> AppResult<File> {
        let mut file = self
            .state
            .files
            .get_mut(&file_id)
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;
        file.share_token = token.map(String::from);
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<File>> {
        Ok(self
            .state
            .files
            .iter()
            .find(|f| f.share_token.as_deref() == Some(token))
            .map(|f| f.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let removed = self.state.files.remove(&id).is_some();
        if removed {
            // Emulate the ON DELETE CASCADE from files to file_versions.
            let mut versions = self.state.versions.lock().unwrap();
            versions.retain(|v| v.file_id != id);
        }
        Ok(removed)
    }
}
