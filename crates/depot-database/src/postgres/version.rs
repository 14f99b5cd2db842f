//! PostgreSQL version ledger repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use depot_core::error::{AppError, ErrorKind};
use depot_core::result::AppResult;
use depot_entity::file::{FileVersion, NewVersion};

use crate::repositories::VersionRepository;

/// sqlx-backed version ledger repository.
#[derive(Debug, Clone)]
pub struct PgVersionRepository {
    pool: PgPool,
}

impl PgVersionRepository {
    /// Create a new version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionRepository for PgVersionRepository {
    async fn next_version_number(&self, file_id: Uuid) -> AppResult<i32> {
        let max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(version_number) FROM file_versions WHERE file_id = $1",
        )
        .bind(file_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute next version", e)
        })?;
        Ok(max.unwrap_or(0) + 1)
    }

    async fn append(&self, data: &NewVersion) -> AppResult<FileVersion> {
        sqlx::query_as::<_, FileVersion>(
            "INSERT INTO file_versions \
             (id, file_id, version_number, storage_path, checksum_sha256, size_bytes, note) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(data.file_id)
        .bind(data.version_number)
        .bind(&data.storage_path)
        .bind(&data.checksum_sha256)
        .bind(data.size_bytes)
        .bind(&data.note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("file_versions_file_id_version_number_key") =>
            {
                AppError::conflict(format!(
                    "Version {} already exists for file {}",
                    data.version_number, data.file_id
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to append version", e),
        })
    }

    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 ORDER BY version_number ASC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))
    }

    async fn get(&self, file_id: Uuid, version_number: i32) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 AND version_number = $2",
        )
        .bind(file_id)
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    async fn current(&self, file_id: Uuid) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 \
             ORDER BY version_number DESC LIMIT 1",
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find current version", e)
        })
    }

    async fn find_by_checksum(&self, checksum: &str) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE checksum_sha256 = $1 ORDER BY id ASC",
        )
        .bind(checksum)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find versions by checksum", e)
        })
    }

    async fn count_path_references(
        &self,
        storage_path: &str,
        exclude_file: Uuid,
    ) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM file_versions WHERE storage_path = $1 AND file_id <> $2",
        )
        .bind(storage_path)
        .bind(exclude_file)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count path references", e)
        })?;
        Ok(count as u64)
    }

    async fn count_for_file(&self, file_id: Uuid) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM file_versions WHERE file_id = $1")
                .bind(file_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count versions", e)
                })?;
        Ok(count as u64)
    }
}
