//! PostgreSQL logical file repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use depot_core::error::{AppError, ErrorKind};
use depot_core::result::AppResult;
use depot_core::types::sorting::FileSortKey;
use depot_entity::file::{CreateFile, File};

use crate::repositories::FileRepository;

/// sqlx-backed logical file repository.
#[derive(Debug, Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, filename, owner_id, current_version, storage_path, size_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.id)
        .bind(&data.filename)
        .bind(data.owner_id)
        .bind(data.current_version)
        .bind(&data.storage_path)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("files_owner_id_filename_key") =>
            {
                AppError::conflict(format!(
                    "File '{}' already exists for this user",
                    data.filename
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_by_owner_and_name(
        &self,
        owner_id: Uuid,
        filename: &str,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE owner_id = $1 AND filename = $2")
            .bind(owner_id)
            .bind(filename)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find file by name", e)
            })
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        search: Option<&str>,
        sort: FileSortKey,
    ) -> AppResult<Vec<File>> {
        // Sort keys map to a fixed clause set, never to user input.
        let sql = format!(
            "SELECT * FROM files WHERE owner_id = $1 \
             AND ($2::text IS NULL OR filename ILIKE '%' || $2 || '%') \
             ORDER BY {}",
            sort.as_sql()
        );
        sqlx::query_as::<_, File>(&sql)
            .bind(owner_id)
            .bind(search)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn update_current(
        &self,
        file_id: Uuid,
        version_number: i32,
        storage_path: &str,
        size_bytes: i64,
    ) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET current_version = $2, storage_path = $3, size_bytes = $4, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(file_id)
        .bind(version_number)
        .bind(storage_path)
        .bind(size_bytes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update current version", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    async fn set_share_token(&self, file_id: Uuid, token: Option<&str>) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET share_token = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(file_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set share token", e))?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE share_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find file by share token", e)
            })
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}
