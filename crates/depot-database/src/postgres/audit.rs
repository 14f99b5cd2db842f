//! PostgreSQL audit log repository.

use async_trait::async_trait;
use sqlx::PgPool;

use depot_core::error::{AppError, ErrorKind};
use depot_core::result::AppResult;
use depot_core::types::pagination::{PageRequest, PageResponse};
use depot_entity::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry};

use crate::repositories::{AuditFilter, AuditLogRepository};

/// sqlx-backed audit log repository.
#[derive(Debug, Clone)]
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    async fn create(&self, data: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_log (actor_id, action, file_id, details, ip_address) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.actor_id)
        .bind(data.action)
        .bind(data.file_id)
        .bind(&data.details)
        .bind(&data.ip_address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create audit entry", e))
    }

    async fn search(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if filter.actor_id.is_some() {
            conditions.push(format!("actor_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.action.is_some() {
            conditions.push(format!("action = ${param_idx}"));
            param_idx += 1;
        }
        if filter.from.is_some() {
            conditions.push(format!("created_at >= ${param_idx}"));
            param_idx += 1;
        }
        if filter.until.is_some() {
            conditions.push(format!("created_at < ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let order = if filter.ascending { "ASC" } else { "DESC" };

        let count_sql = format!("SELECT COUNT(*) FROM audit_log {where_clause}");
        let select_sql = format!(
            "SELECT * FROM audit_log {where_clause} ORDER BY created_at {order} \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AuditLogEntry>(&select_sql);

        if let Some(aid) = filter.actor_id {
            count_query = count_query.bind(aid);
            select_query = select_query.bind(aid);
        }
        if let Some(action) = filter.action {
            count_query = count_query.bind(action);
            select_query = select_query.bind(action);
        }
        if let Some(from) = filter.from {
            count_query = count_query.bind(from);
            select_query = select_query.bind(from);
        }
        if let Some(until) = filter.until {
            count_query = count_query.bind(until);
            select_query = select_query.bind(until);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count audit entries", e)
        })?;

        let entries = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search audit log", e)
            })?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn list_all_desc(&self) -> AppResult<Vec<AuditLogEntry>> {
        sqlx::query_as::<_, AuditLogEntry>("SELECT * FROM audit_log ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list audit log", e))
    }

    async fn action_stats(&self) -> AppResult<Vec<(AuditAction, u64)>> {
        let rows: Vec<(AuditAction, i64)> = sqlx::query_as(
            "SELECT action, COUNT(*) FROM audit_log GROUP BY action ORDER BY action",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute audit stats", e)
        })?;
        Ok(rows.into_iter().map(|(a, c)| (a, c as u64)).collect())
    }

    async fn distinct_actor_count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT actor_id) FROM audit_log WHERE actor_id IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count distinct actors", e)
        })?;
        Ok(count as u64)
    }
}
