//! In-memory audit log repository.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use depot_core::result::AppResult;
use depot_core::types::pagination::{PageRequest, PageResponse};
use depot_entity::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry};

use super::MemoryState;
use crate::repositories::{AuditFilter, AuditLogRepository};

/// In-memory audit log repository handle.
#[derive(Debug, Clone)]
pub struct MemoryAuditLogRepository {
    state: Arc<MemoryState>,
}

impl MemoryAuditLogRepository {
    pub(crate) fn new(state: Arc<MemoryState>) -> Self {
        Self { state }
    }

    fn matches(filter: &AuditFilter, entry: &AuditLogEntry) -> bool {
        if let Some(actor) = filter.actor_id {
            if entry.actor_id != Some(actor) {
                return false;
            }
        }
        if let Some(action) = filter.action {
            if entry.action != action {
                return false;
            }
        }
        if let Some(from) = filter.from {
            if entry.created_at < from {
                return false;
            }
        }
        if let Some(until) = filter.until {
            if entry.created_at >= until {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl AuditLogRepository for MemoryAuditLogRepository {
    async fn create(&self, data: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            actor_id: data.actor_id,
            action: data.action,
            file_id: data.file_id,
            details: data.details.clone(),
            ip_address: data.ip_address.clone(),
            created_at: Utc::now(),
        };
        self.state.audit.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn search(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let entries = self.state.audit.lock().unwrap();
        let mut matched: Vec<AuditLogEntry> = entries
            .iter()
            .filter(|e| Self::matches(filter, e))
            .cloned()
            .collect();
        if filter.ascending {
            matched.sort_by_key(|e| e.created_at);
        } else {
            matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn list_all_desc(&self) -> AppResult<Vec<AuditLogEntry>> {
        let entries = self.state.audit.lock().unwrap();
        let mut all: Vec<AuditLogEntry> = entries.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn action_stats(&self) -> AppResult<Vec<(AuditAction, u64)>> {
        let entries = self.state.audit.lock().unwrap();
        let mut counts: BTreeMap<&'static str, (AuditAction, u64)> = BTreeMap::new();
        for entry in entries.iter() {
            counts
                .entry(entry.action.as_str())
                .and_modify(|(_, c)| *c += 1)
                .or_insert((entry.action, 1));
        }
        Ok(counts.into_values().collect())
    }

    async fn distinct_actor_count(&self) -> AppResult<u64> {
        let entries = self.state.audit.lock().unwrap();
        let actors: HashSet<Uuid> = entries.iter().filter_map(|e| e.actor_id).collect();
        Ok(actors.len() as u64)
    }
}
