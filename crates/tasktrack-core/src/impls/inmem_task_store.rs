//! InMemoryTaskStore - 開発・テスト用の TaskStore
//!
//! - `tokio::sync::RwLock<HashMap<TaskId, TaskRecord>>`
//! - 1 レコードの書き込みは write lock 下でアトミック
//! - 一覧は read lock のみ（`is_visible` → filter → `task_order` → paginate）

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{TaskId, TaskRecord};
use crate::ports::{StoreError, StoreResult, TaskStore};
use crate::query::{is_visible, paginate, task_order, Page, PageRequest, TaskFilter};

#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    records: Arc<RwLock<HashMap<TaskId, TaskRecord>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored rows, soft-deleted ones included.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, record: TaskRecord) -> StoreResult<()> {
        let mut guard = self.records.write().await;
        if guard.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id.to_string()));
        }
        guard.insert(record.id, record);
        Ok(())
    }

    async fn save(&self, record: TaskRecord) -> StoreResult<()> {
        let mut guard = self.records.write().await;
        match guard.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::Missing(record.id.to_string())),
        }
    }

    async fn find_active(&self, id: TaskId) -> StoreResult<Option<TaskRecord>> {
        let guard = self.records.read().await;
        Ok(guard.get(&id).filter(|r| is_visible(r)).cloned())
    }

    async fn find_page(&self, filter: &TaskFilter, page: PageRequest) -> StoreResult<Page<TaskRecord>> {
        let guard = self.records.read().await;
        let mut matches: Vec<&TaskRecord> = guard
            .values()
            .filter(|r| is_visible(r) && filter.matches(r))
            .collect();
        matches.sort_by(|a, b| task_order(a, b));
        Ok(paginate(matches, page).map(TaskRecord::clone))
    }

    async fn find_including_deleted(&self, id: TaskId) -> StoreResult<Option<TaskRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }
}
