//! TaskService - タスクのライフサイクル
//!
//! create / get / list / update / delete。
//!
//! # update の順序
//! load → variant 一致 → 値の検証 → assignee の存在確認 → merge → `updated_at` → save
//!
//! list は `max_page_size` を超えるページサイズを切り詰める。
//!
//! 途中で失敗した場合、レコードは一切変更されない。

use std::sync::Arc;

use crate::config::MAX_PAGE_SIZE;
use crate::domain::{
    CreateTaskRequest, Entity, Operation, TaskId, TaskRecord, TrackerError, TrackerResult, UpdateTaskRequest,
    UserId, VariantMismatch,
};
use crate::ports::{Clock, IdGenerator, TaskStore, UserDirectory};
use crate::query::{Page, PageRequest, TaskQuery};

use super::log_failure;

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    max_page_size: u32,
}

impl TaskService {
    pub fn new(
        store: Arc<dyn TaskStore>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            users,
            clock,
            ids,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    /// Upper bound applied to every list request.
    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size.max(1);
        self
    }

    #[tracing::instrument(skip(self, request), fields(variant = %request.variant()))]
    pub async fn create(&self, request: CreateTaskRequest) -> TrackerResult<TaskRecord> {
        self.create_inner(request).await.inspect_err(log_failure)
    }

    #[tracing::instrument(skip(self, id), fields(task_id = %id))]
    pub async fn get(&self, id: TaskId) -> TrackerResult<TaskRecord> {
        self.load(id, Operation::GetTask).await.inspect_err(log_failure)
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn list(&self, query: TaskQuery, page: PageRequest) -> TrackerResult<Page<TaskRecord>> {
        self.list_inner(query, page).await.inspect_err(log_failure)
    }

    #[tracing::instrument(skip(self, id, patch), fields(task_id = %id, variant = %patch.variant()))]
    pub async fn update(&self, id: TaskId, patch: UpdateTaskRequest) -> TrackerResult<TaskRecord> {
        self.update_inner(id, patch).await.inspect_err(log_failure)
    }

    #[tracing::instrument(skip(self, id), fields(task_id = %id))]
    pub async fn delete(&self, id: TaskId) -> TrackerResult<()> {
        self.delete_inner(id).await.inspect_err(log_failure)
    }

    async fn create_inner(&self, request: CreateTaskRequest) -> TrackerResult<TaskRecord> {
        let op = Operation::CreateTask;
        let record = TaskRecord::create(self.ids.generate_task_id(), request, self.clock.now())
            .map_err(|e| e.into_tracker(op))?;
        if let Some(user_id) = record.assigned_user_id {
            self.ensure_user(user_id, op).await?;
        }

        self.store
            .insert(record.clone())
            .await
            .map_err(|e| e.into_tracker(op))?;

        tracing::info!(task_id = %record.id, variant = %record.variant(), "task created");
        Ok(record)
    }

    async fn list_inner(&self, query: TaskQuery, page: PageRequest) -> TrackerResult<Page<TaskRecord>> {
        let op = Operation::ListTasks;
        if let Some(user_id) = query.assignee {
            self.ensure_user(user_id, op).await?;
        }

        let page = page.clamp_to(self.max_page_size);
        let filter = query.to_filter();
        tracing::debug!(
            filters = ?filter.names(),
            page = page.page(),
            size = page.size(),
            "listing tasks"
        );
        self.store
            .find_page(&filter, page)
            .await
            .map_err(|e| e.into_tracker(op))
    }

    async fn update_inner(&self, id: TaskId, patch: UpdateTaskRequest) -> TrackerResult<TaskRecord> {
        let op = Operation::UpdateTask;
        let mut record = self.load(id, op).await?;

        if patch.variant() != record.variant() {
            return Err(VariantMismatch {
                expected: record.variant(),
                actual: patch.variant(),
            }
            .into_tracker(op));
        }
        patch.validate().map_err(|e| e.into_tracker(op))?;
        if let Some(user_id) = patch.common().assigned_user_id {
            self.ensure_user(user_id, op).await?;
        }

        record
            .apply(patch, self.clock.now())
            .map_err(|e| e.into_tracker(op))?;
        self.store
            .save(record.clone())
            .await
            .map_err(|e| e.into_tracker(op))?;

        tracing::info!(task_id = %record.id, "task updated");
        Ok(record)
    }

    async fn delete_inner(&self, id: TaskId) -> TrackerResult<()> {
        let op = Operation::DeleteTask;
        let mut record = self.load(id, op).await?;
        record.soft_delete(self.clock.now());
        self.store.save(record).await.map_err(|e| e.into_tracker(op))?;

        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    async fn load(&self, id: TaskId, op: Operation) -> TrackerResult<TaskRecord> {
        self.store
            .find_active(id)
            .await
            .map_err(|e| e.into_tracker(op))?
            .ok_or_else(|| TrackerError::not_found(Entity::Task, id, op))
    }

    async fn ensure_user(&self, user_id: UserId, op: Operation) -> TrackerResult<()> {
        let exists = self
            .users
            .exists(user_id)
            .await
            .map_err(|e| e.into_tracker(op))?;
        if exists {
            Ok(())
        } else {
            Err(TrackerError::not_found(Entity::User, user_id, op))
        }
    }
}
