//! TaskStore port - タスクレコードの正本
//!
//! # 読み取りの規約
//! - soft delete 済みのレコードは `find_active` / `find_page` から見えない
//!   (除外は adapter 側で必ず行う、呼び出し側ではフィルタしない)
//! - `find_including_deleted` だけが削除済みの行を返す（監査・テスト用）
//! - `find_page` の順序は `query::task_order`

use async_trait::async_trait;

use super::store_error::StoreResult;
use crate::domain::{TaskId, TaskRecord};
use crate::query::{Page, PageRequest, TaskFilter};

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// 新規レコードを保存する。同じ id が既にあれば `StoreError::Duplicate`。
    async fn insert(&self, record: TaskRecord) -> StoreResult<()>;

    /// 既存レコードを丸ごと置き換える（last-write-wins）。
    async fn save(&self, record: TaskRecord) -> StoreResult<()>;

    async fn find_active(&self, id: TaskId) -> StoreResult<Option<TaskRecord>>;

    async fn find_page(&self, filter: &TaskFilter, page: PageRequest) -> StoreResult<Page<TaskRecord>>;

    async fn find_including_deleted(&self, id: TaskId) -> StoreResult<Option<TaskRecord>>;
}
