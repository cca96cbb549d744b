//! UserDirectory / UserStore ports
//!
//! タスク側は読み取り専用の `UserDirectory` だけに依存する。
//! ユーザー管理（作成・更新・削除）は `UserStore` を通して `UserService` が行う。

use async_trait::async_trait;

use super::store_error::StoreResult;
use crate::domain::{User, UserId};
use crate::query::{Page, PageRequest};

/// Read-only view of active users. Soft-deleted users are invisible here.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn exists(&self, id: UserId) -> StoreResult<bool>;

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait UserStore: UserDirectory {
    async fn insert(&self, user: User) -> StoreResult<()>;

    async fn save(&self, user: User) -> StoreResult<()>;

    /// Deleted users still hold their username.
    async fn username_taken(&self, username: &str) -> StoreResult<bool>;

    /// Active users, oldest first.
    async fn find_page(&self, page: PageRequest) -> StoreResult<Page<User>>;
}
