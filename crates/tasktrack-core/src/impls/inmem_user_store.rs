//! InMemoryUserStore - 開発・テスト用の UserStore / UserDirectory

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{User, UserId};
use crate::ports::{StoreError, StoreResult, UserDirectory, UserStore};
use crate::query::{paginate, user_order, Page, PageRequest};

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row lookup that ignores the soft-delete flag.
    pub async fn find_including_deleted(&self, id: UserId) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserStore {
    async fn exists(&self, id: UserId) -> StoreResult<bool> {
        Ok(self.users.read().await.get(&id).is_some_and(|u| !u.deleted))
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).filter(|u| !u.deleted).cloned())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> StoreResult<()> {
        let mut guard = self.users.write().await;
        if guard.contains_key(&user.id) {
            return Err(StoreError::Duplicate(user.id.to_string()));
        }
        guard.insert(user.id, user);
        Ok(())
    }

    async fn save(&self, user: User) -> StoreResult<()> {
        let mut guard = self.users.write().await;
        match guard.get_mut(&user.id) {
            Some(slot) => {
                *slot = user;
                Ok(())
            }
            None => Err(StoreError::Missing(user.id.to_string())),
        }
    }

    async fn username_taken(&self, username: &str) -> StoreResult<bool> {
        Ok(self.users.read().await.values().any(|u| u.username == username))
    }

    async fn find_page(&self, page: PageRequest) -> StoreResult<Page<User>> {
        let guard = self.users.read().await;
        let mut active: Vec<&User> = guard.values().filter(|u| !u.deleted).collect();
        active.sort_by(|a, b| user_order(a, b));
        Ok(paginate(active, page).map(User::clone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewUser;
    use chrono::{Duration, TimeZone, Utc};
    use ulid::Ulid;

    fn user(username: &str, minutes: i64) -> User {
        User::create(
            UserId::from_ulid(Ulid::new()),
            NewUser::new(username, "Some Body"),
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes),
        )
    }

    #[tokio::test]
    async fn test_deleted_user_is_invisible_but_keeps_username() {
        let store = InMemoryUserStore::new();
        let mut u = user("jdoe", 0);
        store.insert(u.clone()).await.unwrap();
        assert!(store.exists(u.id).await.unwrap());

        u.soft_delete(Utc::now());
        store.save(u.clone()).await.unwrap();

        assert!(!store.exists(u.id).await.unwrap());
        assert_eq!(store.find_by_id(u.id).await.unwrap(), None);
        assert!(store.username_taken("jdoe").await.unwrap());
        assert!(store.find_including_deleted(u.id).await.is_some());
    }

    #[tokio::test]
    async fn test_find_page_lists_oldest_first() {
        let store = InMemoryUserStore::new();
        store.insert(user("second", 5)).await.unwrap();
        store.insert(user("first", 0)).await.unwrap();
        store.insert(user("third", 10)).await.unwrap();

        let page = store.find_page(PageRequest::new(0, 2)).await.unwrap();
        let names: Vec<_> = page.items.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 2);
    }

    #[tokio::test]
    async fn test_unknown_user_does_not_exist() {
        let store = InMemoryUserStore::new();
        assert!(!store.exists(UserId::from_ulid(Ulid::new())).await.unwrap());
    }
}
