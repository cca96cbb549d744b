//! UserService - ユーザー管理
//!
//! タスク側は `UserDirectory` 経由で存在確認だけを行う。
//! username は soft delete 済みのユーザーも含めて一意（再作成は `Conflict`）。

use std::sync::Arc;

use crate::config::MAX_PAGE_SIZE;
use crate::domain::{Entity, NewUser, Operation, TrackerError, TrackerResult, User, UserId, UserUpdate};
use crate::ports::{Clock, IdGenerator, UserStore};
use crate::query::{Page, PageRequest};

use super::log_failure;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    max_page_size: u32,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store,
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

    #[tracing::instrument(skip(self, new_user), fields(username = %new_user.username))]
    pub async fn create(&self, new_user: NewUser) -> TrackerResult<User> {
        self.create_inner(new_user).await.inspect_err(log_failure)
    }

    #[tracing::instrument(skip(self, id), fields(user_id = %id))]
    pub async fn get(&self, id: UserId) -> TrackerResult<User> {
        self.load(id, Operation::GetUser).await.inspect_err(log_failure)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, page: PageRequest) -> TrackerResult<Page<User>> {
        let page = page.clamp_to(self.max_page_size);
        tracing::debug!(page = page.page(), size = page.size(), "listing users");
        self.store
            .find_page(page)
            .await
            .map_err(|e| e.into_tracker(Operation::ListUsers))
            .inspect_err(log_failure)
    }

    #[tracing::instrument(skip(self, id, update), fields(user_id = %id))]
    pub async fn update(&self, id: UserId, update: UserUpdate) -> TrackerResult<User> {
        self.update_inner(id, update).await.inspect_err(log_failure)
    }

    #[tracing::instrument(skip(self, id), fields(user_id = %id))]
    pub async fn delete(&self, id: UserId) -> TrackerResult<()> {
        self.delete_inner(id).await.inspect_err(log_failure)
    }

    async fn create_inner(&self, new_user: NewUser) -> TrackerResult<User> {
        let op = Operation::CreateUser;
        new_user.validate().map_err(|e| e.into_tracker(op))?;

        let taken = self
            .store
            .username_taken(&new_user.username)
            .await
            .map_err(|e| e.into_tracker(op))?;
        if taken {
            return Err(TrackerError::conflict(
                op,
                format!("username {} is already taken", new_user.username),
            ));
        }

        let user = User::create(self.ids.generate_user_id(), new_user, self.clock.now());
        self.store
            .insert(user.clone())
            .await
            .map_err(|e| e.into_tracker(op))?;

        tracing::info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn update_inner(&self, id: UserId, update: UserUpdate) -> TrackerResult<User> {
        let op = Operation::UpdateUser;
        let mut user = self.load(id, op).await?;
        update.validate().map_err(|e| e.into_tracker(op))?;

        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        self.store
            .save(user.clone())
            .await
            .map_err(|e| e.into_tracker(op))?;

        tracing::info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    async fn delete_inner(&self, id: UserId) -> TrackerResult<()> {
        let op = Operation::DeleteUser;
        let mut user = self.load(id, op).await?;
        user.soft_delete(self.clock.now());
        self.store.save(user).await.map_err(|e| e.into_tracker(op))?;

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn load(&self, id: UserId, op: Operation) -> TrackerResult<User> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| e.into_tracker(op))?
            .ok_or_else(|| TrackerError::not_found(Entity::User, id, op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::impls::InMemoryUserStore;
    use crate::ports::{FixedClock, UlidGenerator};
    use chrono::{Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()))
    }

    fn service(clock: &Arc<FixedClock>) -> UserService {
        UserService::new(
            Arc::new(InMemoryUserStore::new()),
            clock.clone(),
            Arc::new(UlidGenerator::new(clock.clone())),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_and_get(clock: Arc<FixedClock>) {
        let users = service(&clock);
        let created = users.create(NewUser::new("jdoe", "Jane Doe")).await.unwrap();
        assert_eq!(created.created_at, clock.now());
        assert_eq!(users.get(created.id).await.unwrap(), created);
    }

    #[rstest]
    #[tokio::test]
    async fn test_duplicate_username_is_conflict(clock: Arc<FixedClock>) {
        let users = service(&clock);
        users.create(NewUser::new("jdoe", "Jane Doe")).await.unwrap();
        let err = users.create(NewUser::new("jdoe", "John Doe")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn test_username_stays_reserved_after_delete(clock: Arc<FixedClock>) {
        let users = service(&clock);
        let created = users.create(NewUser::new("jdoe", "Jane Doe")).await.unwrap();
        users.delete(created.id).await.unwrap();

        assert_eq!(users.get(created.id).await.unwrap_err().kind(), ErrorKind::NotFound);
        let err = users.create(NewUser::new("jdoe", "Jane Again")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[rstest]
    #[case::too_short("Al")]
    #[case::too_long(&"x".repeat(101))]
    #[tokio::test]
    async fn test_invalid_full_name_leaves_user_untouched(clock: Arc<FixedClock>, #[case] full_name: &str) {
        let users = service(&clock);
        let created = users.create(NewUser::new("aturing", "A. Turing")).await.unwrap();

        let update = UserUpdate {
            full_name: Some(full_name.to_string()),
        };
        let err = users.update(created.id, update).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(users.get(created.id).await.unwrap().full_name, "A. Turing");
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_full_name(clock: Arc<FixedClock>) {
        let users = service(&clock);
        let created = users.create(NewUser::new("aturing", "A. Turing")).await.unwrap();

        let update = UserUpdate {
            full_name: Some("Alan Turing".to_string()),
        };
        let updated = users.update(created.id, update).await.unwrap();
        assert_eq!(updated.full_name, "Alan Turing");
        assert_eq!(updated.username, "aturing");

        let ghost = UserId::from_ulid(ulid::Ulid::new());
        let err = users.update(ghost, UserUpdate::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn test_list_is_oldest_first_without_deleted(clock: Arc<FixedClock>) {
        let users = service(&clock);
        let first = users.create(NewUser::new("first", "First User")).await.unwrap();
        clock.advance(Duration::seconds(1));
        let second = users.create(NewUser::new("second", "Second User")).await.unwrap();
        clock.advance(Duration::seconds(1));
        let third = users.create(NewUser::new("third", "Third User")).await.unwrap();
        users.delete(second.id).await.unwrap();

        let page = users.list(PageRequest::new(0, 10)).await.unwrap();
        let ids: Vec<_> = page.items.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![first.id, third.id]);
        assert_eq!(page.total, 2);
    }
}
