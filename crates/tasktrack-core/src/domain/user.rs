//! User record owned by the directory. Tasks only hold a `UserId`.

use chrono::{DateTime, Utc};

use super::errors::ValidationError;
use super::ids::UserId;

pub const FULL_NAME_MIN_CHARS: usize = 3;
pub const FULL_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Unique across all users, soft-deleted ones included.
    pub username: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn create(id: UserId, new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username: new_user.username,
            full_name: new_user.full_name,
            created_at: now,
            deleted: false,
            deleted_at: None,
        }
    }

    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.deleted = true;
        self.deleted_at = Some(now);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            full_name: full_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::new("username", "must not be blank"));
        }
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::new("fullName", "must not be blank"));
        }
        Ok(())
    }
}

/// Only the full name is editable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserUpdate {
    pub full_name: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let Some(full_name) = &self.full_name else {
            return Ok(());
        };
        let len = full_name.chars().count();
        if !(FULL_NAME_MIN_CHARS..=FULL_NAME_MAX_CHARS).contains(&len) {
            return Err(ValidationError::new(
                "fullName",
                format!("must be between {FULL_NAME_MIN_CHARS} and {FULL_NAME_MAX_CHARS} characters"),
            ));
        }
        Ok(())
    }
}
