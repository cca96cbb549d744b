//! Errors - エラー型と分類
//!
//! すべての失敗は `TrackerError` として呼び出し側へ返す。
//! 各バリアントは operation と識別子/理由を持つので、
//! 呼び出し側はロギングの仕組みを知らずに報告できる。

use std::fmt;

use thiserror::Error;

/// ErrorKind は呼び出し側（transport）向けの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Conflict,
    Internal,
}

/// The operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateTask,
    GetTask,
    ListTasks,
    UpdateTask,
    DeleteTask,
    CreateUser,
    GetUser,
    ListUsers,
    UpdateUser,
    DeleteUser,
    DecodePayload,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::CreateTask => "create_task",
            Operation::GetTask => "get_task",
            Operation::ListTasks => "list_tasks",
            Operation::UpdateTask => "update_task",
            Operation::DeleteTask => "delete_task",
            Operation::CreateUser => "create_user",
            Operation::GetUser => "get_user",
            Operation::ListUsers => "list_users",
            Operation::UpdateUser => "update_user",
            Operation::DeleteUser => "delete_user",
            Operation::DecodePayload => "decode_payload",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of entity a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Task,
    User,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Task => f.write_str("task"),
            Entity::User => f.write_str("user"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("{operation}: {entity} not found with id {id}")]
    NotFound {
        entity: Entity,
        id: String,
        operation: Operation,
    },

    #[error("{operation}: bad request: {reason}")]
    BadRequest { operation: Operation, reason: String },

    #[error("{operation}: conflict: {reason}")]
    Conflict { operation: Operation, reason: String },

    #[error("{operation}: storage failure: {reason}")]
    Storage { operation: Operation, reason: String },
}

impl TrackerError {
    pub fn not_found(entity: Entity, id: impl ToString, operation: Operation) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
            operation,
        }
    }

    pub fn bad_request(operation: Operation, reason: impl Into<String>) -> Self {
        Self::BadRequest {
            operation,
            reason: reason.into(),
        }
    }

    pub fn conflict(operation: Operation, reason: impl Into<String>) -> Self {
        Self::Conflict {
            operation,
            reason: reason.into(),
        }
    }

    pub fn storage(operation: Operation, reason: impl Into<String>) -> Self {
        Self::Storage {
            operation,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TrackerError::NotFound { .. } => ErrorKind::NotFound,
            TrackerError::BadRequest { .. } => ErrorKind::BadRequest,
            TrackerError::Conflict { .. } => ErrorKind::Conflict,
            TrackerError::Storage { .. } => ErrorKind::Internal,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            TrackerError::NotFound { operation, .. }
            | TrackerError::BadRequest { operation, .. }
            | TrackerError::Conflict { operation, .. }
            | TrackerError::Storage { operation, .. } => *operation,
        }
    }
}

/// Field-level validation failure, raised before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn into_tracker(self, operation: Operation) -> TrackerError {
        TrackerError::bad_request(operation, self.to_string())
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
