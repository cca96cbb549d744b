//! StoreError - ストア adapter 共通のエラー
//!
//! サービス層で `into_tracker(operation)` により `TrackerError::Storage` に変換する。

use crate::domain::{Operation, TrackerError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record {0} already exists")]
    Duplicate(String),

    #[error("record {0} does not exist")]
    Missing(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl StoreError {
    pub fn into_tracker(self, operation: Operation) -> TrackerError {
        TrackerError::storage(operation, self.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
