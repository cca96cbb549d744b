//! Services - ユースケース層
//!
//! サービスは `Arc<dyn Port>` だけを保持し、`Send + Sync`。
//! すべての失敗は `TrackerError` で返し、境界で一度だけログに出す。

pub mod tasks;
pub mod users;

pub use self::tasks::TaskService;
pub use self::users::UserService;

use crate::domain::{ErrorKind, TrackerError};

/// Log a failed operation once, at the service boundary.
pub(crate) fn log_failure(err: &TrackerError) {
    match err.kind() {
        ErrorKind::Internal => tracing::error!(operation = %err.operation(), error = %err, "operation failed"),
        _ => tracing::warn!(operation = %err.operation(), error = %err, "request rejected"),
    }
}
