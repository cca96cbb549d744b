//! ドメインモデル（ID, タスク, ユーザー, リクエスト, エラー）
//!
//! ドメイン層は ports / impls に依存しない。

pub mod errors;
pub mod ids;
pub mod request;
pub mod task;
pub mod user;

pub use errors::{Entity, ErrorKind, Operation, TrackerError, TrackerResult, ValidationError};
pub use ids::{TaskId, UserId};
pub use request::{
    CommonPatch, CreateTaskRequest, DefectPatch, FeaturePatch, NewDefect, NewFeature, NewTaskFields,
    UpdateTaskRequest,
};
pub use task::{
    DefectDetails, FeatureDetails, Priority, Severity, TaskDetails, TaskRecord, TaskStatus, TaskVariant,
    VariantMismatch,
};
pub use user::{NewUser, User, UserUpdate};
