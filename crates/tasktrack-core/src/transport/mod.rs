//! Transport mapping - 外部表現（JSON）とドメイン型の変換
//!
//! - 入力: `type` フィールドで判別するタグ付きペイロード → `CreateTaskRequest` / `UpdateTaskRequest`
//! - 出力: camelCase の `TaskView` / `UserView` / `PageView` / `ErrorView`
//!
//! デコードの失敗（タグ不明・必須フィールド欠落・enum 値不正）は
//! すべて `BadRequest` になり、serde のメッセージを理由として持つ。

pub mod payload;
pub mod view;

pub use self::payload::{
    decode_create, decode_list_params, decode_update, decode_user_create, decode_user_update, CreateTaskPayload,
    CreateUserPayload, ListTasksParams, UpdateTaskPayload, UpdateUserPayload,
};
pub use self::view::{ErrorView, PageView, TaskView, UserView};
