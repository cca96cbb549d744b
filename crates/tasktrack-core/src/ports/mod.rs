//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」。サービス層はここの trait にだけ依存し、
//! 実装（`impls`）は `AppBuilder` で差し込む。
//!
//! - `TaskStore`: タスクレコードの正本
//! - `UserDirectory` / `UserStore`: ユーザーの参照と管理
//! - `Clock` / `IdGenerator`: 時刻と ID（テストで固定できる）

pub mod clock;
pub mod id_generator;
pub mod store_error;
pub mod task_store;
pub mod user_directory;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::store_error::{StoreError, StoreResult};
pub use self::task_store::TaskStore;
pub use self::user_directory::{UserDirectory, UserStore};
