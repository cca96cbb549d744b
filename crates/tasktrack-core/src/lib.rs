//! tasktrack-core
//!
//! タスクトラッカーのコア。ユーザーに割り当てる不具合（defect）と
//! 機能要望（feature）を扱い、フィルタ付きページング一覧と soft delete を持つ。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, user, request, errors）
//! - **query**: フィルタ・ページング・並び順
//! - **ports**: 抽象化レイヤー（TaskStore, UserDirectory, UserStore, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryTaskStore / InMemoryUserStore）
//! - **service**: ユースケース（TaskService, UserService）
//! - **transport**: JSON ペイロード / ビューとの変換
//! - **app**: AppBuilder によるワイヤリング
//! - **config**: 環境変数からの設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod query;
pub mod service;
pub mod transport;

pub use app::{App, AppBuilder, BuildError};
pub use config::TrackerConfig;
pub use domain::{ErrorKind, TrackerError, TrackerResult};
