//! App - アプリケーション層
//!
//! ports と services を組み合わせて `App` を組み立てる。

pub mod builder;

pub use self::builder::{App, AppBuilder, BuildError};
