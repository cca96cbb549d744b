//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 未指定の port は in-memory 実装 / SystemClock / UlidGenerator で埋める

use std::sync::Arc;

use crate::config::TrackerConfig;
use crate::impls::{InMemoryTaskStore, InMemoryUserStore};
use crate::ports::{Clock, IdGenerator, SystemClock, TaskStore, UlidGenerator, UserDirectory, UserStore};
use crate::service::{TaskService, UserService};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .config(TrackerConfig::from_env())
///     .clock(Arc::new(FixedClock::new(now)))
///     .build()?;
/// let task = app.tasks.create(request).await?;
/// ```
#[derive(Default)]
pub struct AppBuilder {
    config: Option<TrackerConfig>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    task_store: Option<Arc<dyn TaskStore>>,
    user_store: Option<(Arc<dyn UserStore>, Arc<dyn UserDirectory>)>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("max_page_size must be at least 1")]
    ZeroMaxPageSize,

    #[error("default_page_size ({default}) must be between 1 and max_page_size ({max})")]
    DefaultPageSizeOutOfRange { default: u32, max: u32 },
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn task_store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.task_store = Some(store);
        self
    }

    /// 同じ store を UserService（管理）と TaskService（参照）の両方に渡す
    pub fn user_store<S: UserStore + 'static>(mut self, store: Arc<S>) -> Self {
        let manage: Arc<dyn UserStore> = store.clone();
        let lookup: Arc<dyn UserDirectory> = store;
        self.user_store = Some((manage, lookup));
        self
    }

    /// AppBuilder を構築して App を生成
    ///
    /// # 検証
    /// - `max_page_size >= 1`
    /// - `1 <= default_page_size <= max_page_size`
    pub fn build(self) -> Result<App, BuildError> {
        let config = self.config.unwrap_or_default();
        validate_config(&config)?;

        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let ids: Arc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Arc::new(UlidGenerator::new(clock.clone())),
        };
        let task_store: Arc<dyn TaskStore> = match self.task_store {
            Some(store) => store,
            None => Arc::new(InMemoryTaskStore::new()),
        };
        let (user_store, user_directory) = match self.user_store {
            Some(pair) => pair,
            None => {
                let store = Arc::new(InMemoryUserStore::new());
                let manage: Arc<dyn UserStore> = store.clone();
                let lookup: Arc<dyn UserDirectory> = store;
                (manage, lookup)
            }
        };

        tracing::debug!(
            default_page_size = config.default_page_size,
            max_page_size = config.max_page_size,
            "app built"
        );

        Ok(App {
            tasks: TaskService::new(task_store, user_directory, clock.clone(), ids.clone())
                .with_max_page_size(config.max_page_size),
            users: UserService::new(user_store, clock, ids).with_max_page_size(config.max_page_size),
            config,
        })
    }
}

fn validate_config(config: &TrackerConfig) -> Result<(), BuildError> {
    if config.max_page_size == 0 {
        return Err(BuildError::ZeroMaxPageSize);
    }
    if config.default_page_size == 0 || config.default_page_size > config.max_page_size {
        return Err(BuildError::DefaultPageSizeOutOfRange {
            default: config.default_page_size,
            max: config.max_page_size,
        });
    }
    Ok(())
}

/// App は構築済みのサービス一式
#[derive(Clone)]
pub struct App {
    pub tasks: TaskService,
    pub users: UserService,
    pub config: TrackerConfig,
}
