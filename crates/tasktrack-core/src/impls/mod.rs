//! Port 実装（in-memory）

pub mod inmem_task_store;
pub mod inmem_user_store;

pub use inmem_task_store::InMemoryTaskStore;
pub use inmem_user_store::InMemoryUserStore;
