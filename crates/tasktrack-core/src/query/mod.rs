//! Read side: filters, page requests and list ordering.

pub mod filter;
pub mod page;

pub use filter::{is_visible, TaskFilter, TaskFilterBuilder, TaskQuery};
pub use page::{paginate, task_order, user_order, Page, PageRequest};
