//! Task filters built from optional criteria.
//!
//! `TaskFilterBuilder` only adds a predicate for criteria that are present,
//! and each predicate carries a name so a filter can be logged and inspected
//! without a store. A filter matches when every predicate matches.
//!
//! Soft-deleted records are not handled here: stores drop them before any
//! filter runs (see [`is_visible`]).

use std::fmt;
use std::sync::Arc;

use crate::domain::{TaskRecord, TaskStatus, UserId};

type Predicate = Arc<dyn Fn(&TaskRecord) -> bool + Send + Sync>;

#[derive(Clone)]
struct NamedPredicate {
    name: &'static str,
    test: Predicate,
}

/// A conjunction of named predicates over task records.
#[derive(Clone, Default)]
pub struct TaskFilter {
    predicates: Vec<NamedPredicate>,
}

impl TaskFilter {
    pub fn builder() -> TaskFilterBuilder {
        TaskFilterBuilder::default()
    }

    /// Matches every visible record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, record: &TaskRecord) -> bool {
        self.predicates.iter().all(|p| (p.test)(record))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.predicates.iter().map(|p| p.name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFilter").field("predicates", &self.names()).finish()
    }
}

#[derive(Default)]
pub struct TaskFilterBuilder {
    predicates: Vec<NamedPredicate>,
}

impl TaskFilterBuilder {
    fn push(mut self, name: &'static str, test: impl Fn(&TaskRecord) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(NamedPredicate {
            name,
            test: Arc::new(test),
        });
        self
    }

    pub fn assignee(self, user_id: Option<UserId>) -> Self {
        match user_id {
            Some(id) => self.push("assignee", move |r| r.assigned_user_id == Some(id)),
            None => self,
        }
    }

    pub fn status(self, status: Option<TaskStatus>) -> Self {
        match status {
            Some(status) => self.push("status", move |r| r.status == status),
            None => self,
        }
    }

    /// Case-insensitive substring match on the name. Blank terms are ignored.
    pub fn name_contains(self, term: Option<&str>) -> Self {
        match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(term) => {
                let needle = term.to_lowercase();
                self.push("name_contains", move |r| r.name.to_lowercase().contains(&needle))
            }
            None => self,
        }
    }

    pub fn build(self) -> TaskFilter {
        TaskFilter {
            predicates: self.predicates,
        }
    }
}

/// Caller-facing list criteria. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub assignee: Option<UserId>,
    pub status: Option<TaskStatus>,
    pub name_contains: Option<String>,
}

impl TaskQuery {
    pub fn to_filter(&self) -> TaskFilter {
        TaskFilter::builder()
            .assignee(self.assignee)
            .status(self.status)
            .name_contains(self.name_contains.as_deref())
            .build()
    }
}

/// Mandatory read predicate applied by every store before filters.
pub fn is_visible(record: &TaskRecord) -> bool {
    !record.deleted
}
