//! Outbound representations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{
    ErrorKind, Priority, Severity, TaskDetails, TaskId, TaskRecord, TaskStatus, TaskVariant, TrackerError, User,
    UserId,
};
use crate::query::Page;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectView {
    pub severity: Severity,
    pub priority: Priority,
    pub steps_to_reproduce: Option<String>,
    pub environment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureView {
    pub business_value: String,
    pub deadline: NaiveDate,
    pub acceptance_criteria: Option<String>,
    pub estimated_effort: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DetailsView {
    Defect(DefectView),
    Feature(FeatureView),
}

/// Read representation of a task: common fields, then the variant fields inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: TaskId,
    #[serde(rename = "type")]
    pub variant: TaskVariant,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assigned_user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: DetailsView,
}

impl From<&TaskRecord> for TaskView {
    fn from(record: &TaskRecord) -> Self {
        let details = match record.details() {
            TaskDetails::Defect(d) => DetailsView::Defect(DefectView {
                severity: d.severity,
                priority: d.priority,
                steps_to_reproduce: d.steps_to_reproduce.clone(),
                environment: d.environment.clone(),
            }),
            TaskDetails::Feature(f) => DetailsView::Feature(FeatureView {
                business_value: f.business_value.clone(),
                deadline: f.deadline,
                acceptance_criteria: f.acceptance_criteria.clone(),
                estimated_effort: f.estimated_effort,
            }),
        };
        Self {
            id: record.id,
            variant: record.variant(),
            name: record.name.clone(),
            description: record.description.clone(),
            status: record.status,
            assigned_user_id: record.assigned_user_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> PageView<T> {
    pub fn from_page<S>(page: Page<S>, to_view: impl FnMut(S) -> T) -> Self {
        let total_pages = page.total_pages();
        let has_next = page.has_next();
        let has_previous = page.has_previous();
        let page = page.map(to_view);
        Self {
            items: page.items,
            page: page.page,
            size: page.size,
            total_elements: page.total,
            total_pages,
            has_next,
            has_previous,
        }
    }
}

impl From<Page<TaskRecord>> for PageView<TaskView> {
    fn from(page: Page<TaskRecord>) -> Self {
        Self::from_page(page, |r| TaskView::from(&r))
    }
}

impl From<Page<User>> for PageView<UserView> {
    fn from(page: Page<User>) -> Self {
        Self::from_page(page, |u| UserView::from(&u))
    }
}

/// `{ status, error, message }` with an HTTP-like status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorView {
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl ErrorView {
    pub fn status_for(kind: ErrorKind) -> (u16, &'static str) {
        match kind {
            ErrorKind::NotFound => (404, "Not Found"),
            ErrorKind::BadRequest => (400, "Bad Request"),
            ErrorKind::Conflict => (409, "Conflict"),
            ErrorKind::Internal => (500, "Internal Server Error"),
        }
    }
}

impl From<&TrackerError> for ErrorView {
    fn from(err: &TrackerError) -> Self {
        let (status, error) = Self::status_for(err.kind());
        // ストレージの詳細は外に出さない
        let message = match err.kind() {
            ErrorKind::Internal => format!("{}: an unexpected error occurred", err.operation()),
            _ => err.to_string(),
        };
        Self {
            status,
            error: error.to_string(),
            message,
        }
    }
}
