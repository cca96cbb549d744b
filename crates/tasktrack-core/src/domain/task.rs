//! Task record: common fields + variant-specific details.
//!
//! A task is either a defect or a feature request. The shared part lives on
//! `TaskRecord` and the variant part in `TaskDetails`, so every match over
//! variants is exhaustive and a record can never carry both payloads.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::errors::{Operation, TrackerError, ValidationError};
use super::ids::{TaskId, UserId};
use super::request::{CommonPatch, CreateTaskRequest, DefectPatch, FeaturePatch, UpdateTaskRequest};

/// Variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskVariant {
    #[serde(alias = "BUG")]
    Defect,
    Feature,
}

impl TaskVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskVariant::Defect => "DEFECT",
            TaskVariant::Feature => "FEATURE",
        }
    }
}

impl fmt::Display for TaskVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Open,
    InProgress,
    Done,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefectDetails {
    pub severity: Severity,
    pub priority: Priority,
    pub steps_to_reproduce: Option<String>,
    pub environment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDetails {
    /// Opaque business value (free text).
    pub business_value: String,
    pub deadline: NaiveDate,
    pub acceptance_criteria: Option<String>,
    /// Story points, always >= 1.
    pub estimated_effort: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskDetails {
    Defect(DefectDetails),
    Feature(FeatureDetails),
}

impl TaskDetails {
    pub fn variant(&self) -> TaskVariant {
        match self {
            TaskDetails::Defect(_) => TaskVariant::Defect,
            TaskDetails::Feature(_) => TaskVariant::Feature,
        }
    }
}

/// Raised when a variant-specific accessor or patch targets the other variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected a {expected} task, found {actual}")]
pub struct VariantMismatch {
    pub expected: TaskVariant,
    pub actual: TaskVariant,
}

impl VariantMismatch {
    pub fn into_tracker(self, operation: Operation) -> TrackerError {
        TrackerError::bad_request(operation, self.to_string())
    }
}

/// A stored task.
///
/// Design:
/// - Single source of truth for a task; stores hold whole records.
/// - `apply` and `soft_delete` refresh `updated_at`. Writing the pub fields
///   directly does not, and bypasses the patch validation.
/// - `details` decides the variant, which is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assigned_user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    details: TaskDetails,
}

impl TaskRecord {
    /// Validate a creation request and build a fresh record from it.
    ///
    /// The deadline check uses the UTC date of `now`.
    pub fn create(id: TaskId, request: CreateTaskRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        request.validate(now.date_naive())?;
        let (common, details) = request.into_parts();
        Ok(Self {
            id,
            name: common.name,
            description: common.description,
            status: common.status.unwrap_or_default(),
            assigned_user_id: common.assigned_user_id,
            created_at: now,
            updated_at: now,
            deleted: false,
            deleted_at: None,
            details,
        })
    }

    pub fn variant(&self) -> TaskVariant {
        self.details.variant()
    }

    pub fn details(&self) -> &TaskDetails {
        &self.details
    }

    pub fn defect(&self) -> Result<&DefectDetails, VariantMismatch> {
        match &self.details {
            TaskDetails::Defect(d) => Ok(d),
            TaskDetails::Feature(_) => Err(self.mismatch(TaskVariant::Defect)),
        }
    }

    pub fn feature(&self) -> Result<&FeatureDetails, VariantMismatch> {
        match &self.details {
            TaskDetails::Feature(f) => Ok(f),
            TaskDetails::Defect(_) => Err(self.mismatch(TaskVariant::Feature)),
        }
    }

    pub fn severity(&self) -> Result<Severity, VariantMismatch> {
        self.defect().map(|d| d.severity)
    }

    pub fn priority(&self) -> Result<Priority, VariantMismatch> {
        self.defect().map(|d| d.priority)
    }

    pub fn deadline(&self) -> Result<NaiveDate, VariantMismatch> {
        self.feature().map(|f| f.deadline)
    }

    pub fn estimated_effort(&self) -> Result<u32, VariantMismatch> {
        self.feature().map(|f| f.estimated_effort)
    }

    fn mismatch(&self, expected: TaskVariant) -> VariantMismatch {
        VariantMismatch {
            expected,
            actual: self.variant(),
        }
    }

    /// Merge a patch into this record.
    ///
    /// The variant is checked before any field is touched, so a mismatch
    /// leaves the record exactly as it was.
    pub fn apply(&mut self, patch: UpdateTaskRequest, now: DateTime<Utc>) -> Result<(), VariantMismatch> {
        if patch.variant() != self.variant() {
            return Err(VariantMismatch {
                expected: self.variant(),
                actual: patch.variant(),
            });
        }

        match patch {
            UpdateTaskRequest::Defect { common, fields } => {
                self.merge_common(common);
                if let TaskDetails::Defect(details) = &mut self.details {
                    merge_defect(details, fields);
                }
            }
            UpdateTaskRequest::Feature { common, fields } => {
                self.merge_common(common);
                if let TaskDetails::Feature(details) = &mut self.details {
                    merge_feature(details, fields);
                }
            }
        }

        self.updated_at = now;
        Ok(())
    }

    fn merge_common(&mut self, patch: CommonPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(user_id) = patch.assigned_user_id {
            self.assigned_user_id = Some(user_id);
        }
    }

    /// Mark as deleted. The record stays in storage.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.deleted = true;
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

fn merge_defect(details: &mut DefectDetails, patch: DefectPatch) {
    if let Some(severity) = patch.severity {
        details.severity = severity;
    }
    if let Some(priority) = patch.priority {
        details.priority = priority;
    }
    if let Some(steps) = patch.steps_to_reproduce {
        details.steps_to_reproduce = Some(steps);
    }
    if let Some(environment) = patch.environment {
        details.environment = Some(environment);
    }
}

fn merge_feature(details: &mut FeatureDetails, patch: FeaturePatch) {
    if let Some(value) = patch.business_value {
        details.business_value = value;
    }
    if let Some(deadline) = patch.deadline {
        details.deadline = deadline;
    }
    if let Some(criteria) = patch.acceptance_criteria {
        details.acceptance_criteria = Some(criteria);
    }
    if let Some(effort) = patch.estimated_effort {
        details.estimated_effort = effort;
    }
}
