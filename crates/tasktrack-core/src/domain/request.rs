//! Typed creation / update requests.
//!
//! These are what the transport layer decodes tagged payloads into. The
//! variant is part of the type, so a defect request can never carry feature
//! fields and vice versa.

use chrono::NaiveDate;

use super::errors::ValidationError;
use super::ids::UserId;
use super::task::{DefectDetails, FeatureDetails, Priority, Severity, TaskDetails, TaskStatus, TaskVariant};

pub const NAME_MAX_CHARS: usize = 100;
pub const ENVIRONMENT_MAX_CHARS: usize = 100;

/// Fields shared by both creation payloads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTaskFields {
    pub name: String,
    pub description: Option<String>,
    pub assigned_user_id: Option<UserId>,
    /// `None` means OPEN.
    pub status: Option<TaskStatus>,
}

impl NewTaskFields {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn assigned_to(mut self, user_id: UserId) -> Self {
        self.assigned_user_id = Some(user_id);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDefect {
    pub severity: Severity,
    pub priority: Priority,
    pub steps_to_reproduce: Option<String>,
    pub environment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeature {
    pub business_value: String,
    pub deadline: NaiveDate,
    pub acceptance_criteria: Option<String>,
    pub estimated_effort: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateTaskRequest {
    Defect { common: NewTaskFields, fields: NewDefect },
    Feature { common: NewTaskFields, fields: NewFeature },
}

impl CreateTaskRequest {
    pub fn variant(&self) -> TaskVariant {
        match self {
            CreateTaskRequest::Defect { .. } => TaskVariant::Defect,
            CreateTaskRequest::Feature { .. } => TaskVariant::Feature,
        }
    }

    pub fn common(&self) -> &NewTaskFields {
        match self {
            CreateTaskRequest::Defect { common, .. } | CreateTaskRequest::Feature { common, .. } => common,
        }
    }

    /// Check every field constraint. `today` is the clock's current date;
    /// a feature deadline must be strictly after it.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        validate_name(&self.common().name)?;
        match self {
            CreateTaskRequest::Defect { fields, .. } => {
                validate_environment(fields.environment.as_deref())
            }
            CreateTaskRequest::Feature { fields, .. } => {
                validate_business_value(&fields.business_value)?;
                validate_effort(fields.estimated_effort)?;
                if fields.deadline <= today {
                    return Err(ValidationError::new(
                        "deadline",
                        format!("must be in the future (got {}, today is {today})", fields.deadline),
                    ));
                }
                Ok(())
            }
        }
    }

    pub(crate) fn into_parts(self) -> (NewTaskFields, TaskDetails) {
        match self {
            CreateTaskRequest::Defect { common, fields } => (
                common,
                TaskDetails::Defect(DefectDetails {
                    severity: fields.severity,
                    priority: fields.priority,
                    steps_to_reproduce: fields.steps_to_reproduce,
                    environment: fields.environment,
                }),
            ),
            CreateTaskRequest::Feature { common, fields } => (
                common,
                TaskDetails::Feature(FeatureDetails {
                    business_value: fields.business_value,
                    deadline: fields.deadline,
                    acceptance_criteria: fields.acceptance_criteria,
                    estimated_effort: fields.estimated_effort,
                }),
            ),
        }
    }
}

/// Shared part of a patch. `None` = leave unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommonPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub assigned_user_id: Option<UserId>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DefectPatch {
    pub severity: Option<Severity>,
    pub priority: Option<Priority>,
    pub steps_to_reproduce: Option<String>,
    pub environment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeaturePatch {
    pub business_value: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub acceptance_criteria: Option<String>,
    pub estimated_effort: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateTaskRequest {
    Defect { common: CommonPatch, fields: DefectPatch },
    Feature { common: CommonPatch, fields: FeaturePatch },
}

impl UpdateTaskRequest {
    pub fn variant(&self) -> TaskVariant {
        match self {
            UpdateTaskRequest::Defect { .. } => TaskVariant::Defect,
            UpdateTaskRequest::Feature { .. } => TaskVariant::Feature,
        }
    }

    pub fn common(&self) -> &CommonPatch {
        match self {
            UpdateTaskRequest::Defect { common, .. } | UpdateTaskRequest::Feature { common, .. } => common,
        }
    }

    /// Validate the values that are present. The deadline is only checked
    /// against "today" at creation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.common().name {
            validate_name(name)?;
        }
        match self {
            UpdateTaskRequest::Defect { fields, .. } => validate_environment(fields.environment.as_deref()),
            UpdateTaskRequest::Feature { fields, .. } => {
                if let Some(value) = &fields.business_value {
                    validate_business_value(value)?;
                }
                if let Some(effort) = fields.estimated_effort {
                    validate_effort(effort)?;
                }
                Ok(())
            }
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("name", "must not be blank"));
    }
    let len = name.chars().count();
    if len > NAME_MAX_CHARS {
        return Err(ValidationError::new(
            "name",
            format!("must be at most {NAME_MAX_CHARS} characters (got {len})"),
        ));
    }
    Ok(())
}

fn validate_environment(environment: Option<&str>) -> Result<(), ValidationError> {
    match environment {
        Some(env) if env.chars().count() > ENVIRONMENT_MAX_CHARS => Err(ValidationError::new(
            "environment",
            format!("must be at most {ENVIRONMENT_MAX_CHARS} characters"),
        )),
        _ => Ok(()),
    }
}

fn validate_business_value(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("businessValue", "must not be blank"));
    }
    Ok(())
}

fn validate_effort(effort: u32) -> Result<(), ValidationError> {
    if effort == 0 {
        return Err(ValidationError::new("estimatedEffort", "must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn feature(deadline: NaiveDate, effort: u32) -> CreateTaskRequest {
        CreateTaskRequest::Feature {
            common: NewTaskFields::named("Export"),
            fields: NewFeature {
                business_value: "saves support time".to_string(),
                deadline,
                acceptance_criteria: None,
                estimated_effort: effort,
            },
        }
    }

    fn defect(name: &str, environment: Option<String>) -> CreateTaskRequest {
        CreateTaskRequest::Defect {
            common: NewTaskFields::named(name),
            fields: NewDefect {
                severity: Severity::Medium,
                priority: Priority::Low,
                steps_to_reproduce: None,
                environment,
            },
        }
    }

    #[rstest]
    #[case::yesterday(-1, false)]
    #[case::today(0, false)]
    #[case::tomorrow(1, true)]
    fn deadline_must_be_strictly_in_future(#[case] offset_days: i64, #[case] ok: bool) {
        let deadline = today() + chrono::Duration::days(offset_days);
        let result = feature(deadline, 3).validate(today());
        assert_eq!(result.is_ok(), ok);
        if let Err(e) = result {
            assert_eq!(e.field, "deadline");
        }
    }

    #[test]
    fn zero_effort_is_rejected() {
        let err = feature(today() + chrono::Duration::days(7), 0)
            .validate(today())
            .unwrap_err();
        assert_eq!(err.field, "estimatedEffort");
    }

    #[rstest]
    #[case::blank("   ", false)]
    #[case::empty("", false)]
    #[case::short("Crash on save", true)]
    fn name_must_not_be_blank(#[case] name: &str, #[case] ok: bool) {
        assert_eq!(defect(name, None).validate(today()).is_ok(), ok);
    }

    #[test]
    fn name_length_counts_code_points() {
        let exactly_max = "é".repeat(NAME_MAX_CHARS);
        assert!(defect(&exactly_max, None).validate(today()).is_ok());

        let too_long = "é".repeat(NAME_MAX_CHARS + 1);
        let err = defect(&too_long, None).validate(today()).unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn environment_length_is_bounded() {
        let err = defect("Crash", Some("x".repeat(101))).validate(today()).unwrap_err();
        assert_eq!(err.field, "environment");
    }

    #[test]
    fn patch_validates_only_present_values() {
        let empty = UpdateTaskRequest::Feature {
            common: CommonPatch::default(),
            fields: FeaturePatch::default(),
        };
        assert!(empty.validate().is_ok());

        let blank_name = UpdateTaskRequest::Defect {
            common: CommonPatch {
                name: Some(" ".to_string()),
                ..CommonPatch::default()
            },
            fields: DefectPatch::default(),
        };
        assert_eq!(blank_name.validate().unwrap_err().field, "name");

        let zero_effort = UpdateTaskRequest::Feature {
            common: CommonPatch::default(),
            fields: FeaturePatch {
                estimated_effort: Some(0),
                ..FeaturePatch::default()
            },
        };
        assert_eq!(zero_effort.validate().unwrap_err().field, "estimatedEffort");
    }

    #[test]
    fn patch_does_not_recheck_past_deadline() {
        let patch = UpdateTaskRequest::Feature {
            common: CommonPatch::default(),
            fields: FeaturePatch {
                deadline: Some(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
                ..FeaturePatch::default()
            },
        };
        assert!(patch.validate().is_ok());
    }
}
