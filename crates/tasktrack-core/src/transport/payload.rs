//! Inbound payloads.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::config::TrackerConfig;
use crate::domain::{
    CommonPatch, CreateTaskRequest, DefectPatch, FeaturePatch, NewDefect, NewFeature, NewTaskFields, NewUser,
    Operation, Priority, Severity, TaskStatus, TrackerError, TrackerResult, UpdateTaskRequest, UserId, UserUpdate,
};
use crate::query::{PageRequest, TaskQuery};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonCreateBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_user_id: Option<UserId>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectCreateBody {
    #[serde(flatten)]
    pub common: CommonCreateBody,
    pub severity: Severity,
    pub priority: Priority,
    #[serde(default)]
    pub steps_to_reproduce: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCreateBody {
    #[serde(flatten)]
    pub common: CommonCreateBody,
    pub business_value: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub acceptance_criteria: Option<String>,
    pub estimated_effort: u32,
}

/// `{"type": "DEFECT" | "FEATURE", ...}`. `BUG` is read as `DEFECT`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreateTaskPayload {
    #[serde(alias = "BUG")]
    Defect(DefectCreateBody),
    Feature(FeatureCreateBody),
}

impl From<CommonCreateBody> for NewTaskFields {
    fn from(body: CommonCreateBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            assigned_user_id: body.assigned_user_id,
            status: body.status,
        }
    }
}

impl From<CreateTaskPayload> for CreateTaskRequest {
    fn from(payload: CreateTaskPayload) -> Self {
        match payload {
            CreateTaskPayload::Defect(body) => CreateTaskRequest::Defect {
                common: body.common.into(),
                fields: NewDefect {
                    severity: body.severity,
                    priority: body.priority,
                    steps_to_reproduce: body.steps_to_reproduce,
                    environment: body.environment,
                },
            },
            CreateTaskPayload::Feature(body) => CreateTaskRequest::Feature {
                common: body.common.into(),
                fields: NewFeature {
                    business_value: body.business_value,
                    deadline: body.deadline,
                    acceptance_criteria: body.acceptance_criteria,
                    estimated_effort: body.estimated_effort,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonUpdateBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub assigned_user_id: Option<UserId>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectUpdateBody {
    #[serde(flatten)]
    pub common: CommonUpdateBody,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub steps_to_reproduce: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureUpdateBody {
    #[serde(flatten)]
    pub common: CommonUpdateBody,
    #[serde(default)]
    pub business_value: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub acceptance_criteria: Option<String>,
    #[serde(default)]
    pub estimated_effort: Option<u32>,
}

/// Same tag as creation; every other field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateTaskPayload {
    #[serde(alias = "BUG")]
    Defect(DefectUpdateBody),
    Feature(FeatureUpdateBody),
}

impl From<CommonUpdateBody> for CommonPatch {
    fn from(body: CommonUpdateBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            assigned_user_id: body.assigned_user_id,
            status: body.status,
        }
    }
}

impl From<UpdateTaskPayload> for UpdateTaskRequest {
    fn from(payload: UpdateTaskPayload) -> Self {
        match payload {
            UpdateTaskPayload::Defect(body) => UpdateTaskRequest::Defect {
                common: body.common.into(),
                fields: DefectPatch {
                    severity: body.severity,
                    priority: body.priority,
                    steps_to_reproduce: body.steps_to_reproduce,
                    environment: body.environment,
                },
            },
            UpdateTaskPayload::Feature(body) => UpdateTaskRequest::Feature {
                common: body.common.into(),
                fields: FeaturePatch {
                    business_value: body.business_value,
                    deadline: body.deadline,
                    acceptance_criteria: body.acceptance_criteria,
                    estimated_effort: body.estimated_effort,
                },
            },
        }
    }
}

/// List query parameters (`assignedUserId`, `status`, `name`, `page`, `size`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListTasksParams {
    pub assigned_user_id: Option<UserId>,
    pub status: Option<TaskStatus>,
    pub name: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ListTasksParams {
    pub fn into_query(self, config: &TrackerConfig) -> (TaskQuery, PageRequest) {
        let query = TaskQuery {
            assignee: self.assigned_user_id,
            status: self.status,
            name_contains: self.name,
        };
        (query, PageRequest::from_params(self.page, self.size, config))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    pub username: String,
    pub full_name: String,
}

impl From<CreateUserPayload> for NewUser {
    fn from(payload: CreateUserPayload) -> Self {
        NewUser::new(payload.username, payload.full_name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserPayload {
    pub full_name: Option<String>,
}

impl From<UpdateUserPayload> for UserUpdate {
    fn from(payload: UpdateUserPayload) -> Self {
        UserUpdate {
            full_name: payload.full_name,
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> TrackerResult<T> {
    serde_json::from_value(value).map_err(|e| TrackerError::bad_request(Operation::DecodePayload, e.to_string()))
}

pub fn decode_create(value: Value) -> TrackerResult<CreateTaskRequest> {
    decode::<CreateTaskPayload>(value).map(Into::into)
}

pub fn decode_update(value: Value) -> TrackerResult<UpdateTaskRequest> {
    decode::<UpdateTaskPayload>(value).map(Into::into)
}

pub fn decode_list_params(value: Value) -> TrackerResult<ListTasksParams> {
    decode(value)
}

pub fn decode_user_create(value: Value) -> TrackerResult<NewUser> {
    decode::<CreateUserPayload>(value).map(Into::into)
}

pub fn decode_user_update(value: Value) -> TrackerResult<UserUpdate> {
    decode::<UpdateUserPayload>(value).map(Into::into)
}
