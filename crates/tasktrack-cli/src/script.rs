//! Scripted requests.
//!
//! A script is a JSON array of steps. Each step names an operation (`op`),
//! and creation steps may capture the new id under a name (`as`). Any string
//! value `"$name"` in a later step is replaced by the captured id before the
//! step is decoded.
//!
//! ```json
//! [
//!   {"op": "createUser", "as": "alice", "body": {"username": "alice", "fullName": "Alice Liddell"}},
//!   {"op": "createTask", "as": "crash", "body": {"type": "DEFECT", "name": "Crash", "severity": "HIGH",
//!    "priority": "HIGH", "assignedUserId": "$alice"}},
//!   {"op": "deleteTask", "id": "$crash"}
//! ]
//! ```

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::Instrument;

use tasktrack_core::domain::{Operation, TaskId, UserId};
use tasktrack_core::query::PageRequest;
use tasktrack_core::transport::{self, ErrorView, PageView, TaskView, UserView};
use tasktrack_core::{App, TrackerError, TrackerResult};

/// The built-in demo, used when no script path is given.
pub const DEMO_SCRIPT: &str = include_str!("../scripts/demo.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    CreateUser {
        #[serde(rename = "as")]
        alias: Option<String>,
        body: Value,
    },
    GetUser {
        id: String,
    },
    ListUsers {
        page: Option<u32>,
        size: Option<u32>,
    },
    UpdateUser {
        id: String,
        body: Value,
    },
    DeleteUser {
        id: String,
    },
    CreateTask {
        #[serde(rename = "as")]
        alias: Option<String>,
        body: Value,
    },
    GetTask {
        id: String,
    },
    ListTasks {
        params: Option<Value>,
    },
    UpdateTask {
        id: String,
        body: Value,
    },
    DeleteTask {
        id: String,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::CreateUser { .. } => "createUser",
            Step::GetUser { .. } => "getUser",
            Step::ListUsers { .. } => "listUsers",
            Step::UpdateUser { .. } => "updateUser",
            Step::DeleteUser { .. } => "deleteUser",
            Step::CreateTask { .. } => "createTask",
            Step::GetTask { .. } => "getTask",
            Step::ListTasks { .. } => "listTasks",
            Step::UpdateTask { .. } => "updateTask",
            Step::DeleteTask { .. } => "deleteTask",
        }
    }
}

/// One line of output per step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub op: String,
    pub status: u16,
    pub body: Value,
}

pub fn parse_script(source: &str) -> Result<Vec<Value>> {
    serde_json::from_str(source).context("script must be a JSON array of steps")
}

pub struct ScriptRunner {
    app: App,
    captured: HashMap<String, String>,
}

impl ScriptRunner {
    pub fn new(app: App) -> Self {
        Self {
            app,
            captured: HashMap::new(),
        }
    }

    /// Run one raw step inside its own `request` span.
    pub async fn run_step(&mut self, index: usize, raw: Value) -> Result<StepOutcome> {
        let raw = self.substitute(raw);
        let op = raw
            .get("op")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let span = tracing::info_span!("request", request_id = %format!("req-{index:04}"), op = %op);

        async move {
            let result = match serde_json::from_value::<Step>(raw) {
                Ok(step) => self.execute(step).await,
                Err(e) => Err(TrackerError::bad_request(Operation::DecodePayload, e.to_string())),
            };
            let (status, body) = match result {
                Ok(success) => success,
                Err(err) => {
                    let view = ErrorView::from(&err);
                    (view.status, to_json(&view)?)
                }
            };
            tracing::info!(status, "request finished");
            Ok::<_, anyhow::Error>(StepOutcome {
                step: index,
                op,
                status,
                body,
            })
        }
        .instrument(span)
        .await
    }

    async fn execute(&mut self, step: Step) -> TrackerResult<(u16, Value)> {
        let app = &self.app;
        match step {
            Step::CreateUser { alias, body } => {
                let user = app.users.create(transport::decode_user_create(body)?).await?;
                self.capture(alias, user.id.to_string());
                Ok((201, to_json(&UserView::from(&user)).map_err(internal(Operation::CreateUser))?))
            }
            Step::GetUser { id } => {
                let user = app.users.get(parse_id::<UserId>(&id)?).await?;
                Ok((200, to_json(&UserView::from(&user)).map_err(internal(Operation::GetUser))?))
            }
            Step::ListUsers { page, size } => {
                let request = PageRequest::from_params(page, size, &app.config);
                let view = PageView::<UserView>::from(app.users.list(request).await?);
                Ok((200, to_json(&view).map_err(internal(Operation::ListUsers))?))
            }
            Step::UpdateUser { id, body } => {
                let id = parse_id::<UserId>(&id)?;
                let user = app.users.update(id, transport::decode_user_update(body)?).await?;
                Ok((200, to_json(&UserView::from(&user)).map_err(internal(Operation::UpdateUser))?))
            }
            Step::DeleteUser { id } => {
                app.users.delete(parse_id::<UserId>(&id)?).await?;
                Ok((204, Value::Null))
            }
            Step::CreateTask { alias, body } => {
                let task = app.tasks.create(transport::decode_create(body)?).await?;
                self.capture(alias, task.id.to_string());
                Ok((201, to_json(&TaskView::from(&task)).map_err(internal(Operation::CreateTask))?))
            }
            Step::GetTask { id } => {
                let task = app.tasks.get(parse_id::<TaskId>(&id)?).await?;
                Ok((200, to_json(&TaskView::from(&task)).map_err(internal(Operation::GetTask))?))
            }
            Step::ListTasks { params } => {
                let params = transport::decode_list_params(params.unwrap_or_else(|| Value::Object(Map::new())))?;
                let (query, page) = params.into_query(&app.config);
                let view = PageView::<TaskView>::from(app.tasks.list(query, page).await?);
                Ok((200, to_json(&view).map_err(internal(Operation::ListTasks))?))
            }
            Step::UpdateTask { id, body } => {
                let id = parse_id::<TaskId>(&id)?;
                let task = app.tasks.update(id, transport::decode_update(body)?).await?;
                Ok((200, to_json(&TaskView::from(&task)).map_err(internal(Operation::UpdateTask))?))
            }
            Step::DeleteTask { id } => {
                app.tasks.delete(parse_id::<TaskId>(&id)?).await?;
                Ok((204, Value::Null))
            }
        }
    }

    fn capture(&mut self, alias: Option<String>, id: String) {
        if let Some(alias) = alias {
            self.captured.insert(alias, id);
        }
    }

    fn substitute(&self, value: Value) -> Value {
        match value {
            Value::String(s) => match s.strip_prefix('$').and_then(|name| self.captured.get(name)) {
                Some(id) => Value::String(id.clone()),
                None => Value::String(s),
            },
            Value::Array(items) => Value::Array(items.into_iter().map(|v| self.substitute(v)).collect()),
            Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, self.substitute(v))).collect()),
            other => other,
        }
    }
}

fn parse_id<T>(raw: &str) -> TrackerResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| TrackerError::bad_request(Operation::DecodePayload, e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}

fn internal(operation: Operation) -> impl Fn(serde_json::Error) -> TrackerError {
    move |e| TrackerError::storage(operation, format!("response encoding failed: {e}"))
}
