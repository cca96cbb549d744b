#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tasktrack_core::domain::{
    CreateTaskRequest, NewDefect, NewFeature, NewTaskFields, NewUser, Priority, Severity, UserId,
};
use tasktrack_core::impls::{InMemoryTaskStore, InMemoryUserStore};
use tasktrack_core::ports::{Clock, FixedClock, UlidGenerator};
use tasktrack_core::{App, AppBuilder};

pub struct TestApp {
    pub app: App,
    pub clock: Arc<FixedClock>,
    pub tasks: Arc<InMemoryTaskStore>,
    pub users: Arc<InMemoryUserStore>,
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

pub fn test_app() -> TestApp {
    let clock = Arc::new(FixedClock::new(start()));
    let tasks = Arc::new(InMemoryTaskStore::new());
    let users = Arc::new(InMemoryUserStore::new());
    let app = AppBuilder::new()
        .clock(clock.clone())
        .id_generator(Arc::new(UlidGenerator::new(clock.clone())))
        .task_store(tasks.clone())
        .user_store(users.clone())
        .build()
        .unwrap();
    TestApp {
        app,
        clock,
        tasks,
        users,
    }
}

impl TestApp {
    pub async fn user(&self, username: &str) -> UserId {
        self.app
            .users
            .create(NewUser::new(username, format!("{username} tester")))
            .await
            .unwrap()
            .id
    }

    pub fn tick(&self) {
        self.clock.advance(Duration::seconds(1));
    }

    pub fn in_days(&self, days: i64) -> NaiveDate {
        self.clock.today() + Duration::days(days)
    }
}

pub fn defect(name: &str) -> CreateTaskRequest {
    CreateTaskRequest::Defect {
        common: NewTaskFields::named(name),
        fields: NewDefect {
            severity: Severity::Medium,
            priority: Priority::Medium,
            steps_to_reproduce: None,
            environment: None,
        },
    }
}

pub fn defect_for(name: &str, user: UserId) -> CreateTaskRequest {
    CreateTaskRequest::Defect {
        common: NewTaskFields::named(name).assigned_to(user),
        fields: NewDefect {
            severity: Severity::High,
            priority: Priority::High,
            steps_to_reproduce: Some("see attached log".to_string()),
            environment: Some("staging".to_string()),
        },
    }
}

pub fn feature(name: &str, deadline: NaiveDate) -> CreateTaskRequest {
    CreateTaskRequest::Feature {
        common: NewTaskFields::named(name),
        fields: NewFeature {
            business_value: "customers asked for it".to_string(),
            deadline,
            acceptance_criteria: Some("demoed to product".to_string()),
            estimated_effort: 3,
        },
    }
}
