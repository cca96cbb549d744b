mod common;

use std::collections::HashSet;

use common::{defect, defect_for, feature, test_app, TestApp};
use rstest::rstest;
use tasktrack_core::domain::{CommonPatch, DefectPatch, TaskId, TaskStatus, UpdateTaskRequest};
use tasktrack_core::query::{PageRequest, TaskQuery};
use tasktrack_core::transport::{PageView, TaskView};
use tasktrack_core::ErrorKind;

async fn ids(t: &TestApp, query: TaskQuery, page: PageRequest) -> Vec<TaskId> {
    t.app
        .tasks
        .list(query, page)
        .await
        .unwrap()
        .items
        .into_iter()
        .map(|r| r.id)
        .collect()
}

async fn set_status(t: &TestApp, id: TaskId, status: TaskStatus) {
    let patch = UpdateTaskRequest::Defect {
        common: CommonPatch {
            status: Some(status),
            ..CommonPatch::default()
        },
        fields: DefectPatch::default(),
    };
    t.app.tasks.update(id, patch).await.unwrap();
}

#[tokio::test]
async fn list_is_newest_first_and_hides_deleted() {
    let t = test_app();
    let mut created = Vec::new();
    for name in ["first", "second", "third"] {
        created.push(t.app.tasks.create(defect(name)).await.unwrap().id);
        t.tick();
    }
    t.app.tasks.delete(created[1]).await.unwrap();

    let got = ids(&t, TaskQuery::default(), PageRequest::new(0, 10)).await;
    assert_eq!(got, vec![created[2], created[0]]);
}

#[tokio::test]
async fn filters_are_conjunctive_and_dropping_one_widens() {
    let t = test_app();
    let alice = t.user("alice").await;
    let bob = t.user("bob").await;

    let a_open = t.app.tasks.create(defect_for("Login fails", alice)).await.unwrap().id;
    let a_done = t.app.tasks.create(defect_for("Login slow", alice)).await.unwrap().id;
    set_status(&t, a_done, TaskStatus::Done).await;
    t.app.tasks.create(defect_for("Login broken", bob)).await.unwrap();
    t.app.tasks.create(defect("Logout fails")).await.unwrap();

    let page = PageRequest::new(0, 100);
    let narrow = TaskQuery {
        assignee: Some(alice),
        status: Some(TaskStatus::Open),
        name_contains: Some("login".to_string()),
    };
    let narrow_ids = ids(&t, narrow.clone(), page).await;
    assert_eq!(narrow_ids, vec![a_open]);

    let without_status = TaskQuery {
        status: None,
        ..narrow.clone()
    };
    let wide: HashSet<_> = ids(&t, without_status, page).await.into_iter().collect();
    assert!(narrow_ids.iter().all(|id| wide.contains(id)));
    assert_eq!(wide, HashSet::from([a_open, a_done]));

    let everything: HashSet<_> = ids(&t, TaskQuery::default(), page).await.into_iter().collect();
    assert!(wide.is_subset(&everything));
    assert_eq!(everything.len(), 4);
}

#[rstest]
#[case::lower("login")]
#[case::upper("LOGIN")]
#[case::mixed("LoGiN")]
#[tokio::test]
async fn name_search_ignores_case(#[case] term: &str) {
    let t = test_app();
    t.app.tasks.create(defect("User login fails")).await.unwrap();
    t.app.tasks.create(defect("Slow dashboard")).await.unwrap();

    let query = TaskQuery {
        name_contains: Some(term.to_string()),
        ..TaskQuery::default()
    };
    let page = t.app.tasks.list(query, PageRequest::new(0, 10)).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "User login fails");
}

#[tokio::test]
async fn blank_search_term_is_ignored() {
    let t = test_app();
    t.app.tasks.create(defect("a")).await.unwrap();
    t.app.tasks.create(defect("b")).await.unwrap();

    let query = TaskQuery {
        name_contains: Some("   ".to_string()),
        ..TaskQuery::default()
    };
    assert_eq!(t.app.tasks.list(query, PageRequest::new(0, 10)).await.unwrap().total, 2);
}

#[tokio::test]
async fn pages_partition_the_result_deterministically() {
    let t = test_app();
    for i in 0..7 {
        t.app.tasks.create(defect(&format!("task {i}"))).await.unwrap();
        if i % 2 == 0 {
            t.tick();
        }
    }

    let all = ids(&t, TaskQuery::default(), PageRequest::new(0, 100)).await;
    let mut paged = Vec::new();
    for page in 0..3 {
        paged.extend(ids(&t, TaskQuery::default(), PageRequest::new(page, 3)).await);
    }
    assert_eq!(paged, all);
    assert_eq!(ids(&t, TaskQuery::default(), PageRequest::new(0, 100)).await, all);
}

#[tokio::test]
async fn page_metadata_and_past_the_end() {
    let t = test_app();
    for i in 0..5 {
        t.app.tasks.create(feature(&format!("f{i}"), t.in_days(3))).await.unwrap();
    }

    let page = t.app.tasks.list(TaskQuery::default(), PageRequest::new(1, 2)).await.unwrap();
    let view = serde_json::to_value(PageView::<TaskView>::from(page)).unwrap();
    assert_eq!(view["totalElements"], 5);
    assert_eq!(view["totalPages"], 3);
    assert_eq!(view["hasNext"], true);
    assert_eq!(view["hasPrevious"], true);
    assert_eq!(view["items"].as_array().map(Vec::len), Some(2));

    let beyond = t.app.tasks.list(TaskQuery::default(), PageRequest::new(9, 2)).await.unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 5);
    assert!(!beyond.has_next());
}

#[tokio::test]
async fn size_is_clamped_by_config() {
    let t = test_app();
    let request = PageRequest::from_params(None, Some(10_000), &t.app.config);
    assert_eq!(request.size(), t.app.config.max_page_size);
    assert_eq!(PageRequest::from_params(None, None, &t.app.config).size(), 10);
}

#[tokio::test]
async fn filtering_by_deleted_user_is_not_found() {
    let t = test_app();
    let alice = t.user("alice").await;
    t.app.tasks.create(defect_for("Crash", alice)).await.unwrap();
    t.app.users.delete(alice).await.unwrap();

    let query = TaskQuery {
        assignee: Some(alice),
        ..TaskQuery::default()
    };
    let err = t.app.tasks.list(query, PageRequest::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn oversized_request_is_clamped_by_service() {
    let t = test_app();
    for i in 0..150 {
        t.app.tasks.create(defect(&format!("crash {i}"))).await.unwrap();
    }

    let page = t.app.tasks.list(TaskQuery::default(), PageRequest::new(0, 5000)).await.unwrap();
    assert_eq!(page.size, 100);
    assert_eq!(page.items.len(), 100);
    assert_eq!(page.total, 150);
    assert!(page.has_next());
}
