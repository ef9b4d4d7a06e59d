//! Integration tests for the NGO dashboard
//!
//! These tests verify end-to-end functionality including:
//! - Dataset loading and persistence
//! - Board commands and budget approvals through a repository
//! - Settings-driven metrics and the dashboard snapshot

use chrono::{DateTime, TimeZone, Utc};
use ngo_dashboard::dataset::{
    seed_dataset, Dataset, InMemoryRepository, RequestStatus, Repository, Task, TaskStatus,
};
use ngo_dashboard::services::metrics::{
    team_workload, workload_level, workload_score, WorkloadLevel,
};
use ngo_dashboard::services::settings::WorkloadSettings;
use ngo_dashboard::services::tasks::{present_tasks, TaskFilter, TaskView, TaskViewModel};
use ngo_dashboard::services::timeline::{project_timeline, TimelineWindow};
use ngo_dashboard::services::{build_snapshot, ApprovalDesk, SettingsService, TaskBoard};
use tempfile::TempDir;

fn today() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 8, 0, 0).unwrap()
}

#[tokio::test]
async fn test_board_changes_persist_through_dataset_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dataset.json");
    let mut dataset = seed_dataset().unwrap();

    let mut board = TaskBoard::new(dataset.task_repository(), "1");
    board.toggle_subtask("t1", "s3").unwrap();
    board.toggle_subtask("t1", "s4").unwrap();
    board.move_task("t1", TaskStatus::InReview).unwrap();
    board
        .add_comment("t1", "All wells surveyed".to_string(), today())
        .unwrap();

    dataset.tasks = board.into_inner().list();
    dataset.save(&path).await.unwrap();

    let loaded = Dataset::load(&path).await.unwrap();
    let task = loaded.task("t1").unwrap();
    assert_eq!(task.progress, 100);
    assert_eq!(task.status, TaskStatus::InReview);
    assert_eq!(task.comments.len(), 2);
    assert_eq!(task.comments[1].user_id, "1");

    // Untouched tasks survive the round trip unchanged
    let seed = seed_dataset().unwrap();
    assert_eq!(loaded.task("t2"), seed.task("t2"));
}

#[test]
fn test_local_changes_never_touch_the_seed() {
    let dataset = seed_dataset().unwrap();
    let mut board = TaskBoard::new(dataset.task_repository(), "1");

    board.move_task("t2", TaskStatus::Completed).unwrap();

    assert_eq!(dataset.task("t2").unwrap().status, TaskStatus::Todo);
    assert_eq!(seed_dataset().unwrap().task("t2").unwrap().status, TaskStatus::Todo);
}

#[test]
fn test_approval_flow_updates_snapshot() {
    let mut dataset = seed_dataset().unwrap();
    let settings = Default::default();
    let before = build_snapshot(&dataset, today(), &settings);
    assert_eq!(before.pending_budget_requests, 2);

    let mut desk = ApprovalDesk::new(dataset.budget_request_repository(), "1");
    desk.approve("br1", Some("Approved for Q2".to_string()), today())
        .unwrap();
    dataset.finance.budget_requests = desk.into_inner().list();

    let after = build_snapshot(&dataset, today(), &settings);
    assert_eq!(after.pending_budget_requests, 1);
    assert_eq!(after.pending_request_amount, 400.0);

    let request = dataset.budget_request("br1").unwrap();
    assert_eq!(request.status, RequestStatus::Approved);
    assert_eq!(request.reviewed_at, Some(today()));
}

#[test]
fn test_custom_repository_backs_the_board() {
    // Counts saves to show the board only talks to the capability
    struct CountingRepo {
        inner: InMemoryRepository<Task>,
        saves: usize,
    }

    impl Repository<Task> for CountingRepo {
        fn get(&self, id: &str) -> Option<Task> {
            self.inner.get(id)
        }

        fn save(&mut self, entity: Task) {
            self.saves += 1;
            self.inner.save(entity);
        }

        fn list(&self) -> Vec<Task> {
            self.inner.list()
        }
    }

    let dataset = seed_dataset().unwrap();
    let mut board = TaskBoard::new(
        CountingRepo {
            inner: dataset.task_repository(),
            saves: 0,
        },
        "1",
    );

    board.move_task("t3", TaskStatus::Completed).unwrap();
    assert!(board.move_task("missing", TaskStatus::Completed).is_err());

    assert_eq!(board.into_inner().saves, 1);
}

#[test]
fn test_workload_scores_and_labels() {
    let settings = WorkloadSettings::default();
    let cases = [
        (0, 0.0, WorkloadLevel::Light),
        (5, 50.0, WorkloadLevel::Heavy),
        (10, 100.0, WorkloadLevel::Overloaded),
        (20, 100.0, WorkloadLevel::Overloaded),
    ];

    for (count, score, level) in cases {
        let actual = workload_score(count, settings.task_cap);
        assert_eq!(actual, score, "score for {} tasks", count);
        assert_eq!(workload_level(actual, &settings), level, "level for {} tasks", count);
    }

    let dataset = seed_dataset().unwrap();
    let rows = team_workload(&dataset, today(), &settings);
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.level == WorkloadLevel::Light));
}

#[test]
fn test_lookups_for_missing_ids_are_absent() {
    let dataset = seed_dataset().unwrap();

    assert!(dataset.user("404").is_none());
    assert!(dataset.project("404").is_none());
    assert!(dataset.event("404").is_none());
    assert!(dataset.task("404").is_none());
    assert!(dataset.meeting("404").is_none());
    assert!(dataset.file("404").is_none());
    assert!(dataset.folder("404").is_none());
    assert!(dataset.budget_request("404").is_none());
    assert!(dataset.tasks_for_project("404").is_empty());
}

#[tokio::test]
async fn test_settings_drive_timeline_and_views() {
    let temp_dir = TempDir::new().unwrap();
    let service = SettingsService::new(temp_dir.path().to_path_buf());

    let mut timeline = service.load().await.unwrap().timeline;
    timeline.months_back = 0;
    timeline.months_forward = 3;
    service.update_timeline(timeline).await.unwrap();

    let settings = service.load().await.unwrap();
    let dataset = seed_dataset().unwrap();

    let view = project_timeline(&dataset, today(), &settings).unwrap();
    assert_eq!(view.months.len(), 3);
    assert_eq!(view.months[0].label, "Mar 2026");
    assert_eq!(view.today.left_pct, 14.0 / 91.0 * 100.0);

    let window = TimelineWindow::around(today().date_naive(), &settings.timeline).unwrap();
    let filter = TaskFilter {
        status: Some(TaskStatus::Todo),
        ..TaskFilter::default()
    };
    match present_tasks(&dataset.tasks, &filter, TaskView::Calendar, &window, &settings.timeline) {
        TaskViewModel::Calendar(days) => assert_eq!(days.len(), 2),
        other => panic!("unexpected view model: {:?}", other),
    }
}
