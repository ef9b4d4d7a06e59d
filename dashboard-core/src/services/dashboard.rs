//! Overview page snapshot
//!
//! Headline counts and totals for the dashboard landing page, as an owned
//! and serializable value.

use crate::dataset::{Dataset, TaskStatus};
use crate::format::{format_bytes, format_currency, format_percent};
use crate::services::files::total_storage;
use crate::services::finance::request_counts;
use crate::services::metrics::{
    budget_utilization, completion_rate, is_overdue, project_health, team_workload,
    time_progress, ProjectHealth, WorkloadLevel,
};
use crate::services::schedule::{upcoming, ScheduleKind};
use crate::services::settings::MetricsSettings;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub active_projects: usize,
    /// Active projects whose progress lags elapsed time
    pub at_risk_projects: usize,
    pub upcoming_events: usize,
    pub upcoming_meetings: usize,
    pub open_tasks: usize,
    pub overdue_tasks: usize,
    pub task_completion_rate: f64,
    pub total_budget: f64,
    pub total_spent: f64,
    pub budget_utilization: f64,
    pub pending_budget_requests: usize,
    pub pending_request_amount: f64,
    pub storage_used_bytes: u64,
    /// Active members at the top workload level
    pub overloaded_members: usize,
    pub display: SnapshotDisplay,
}

/// Pre-formatted strings for the headline cards
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDisplay {
    pub total_budget: String,
    pub total_spent: String,
    pub budget_utilization: String,
    pub task_completion_rate: String,
    pub storage_used: String,
}

pub fn build_snapshot(
    dataset: &Dataset,
    now: DateTime<Utc>,
    settings: &MetricsSettings,
) -> DashboardSnapshot {
    let schedule = &settings.schedule;

    let active: Vec<_> = dataset
        .projects
        .iter()
        .filter(|p| p.status.is_active())
        .collect();
    let at_risk_projects = active
        .iter()
        .filter(|p| {
            let elapsed = time_progress(
                p.start_date,
                p.end_date,
                now,
                schedule.default_project_duration_days,
            );
            project_health(f64::from(p.progress), elapsed) == ProjectHealth::AtRisk
        })
        .count();

    let upcoming_items = upcoming(dataset, now, schedule.upcoming_window_days);
    let upcoming_events = upcoming_items
        .iter()
        .filter(|i| i.kind() == ScheduleKind::Event)
        .count();

    let open_tasks = dataset
        .tasks
        .iter()
        .filter(|t| t.status != TaskStatus::Completed)
        .count();
    let overdue_tasks = dataset.tasks.iter().filter(|t| is_overdue(t, now)).count();
    let task_completion_rate = completion_rate(&dataset.tasks);

    let total_budget: f64 = dataset.projects.iter().map(|p| p.budget).sum();
    let total_spent: f64 = dataset.projects.iter().map(|p| p.spent).sum();
    let utilization = budget_utilization(total_spent, total_budget);

    let requests = request_counts(&dataset.finance.budget_requests);
    let storage_used_bytes = total_storage(&dataset.files);

    let overloaded_members = team_workload(dataset, now, &settings.workload)
        .iter()
        .filter(|row| row.level == WorkloadLevel::Overloaded)
        .count();

    tracing::debug!(
        "Built dashboard snapshot: {} active projects, {} open tasks",
        active.len(),
        open_tasks
    );

    DashboardSnapshot {
        generated_at: now,
        active_projects: active.len(),
        at_risk_projects,
        upcoming_events,
        upcoming_meetings: upcoming_items.len() - upcoming_events,
        open_tasks,
        overdue_tasks,
        task_completion_rate,
        total_budget,
        total_spent,
        budget_utilization: utilization,
        pending_budget_requests: requests.pending,
        pending_request_amount: requests.pending_amount,
        storage_used_bytes,
        overloaded_members,
        display: SnapshotDisplay {
            total_budget: format_currency(total_budget),
            total_spent: format_currency(total_spent),
            budget_utilization: format_percent(utilization),
            task_completion_rate: format_percent(task_completion_rate),
            storage_used: format_bytes(storage_used_bytes),
        },
    }
}
