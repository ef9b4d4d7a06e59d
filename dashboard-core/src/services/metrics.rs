//! Derived metrics engine
//!
//! Turns raw numeric fields into percentages and badge labels.
//! Every function is pure and substitutes 0 for an empty denominator, so
//! no NaN or infinity ever reaches rendered output.

use crate::dataset::{
    Dataset, Event, Meeting, Project, RsvpStatus, Subtask, Task, TaskStatus, User,
};
use crate::dates::days_between;
use crate::services::settings::{ScheduleSettings, WorkloadSettings};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// `numerator / denominator * 100`, or 0 when the result would not be finite
pub fn ratio_percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let pct = numerator / denominator * 100.0;
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

/// Clamp a raw percentage into a progress bar's visual fill
pub fn bar_fill(pct: f64) -> f64 {
    if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

// ===== Budget =====

/// Spent as a percentage of allocated; unbounded above 100
pub fn budget_utilization(spent: f64, allocated: f64) -> f64 {
    ratio_percent(spent, allocated)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    #[serde(rename = "Under Budget")]
    UnderBudget,
    #[serde(rename = "Near Limit")]
    NearLimit,
    #[serde(rename = "Over Budget")]
    OverBudget,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnderBudget => "Under Budget",
            Self::NearLimit => "Near Limit",
            Self::OverBudget => "Over Budget",
        }
    }
}

pub fn budget_status(utilization: f64, near_limit_threshold: f64) -> BudgetStatus {
    if utilization > 100.0 {
        BudgetStatus::OverBudget
    } else if utilization >= near_limit_threshold {
        BudgetStatus::NearLimit
    } else {
        BudgetStatus::UnderBudget
    }
}

// ===== Time =====

/// Elapsed share of the planned duration, clamped to 0-100.
///
/// Without an end date the planned duration is `fallback_days`.
pub fn time_progress(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    fallback_days: i64,
) -> f64 {
    let total_days = match end {
        Some(end) => days_between(start, end),
        None => fallback_days,
    };
    if total_days <= 0 {
        return if now >= start { 100.0 } else { 0.0 };
    }

    let elapsed = days_between(start, now);
    bar_fill(ratio_percent(elapsed as f64, total_days as f64))
}

/// Signed whole days from `now` until `due`
pub fn days_remaining(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    days_between(now, due)
}

/// A task is overdue when its due day has passed and it is not completed
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    task.status != TaskStatus::Completed
        && task
            .due_date
            .map(|due| days_remaining(due, now) < 0)
            .unwrap_or(false)
}

// ===== Project health =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectHealth {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
}

impl ProjectHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk => "At Risk",
        }
    }
}

/// On track when work done keeps pace with time elapsed
pub fn project_health(progress: f64, time_progress: f64) -> ProjectHealth {
    if progress >= time_progress {
        ProjectHealth::OnTrack
    } else {
        ProjectHealth::AtRisk
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScheduleVariance {
    Ahead,
    #[serde(rename = "On Track")]
    OnTrack,
    Behind,
}

impl ScheduleVariance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ahead => "Ahead",
            Self::OnTrack => "On Track",
            Self::Behind => "Behind",
        }
    }
}

/// Three-band variant of `project_health` with a tolerance in points
pub fn schedule_variance(progress: f64, time_progress: f64, tolerance: f64) -> ScheduleVariance {
    let delta = progress - time_progress;
    if delta > tolerance {
        ScheduleVariance::Ahead
    } else if delta < -tolerance {
        ScheduleVariance::Behind
    } else {
        ScheduleVariance::OnTrack
    }
}

// ===== Tasks =====

/// Rounded share of completed subtasks, `None` when there are none
pub fn subtask_progress(subtasks: &[Subtask]) -> Option<u8> {
    if subtasks.is_empty() {
        return None;
    }
    let completed = subtasks.iter().filter(|s| s.is_completed).count();
    let pct = ratio_percent(completed as f64, subtasks.len() as f64).round();
    Some(pct.clamp(0.0, 100.0) as u8)
}

/// Subtask completion is authoritative when subtasks exist
pub fn effective_progress(task: &Task) -> u8 {
    subtask_progress(&task.subtasks).unwrap_or(task.progress)
}

/// Share of completed tasks, 0 for an empty list
pub fn completion_rate<'a, I>(tasks: I) -> f64
where
    I: IntoIterator<Item = &'a Task>,
{
    let (total, completed) = tasks.into_iter().fold((0usize, 0usize), |(n, c), t| {
        (n + 1, c + usize::from(t.status == TaskStatus::Completed))
    });
    ratio_percent(completed as f64, total as f64)
}

/// Task count per status in kanban column order
pub fn status_counts<'a, I>(tasks: I) -> Vec<(TaskStatus, usize)>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut counts = TaskStatus::ALL.map(|s| (s, 0usize));
    for task in tasks {
        if let Some(slot) = counts.iter_mut().find(|(s, _)| *s == task.status) {
            slot.1 += 1;
        }
    }
    counts.to_vec()
}

// ===== Workload =====

/// `min(100, open / cap * 100)`
pub fn workload_score(open_tasks: usize, task_cap: u32) -> f64 {
    ratio_percent(open_tasks as f64, f64::from(task_cap)).min(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkloadLevel {
    Light,
    Moderate,
    Heavy,
    Overloaded,
}

impl WorkloadLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Moderate => "Moderate",
            Self::Heavy => "Heavy",
            Self::Overloaded => "Overloaded",
        }
    }
}

/// Thresholds are inclusive lower bounds of each level
pub fn workload_level(score: f64, settings: &WorkloadSettings) -> WorkloadLevel {
    if score >= settings.overloaded_threshold {
        WorkloadLevel::Overloaded
    } else if score >= settings.heavy_threshold {
        WorkloadLevel::Heavy
    } else if score >= settings.moderate_threshold {
        WorkloadLevel::Moderate
    } else {
        WorkloadLevel::Light
    }
}

/// One row of the team workload view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadRow<'a> {
    pub user: &'a User,
    pub assigned_tasks: usize,
    pub open_tasks: usize,
    pub overdue_tasks: usize,
    pub score: f64,
    pub level: WorkloadLevel,
}

/// Workload of every active user, in dataset order.
///
/// The score counts open (not completed) assigned tasks.
pub fn team_workload<'a>(
    dataset: &'a Dataset,
    now: DateTime<Utc>,
    settings: &WorkloadSettings,
) -> Vec<WorkloadRow<'a>> {
    dataset
        .users
        .iter()
        .filter(|u| u.is_active)
        .map(|user| {
            let assigned = dataset.tasks_for_assignee(&user.id);
            let open_tasks = assigned
                .iter()
                .filter(|t| t.status != TaskStatus::Completed)
                .count();
            let overdue_tasks = assigned.iter().filter(|t| is_overdue(t, now)).count();
            let score = workload_score(open_tasks, settings.task_cap);

            WorkloadRow {
                user,
                assigned_tasks: assigned.len(),
                open_tasks,
                overdue_tasks,
                score,
                level: workload_level(score, settings),
            }
        })
        .collect()
}

// ===== Entity summaries =====

/// Derived figures for a project card or detail header
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetrics {
    pub budget_utilization: f64,
    pub budget_status: BudgetStatus,
    pub remaining_budget: f64,
    pub time_progress: f64,
    pub health: ProjectHealth,
    pub variance: ScheduleVariance,
    pub days_remaining: Option<i64>,
    pub task_completion_rate: f64,
}

pub fn project_metrics(
    dataset: &Dataset,
    project: &Project,
    now: DateTime<Utc>,
    settings: &ScheduleSettings,
) -> ProjectMetrics {
    let utilization = budget_utilization(project.spent, project.budget);
    let elapsed = time_progress(
        project.start_date,
        project.end_date,
        now,
        settings.default_project_duration_days,
    );
    let progress = f64::from(project.progress);

    ProjectMetrics {
        budget_utilization: utilization,
        budget_status: budget_status(utilization, settings.budget_near_limit_threshold),
        remaining_budget: project.budget - project.spent,
        time_progress: elapsed,
        health: project_health(progress, elapsed),
        variance: schedule_variance(progress, elapsed, settings.on_track_tolerance),
        days_remaining: project.end_date.map(|end| days_remaining(end, now)),
        task_completion_rate: completion_rate(dataset.tasks_for_project(&project.id)),
    }
}

/// Derived figures for an event card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetrics {
    pub budget_utilization: f64,
    pub budget_status: BudgetStatus,
    pub confirmed_attendees: usize,
    pub confirmation_rate: f64,
    pub days_until_start: i64,
}

pub fn event_metrics(event: &Event, now: DateTime<Utc>, settings: &ScheduleSettings) -> EventMetrics {
    let utilization = budget_utilization(event.spent, event.budget);
    let confirmed = event
        .attendees
        .iter()
        .filter(|a| a.confirmed_at.is_some())
        .count();

    EventMetrics {
        budget_utilization: utilization,
        budget_status: budget_status(utilization, settings.budget_near_limit_threshold),
        confirmed_attendees: confirmed,
        confirmation_rate: ratio_percent(confirmed as f64, event.attendees.len() as f64),
        days_until_start: days_between(now, event.start_date),
    }
}

/// Participant response counts for a meeting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSummary {
    pub accepted: usize,
    pub declined: usize,
    pub pending: usize,
    /// Required participants who have not accepted
    pub required_outstanding: usize,
}

pub fn rsvp_summary(meeting: &Meeting) -> RsvpSummary {
    meeting
        .participants
        .iter()
        .fold(RsvpSummary::default(), |mut acc, p| {
            match p.status {
                RsvpStatus::Accepted => acc.accepted += 1,
                RsvpStatus::Declined => acc.declined += 1,
                RsvpStatus::Pending => acc.pending += 1,
            }
            if p.is_required && p.status != RsvpStatus::Accepted {
                acc.required_outstanding += 1;
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::seed_dataset;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn subtasks(done: &[bool]) -> Vec<Subtask> {
        done.iter()
            .enumerate()
            .map(|(i, &is_completed)| Subtask {
                id: format!("s{}", i),
                title: format!("Step {}", i),
                is_completed,
            })
            .collect()
    }

    #[test]
    fn test_budget_utilization_is_unbounded() {
        assert_eq!(budget_utilization(50.0, 200.0), 25.0);
        assert!((budget_utilization(16500.0, 15000.0) - 110.0).abs() < 1e-9);
        assert_eq!(bar_fill(110.0), 100.0);
    }

    #[test]
    fn test_zero_allocation_yields_zero() {
        assert_eq!(budget_utilization(0.0, 0.0), 0.0);
        assert_eq!(budget_utilization(500.0, 0.0), 0.0);
        assert_eq!(ratio_percent(1.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_budget_status_bands() {
        assert_eq!(budget_status(75.0, 90.0), BudgetStatus::UnderBudget);
        assert_eq!(budget_status(90.0, 90.0), BudgetStatus::NearLimit);
        assert_eq!(budget_status(100.0, 90.0), BudgetStatus::NearLimit);
        assert_eq!(budget_status(100.1, 90.0), BudgetStatus::OverBudget);
    }

    #[test]
    fn test_time_progress_with_end_date() {
        let start = at(2026, 1, 1);
        let end = at(2026, 1, 11);

        assert_eq!(time_progress(start, Some(end), at(2026, 1, 6), 180), 50.0);
        assert_eq!(time_progress(start, Some(end), at(2025, 12, 1), 180), 0.0);
        assert_eq!(time_progress(start, Some(end), at(2026, 3, 1), 180), 100.0);
    }

    #[test]
    fn test_time_progress_uses_fallback_duration() {
        let start = at(2026, 1, 1);
        let now = start + chrono::Duration::days(90);
        assert_eq!(time_progress(start, None, now, 180), 50.0);
        assert_eq!(time_progress(start, None, now, 360), 25.0);
    }

    #[test]
    fn test_time_progress_zero_length_project() {
        let day = at(2026, 2, 1);
        assert_eq!(time_progress(day, Some(day), at(2026, 1, 1), 180), 0.0);
        assert_eq!(time_progress(day, Some(day), day, 180), 100.0);
    }

    #[test]
    fn test_health_is_two_branch() {
        assert_eq!(project_health(50.0, 50.0), ProjectHealth::OnTrack);
        assert_eq!(project_health(49.0, 50.0), ProjectHealth::AtRisk);
        assert_eq!(project_health(80.0, 10.0), ProjectHealth::OnTrack);
    }

    #[test]
    fn test_schedule_variance_tolerance() {
        assert_eq!(schedule_variance(60.0, 50.0, 10.0), ScheduleVariance::OnTrack);
        assert_eq!(schedule_variance(61.0, 50.0, 10.0), ScheduleVariance::Ahead);
        assert_eq!(schedule_variance(39.0, 50.0, 10.0), ScheduleVariance::Behind);
    }

    #[test]
    fn test_workload_score_and_levels() {
        let settings = WorkloadSettings::default();
        let cases = [
            (0, 0.0, WorkloadLevel::Light),
            (3, 30.0, WorkloadLevel::Moderate),
            (5, 50.0, WorkloadLevel::Heavy),
            (10, 100.0, WorkloadLevel::Overloaded),
            (20, 100.0, WorkloadLevel::Overloaded),
        ];

        for (count, expected_score, expected_level) in cases {
            let score = workload_score(count, settings.task_cap);
            assert_eq!(score, expected_score, "count {}", count);
            assert_eq!(workload_level(score, &settings), expected_level, "count {}", count);
        }
    }

    #[test]
    fn test_workload_threshold_boundaries() {
        let settings = WorkloadSettings::default();
        assert_eq!(workload_level(24.9, &settings), WorkloadLevel::Light);
        assert_eq!(workload_level(25.0, &settings), WorkloadLevel::Moderate);
        assert_eq!(workload_level(75.0, &settings), WorkloadLevel::Overloaded);
    }

    #[test]
    fn test_subtask_progress_rounds() {
        assert_eq!(subtask_progress(&[]), None);
        assert_eq!(subtask_progress(&subtasks(&[true, false, false])), Some(33));
        assert_eq!(subtask_progress(&subtasks(&[true, true, false])), Some(67));
        assert_eq!(subtask_progress(&subtasks(&[false, false])), Some(0));
        assert_eq!(subtask_progress(&subtasks(&[true, true])), Some(100));
    }

    #[test]
    fn test_effective_progress_prefers_subtasks() {
        let ds = seed_dataset().unwrap();

        // Stored 40, two of four subtasks done
        assert_eq!(effective_progress(ds.task("t1").unwrap()), 50);
        // No subtasks, stored value wins
        assert_eq!(effective_progress(ds.task("t6").unwrap()), 10);
    }

    #[test]
    fn test_completion_rate_and_counts() {
        let ds = seed_dataset().unwrap();

        assert_eq!(completion_rate(&ds.tasks), ratio_percent(1.0, 6.0));
        assert_eq!(completion_rate(std::iter::empty()), 0.0);

        let counts = status_counts(&ds.tasks);
        assert_eq!(counts[0], (TaskStatus::Todo, 2));
        assert_eq!(counts[4], (TaskStatus::Blocked, 1));
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), 6);
    }

    #[test]
    fn test_overdue_ignores_completed_tasks() {
        let ds = seed_dataset().unwrap();
        let now = at(2026, 3, 15);

        assert!(is_overdue(ds.task("t1").unwrap(), now));
        assert!(!is_overdue(ds.task("t2").unwrap(), now));
        assert!(!is_overdue(ds.task("t5").unwrap(), now));
    }

    #[test]
    fn test_project_metrics_for_seed_project() {
        let ds = seed_dataset().unwrap();
        let project = ds.project("p1").unwrap();
        let settings = ScheduleSettings::default();

        // 2026-01-01 .. 2026-06-30 is 180 days; 2026-03-02 is day 60
        let metrics = project_metrics(&ds, project, at(2026, 3, 2), &settings);

        assert_eq!(metrics.budget_utilization, 64.0);
        assert_eq!(metrics.budget_status, BudgetStatus::UnderBudget);
        assert_eq!(metrics.remaining_budget, 18000.0);
        assert!((metrics.time_progress - 33.333).abs() < 0.01);
        assert_eq!(metrics.health, ProjectHealth::OnTrack);
        assert_eq!(metrics.variance, ScheduleVariance::Ahead);
        assert_eq!(metrics.days_remaining, Some(120));
        assert_eq!(metrics.task_completion_rate, 0.0);
    }

    #[test]
    fn test_project_without_end_date_uses_configured_fallback() {
        let ds = seed_dataset().unwrap();
        let project = ds.project("p2").unwrap();
        let now = at(2026, 4, 1) + chrono::Duration::days(45);

        let short = project_metrics(&ds, project, now, &ScheduleSettings::default());
        assert_eq!(short.time_progress, 25.0);
        assert_eq!(short.days_remaining, None);

        let long = ScheduleSettings {
            default_project_duration_days: 360,
            ..ScheduleSettings::default()
        };
        assert_eq!(project_metrics(&ds, project, now, &long).time_progress, 12.5);
    }

    #[test]
    fn test_event_metrics_and_rsvp() {
        let ds = seed_dataset().unwrap();
        let rally = ds.event("e1").unwrap();

        let metrics = event_metrics(rally, at(2026, 3, 15), &ScheduleSettings::default());
        assert_eq!(metrics.confirmed_attendees, 2);
        assert!((metrics.confirmation_rate - 66.666).abs() < 0.01);
        assert_eq!(metrics.budget_utilization, 24.0);
        assert_eq!(metrics.days_until_start, 5);

        let summary = rsvp_summary(ds.meeting("m1").unwrap());
        assert_eq!(
            summary,
            RsvpSummary {
                accepted: 1,
                declined: 1,
                pending: 1,
                required_outstanding: 1,
            }
        );
    }

    #[test]
    fn test_team_workload_rows() {
        let ds = seed_dataset().unwrap();
        let rows = team_workload(&ds, at(2026, 3, 15), &WorkloadSettings::default());

        // Inactive user 6 is excluded
        assert_eq!(rows.len(), 5);

        let priya = rows.iter().find(|r| r.user.id == "3").unwrap();
        assert_eq!(priya.assigned_tasks, 2);
        assert_eq!(priya.open_tasks, 1);
        assert_eq!(priya.score, 10.0);
        assert_eq!(priya.level, WorkloadLevel::Light);

        let lucas = rows.iter().find(|r| r.user.id == "4").unwrap();
        assert_eq!(lucas.overdue_tasks, 1);

        let amara = rows.iter().find(|r| r.user.id == "1").unwrap();
        assert_eq!(amara.score, 0.0);
    }
}
