//! Timeline layout calculator
//!
//! Maps date ranges onto the Gantt-style project timeline. Positions are
//! percentages of a window of `months_back + months_forward` month
//! columns: it starts on the first day of the month `months_back` before
//! today and the current month is the first of the forward months.

use crate::dataset::{Dataset, Project};
use crate::dates::{days_between, days_in_month, midnight, month_end, month_start};
use crate::services::metrics::{project_health, time_progress, ProjectHealth};
use crate::services::settings::{MetricsSettings, TimelineSettings};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

/// The visible date range of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineWindow {
    pub start: DateTime<Utc>,
    /// Midnight of the last day of the final month
    pub end: DateTime<Utc>,
    pub total_days: i64,
    pub months: u32,
}

impl TimelineWindow {
    /// Window around `today`; `None` without forward months or at the
    /// calendar limits
    pub fn around(today: NaiveDate, settings: &TimelineSettings) -> Option<Self> {
        let months = settings.months_back.checked_add(settings.months_forward)?;
        let back = i32::try_from(settings.months_back).ok()?;
        let forward = i32::try_from(settings.months_forward).ok()?;
        if forward < 1 {
            return None;
        }

        let start = midnight(month_start(today, -back)?);
        let end = midnight(month_end(today, forward - 1)?);

        Some(Self {
            start,
            end,
            total_days: days_between(start, end),
            months,
        })
    }

    /// Percentage offset of `at` from the window start, unclamped
    fn offset_pct(&self, at: DateTime<Utc>) -> f64 {
        if self.total_days <= 0 {
            return 0.0;
        }
        days_between(self.start, at) as f64 / self.total_days as f64 * 100.0
    }
}

/// One month column header
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthColumn {
    /// e.g. "Mar 2026"
    pub label: String,
    pub start: NaiveDate,
    pub left_pct: f64,
    pub width_pct: f64,
}

pub fn month_columns(window: &TimelineWindow) -> Vec<MonthColumn> {
    let first = window.start.date_naive();
    let mut columns = Vec::with_capacity(window.months as usize);

    for offset in 0..window.months {
        let Some(start) = i32::try_from(offset)
            .ok()
            .and_then(|offset| month_start(first, offset))
        else {
            break;
        };
        let Some(days) = days_in_month(start) else {
            break;
        };

        let left = window.offset_pct(midnight(start)).clamp(0.0, 100.0);
        let width = (days as f64 / window.total_days.max(1) as f64 * 100.0).min(100.0 - left);

        columns.push(MonthColumn {
            label: start.format("%b %Y").to_string(),
            start,
            left_pct: left,
            width_pct: width,
        });
    }

    columns
}

/// Horizontal placement of one bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarLayout {
    pub left_pct: f64,
    pub width_pct: f64,
    /// False when the item lies entirely outside the window
    pub visible: bool,
}

/// Place a `(start, end?)` range on the window.
///
/// The visible part of the range is what gets measured, so items that
/// began before the window shrink rather than spill left. Visible bars
/// are at least `min_bar_width_pct` wide and never extend past 100%.
pub fn layout_bar(
    window: &TimelineWindow,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    settings: &TimelineSettings,
) -> BarLayout {
    if window.total_days <= 0 {
        return BarLayout {
            left_pct: 0.0,
            width_pct: 0.0,
            visible: false,
        };
    }

    let end = end.unwrap_or(start + Duration::days(settings.default_duration_days));
    let left = window.offset_pct(start).clamp(0.0, 100.0);

    // The final day of the window is inclusive
    if end < window.start || start.date_naive() > window.end.date_naive() {
        return BarLayout {
            left_pct: left,
            width_pct: 0.0,
            visible: false,
        };
    }

    let visible_start = start.max(window.start);
    let visible_end = end.min(window.end);
    let duration = days_between(visible_start, visible_end).max(0);

    let raw_width = duration as f64 / window.total_days as f64 * 100.0;
    let width = raw_width.max(settings.min_bar_width_pct).min(100.0 - left);

    BarLayout {
        left_pct: left,
        width_pct: width,
        visible: true,
    }
}

/// Position of the "today" marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayMarker {
    /// Clamped to 0-100 so the marker pins to an edge outside the window
    pub left_pct: f64,
    pub in_window: bool,
}

pub fn today_marker(window: &TimelineWindow, now: DateTime<Utc>) -> TodayMarker {
    let raw = window.offset_pct(now);
    TodayMarker {
        left_pct: raw.clamp(0.0, 100.0),
        in_window: (0.0..=100.0).contains(&raw),
    }
}

/// A project row of the timeline view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBar<'a> {
    pub project: &'a Project,
    pub bar: BarLayout,
    pub health: ProjectHealth,
}

/// Complete timeline view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTimeline<'a> {
    pub window: TimelineWindow,
    pub months: Vec<MonthColumn>,
    pub today: TodayMarker,
    pub rows: Vec<ProjectBar<'a>>,
}

/// Lay out every project, sorted by start date
pub fn project_timeline<'a>(
    dataset: &'a Dataset,
    now: DateTime<Utc>,
    settings: &MetricsSettings,
) -> Option<ProjectTimeline<'a>> {
    let window = TimelineWindow::around(now.date_naive(), &settings.timeline)?;

    let mut projects: Vec<&Project> = dataset.projects.iter().collect();
    projects.sort_by_key(|p| p.start_date);

    let rows = projects
        .into_iter()
        .map(|project| {
            let elapsed = time_progress(
                project.start_date,
                project.end_date,
                now,
                settings.schedule.default_project_duration_days,
            );
            ProjectBar {
                project,
                bar: layout_bar(&window, project.start_date, project.end_date, &settings.timeline),
                health: project_health(f64::from(project.progress), elapsed),
            }
        })
        .collect();

    tracing::debug!(
        "Laid out project timeline: {} days from {}",
        window.total_days,
        window.start
    );

    Some(ProjectTimeline {
        months: month_columns(&window),
        today: today_marker(&window, now),
        window,
        rows,
    })
}
