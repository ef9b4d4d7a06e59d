//! Task grouping and view adapter
//!
//! Filters the task list by search text, priority and status, then shapes
//! the result for the kanban, list, timeline and calendar views.

use crate::dataset::{Task, TaskPriority, TaskStatus};
use crate::services::settings::TimelineSettings;
use crate::services::timeline::{layout_bar, BarLayout, TimelineWindow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filter state of the task pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    /// Case-insensitive substring of the title; empty matches everything
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl TaskFilter {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: text.into(),
            ..Self::default()
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        let query = self.search.trim().to_lowercase();

        (query.is_empty() || task.title.to_lowercase().contains(&query))
            && self.priority.map_or(true, |p| task.priority == p)
            && self.status.map_or(true, |s| task.status == s)
            && self
                .assignee_id
                .as_deref()
                .map_or(true, |id| task.assignee_id.as_deref() == Some(id))
            && self
                .project_id
                .as_deref()
                .map_or(true, |id| task.project_id.as_deref() == Some(id))
    }
}

/// Tasks matching `filter`, in their original order
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|t| filter.matches(t)).collect()
}

/// Views offered by the task pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskView {
    Kanban,
    List,
    Timeline,
    Calendar,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanColumn<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

/// Five columns in fixed order; each keeps the filtered order
pub fn kanban_columns<'a>(tasks: &[&'a Task]) -> Vec<KanbanColumn<'a>> {
    TaskStatus::ALL
        .iter()
        .map(|&status| KanbanColumn {
            status,
            tasks: tasks
                .iter()
                .copied()
                .filter(|t| t.status == status)
                .collect(),
        })
        .collect()
}

/// Tasks bucketed by due day; tasks without a due date are left out
pub fn bucket_by_due_day<'a>(tasks: &[&'a Task]) -> BTreeMap<NaiveDate, Vec<&'a Task>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&'a Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(due) = task.due_date {
            buckets.entry(due.date_naive()).or_default().push(*task);
        }
    }
    buckets
}

/// Timeline placement of a task, keyed by its start (or creation) and due dates
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBar<'a> {
    pub task: &'a Task,
    pub bar: BarLayout,
}

pub fn task_bars<'a>(
    tasks: &[&'a Task],
    window: &TimelineWindow,
    settings: &TimelineSettings,
) -> Vec<TaskBar<'a>> {
    tasks
        .iter()
        .map(|&task| {
            let start = task.start_date.unwrap_or(task.created_at);
            TaskBar {
                task,
                bar: layout_bar(window, start, task.due_date, settings),
            }
        })
        .collect()
}

/// Presentation-ready grouping for the selected view
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "lowercase")]
pub enum TaskViewModel<'a> {
    Kanban(Vec<KanbanColumn<'a>>),
    List(Vec<&'a Task>),
    Timeline(Vec<TaskBar<'a>>),
    Calendar(BTreeMap<NaiveDate, Vec<&'a Task>>),
}

/// Filter `tasks` and shape them for `view`
pub fn present_tasks<'a>(
    tasks: &'a [Task],
    filter: &TaskFilter,
    view: TaskView,
    window: &TimelineWindow,
    settings: &TimelineSettings,
) -> TaskViewModel<'a> {
    let filtered = filter_tasks(tasks, filter);
    tracing::debug!("Presenting {} tasks as {:?}", filtered.len(), view);

    match view {
        TaskView::Kanban => TaskViewModel::Kanban(kanban_columns(&filtered)),
        TaskView::List => TaskViewModel::List(filtered),
        TaskView::Timeline => TaskViewModel::Timeline(task_bars(&filtered, window, settings)),
        TaskView::Calendar => TaskViewModel::Calendar(bucket_by_due_day(&filtered)),
    }
}
