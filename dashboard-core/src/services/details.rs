//! Detail pages for primary entities
//!
//! A detail lookup for an unknown id is the page-level "not found"
//! outcome and returns `AppError::NotFound`. References inside a found
//! entity that fail to resolve are skipped, never reported.

use crate::dataset::{
    BudgetRequest, Dataset, Event, EventAttendee, FileMetadata, Meeting, MeetingParticipant,
    Project, ProjectMember, Task, TaskComment, TaskStatus, User,
};
use crate::error::{AppError, EntityKind, Result};
use crate::services::metrics::{
    days_remaining, effective_progress, event_metrics, is_overdue, project_metrics,
    rsvp_summary, status_counts, EventMetrics, ProjectMetrics, RsvpSummary,
};
use crate::services::settings::ScheduleSettings;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail<'a> {
    pub project: &'a Project,
    pub metrics: ProjectMetrics,
    pub lead: Option<&'a User>,
    pub members: Vec<(&'a ProjectMember, &'a User)>,
    pub tasks: Vec<&'a Task>,
    pub task_counts: Vec<(TaskStatus, usize)>,
    pub events: Vec<&'a Event>,
    pub meetings: Vec<&'a Meeting>,
    pub files: Vec<&'a FileMetadata>,
    pub budget_requests: Vec<&'a BudgetRequest>,
}

pub fn project_detail<'a>(
    dataset: &'a Dataset,
    id: &str,
    now: DateTime<Utc>,
    settings: &ScheduleSettings,
) -> Result<ProjectDetail<'a>> {
    let project = dataset
        .project(id)
        .ok_or_else(|| AppError::not_found(EntityKind::Project, id))?;
    let tasks = dataset.tasks_for_project(id);

    Ok(ProjectDetail {
        project,
        metrics: project_metrics(dataset, project, now, settings),
        lead: dataset.user(&project.lead_id),
        members: dataset.project_members(project),
        task_counts: status_counts(tasks.iter().copied()),
        tasks,
        events: dataset.events_for_project(id),
        meetings: dataset.meetings_for_project(id),
        files: dataset.files_for_project(id),
        budget_requests: dataset.budget_requests_for_project(id),
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail<'a> {
    pub task: &'a Task,
    /// "Unassigned" when there is no assignee or it does not resolve
    pub assignee_name: &'a str,
    /// Derived from subtasks when there are any
    pub progress: u8,
    pub days_remaining: Option<i64>,
    pub overdue: bool,
    pub project: Option<&'a Project>,
    pub event: Option<&'a Event>,
    /// Comments paired with their authors; unknown authors are skipped
    pub comments: Vec<(&'a TaskComment, &'a User)>,
}

pub fn task_detail<'a>(dataset: &'a Dataset, id: &str, now: DateTime<Utc>) -> Result<TaskDetail<'a>> {
    let task = dataset
        .task(id)
        .ok_or_else(|| AppError::not_found(EntityKind::Task, id))?;

    let comments = task
        .comments
        .iter()
        .filter_map(|c| dataset.user(&c.user_id).map(|u| (c, u)))
        .collect();

    Ok(TaskDetail {
        task,
        assignee_name: dataset.user_name_or_unassigned(task.assignee_id.as_deref()),
        progress: effective_progress(task),
        days_remaining: task.due_date.map(|due| days_remaining(due, now)),
        overdue: is_overdue(task, now),
        project: task.project_id.as_deref().and_then(|pid| dataset.project(pid)),
        event: task.event_id.as_deref().and_then(|eid| dataset.event(eid)),
        comments,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail<'a> {
    pub event: &'a Event,
    pub metrics: EventMetrics,
    pub project: Option<&'a Project>,
    pub attendees: Vec<(&'a EventAttendee, &'a User)>,
    pub tasks: Vec<&'a Task>,
    pub meetings: Vec<&'a Meeting>,
    pub files: Vec<&'a FileMetadata>,
}

pub fn event_detail<'a>(
    dataset: &'a Dataset,
    id: &str,
    now: DateTime<Utc>,
    settings: &ScheduleSettings,
) -> Result<EventDetail<'a>> {
    let event = dataset
        .event(id)
        .ok_or_else(|| AppError::not_found(EntityKind::Event, id))?;

    Ok(EventDetail {
        event,
        metrics: event_metrics(event, now, settings),
        project: event.project_id.as_deref().and_then(|pid| dataset.project(pid)),
        attendees: dataset.event_attendees(event),
        tasks: dataset.tasks_for_event(id),
        meetings: dataset.meetings_for_event(id),
        files: dataset.files_for_event(id),
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetail<'a> {
    pub meeting: &'a Meeting,
    pub participants: Vec<(&'a MeetingParticipant, &'a User)>,
    pub rsvp: RsvpSummary,
    pub organizer: Option<&'a User>,
    pub project: Option<&'a Project>,
    pub event: Option<&'a Event>,
}

pub fn meeting_detail<'a>(dataset: &'a Dataset, id: &str) -> Result<MeetingDetail<'a>> {
    let meeting = dataset
        .meeting(id)
        .ok_or_else(|| AppError::not_found(EntityKind::Meeting, id))?;

    Ok(MeetingDetail {
        meeting,
        participants: dataset.meeting_participants(meeting),
        rsvp: rsvp_summary(meeting),
        organizer: dataset.user(&meeting.created_by),
        project: meeting.project_id.as_deref().and_then(|pid| dataset.project(pid)),
        event: meeting.event_id.as_deref().and_then(|eid| dataset.event(eid)),
    })
}
