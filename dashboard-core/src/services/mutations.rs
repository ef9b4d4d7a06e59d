//! Local mutation layer
//!
//! Each action is a total function from an entity to a new copy of it.
//! Nothing here validates preconditions: approving an approved request or
//! moving a task to its current column simply yields the same state.

use crate::dataset::{
    BudgetRequest, RequestStatus, ReviewComment, Task, TaskComment, TaskStatus,
};
use crate::services::metrics::subtask_progress;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A local change to one task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskAction {
    /// Flip a subtask and recompute progress from all subtasks
    ToggleSubtask { subtask_id: String },
    /// Append a comment with the id `c{millis}` derived from `at`.
    /// Two comments added in the same millisecond share an id.
    AddComment {
        author_id: String,
        content: String,
        at: DateTime<Utc>,
    },
    /// Change the kanban column; touches nothing but `status`
    MoveTo(TaskStatus),
}

pub fn apply_task_action(task: &Task, action: &TaskAction) -> Task {
    let mut next = task.clone();

    match action {
        TaskAction::ToggleSubtask { subtask_id } => {
            let mut toggled = false;
            for subtask in next.subtasks.iter_mut().filter(|s| &s.id == subtask_id) {
                subtask.is_completed = !subtask.is_completed;
                toggled = true;
            }
            if toggled {
                if let Some(progress) = subtask_progress(&next.subtasks) {
                    next.progress = progress;
                }
            }
        }
        TaskAction::AddComment {
            author_id,
            content,
            at,
        } => {
            next.comments.push(TaskComment {
                id: format!("c{}", at.timestamp_millis()),
                user_id: author_id.clone(),
                content: content.clone(),
                created_at: *at,
            });
        }
        TaskAction::MoveTo(status) => {
            next.status = *status;
        }
    }

    next
}

/// Move one task to another column, leaving every other task untouched
pub fn move_task(tasks: &[Task], task_id: &str, status: TaskStatus) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| {
            if t.id == task_id {
                apply_task_action(t, &TaskAction::MoveTo(status))
            } else {
                t.clone()
            }
        })
        .collect()
}

/// Reviewer decision on a budget request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    fn status(self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
        }
    }
}

/// A reviewer's action on a budget request
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewAction {
    pub decision: ReviewDecision,
    pub reviewer_id: String,
    pub comment: Option<String>,
    pub at: DateTime<Utc>,
}

pub fn apply_review(request: &BudgetRequest, action: &ReviewAction) -> BudgetRequest {
    let mut next = request.clone();

    next.status = action.decision.status();
    next.reviewed_by = Some(action.reviewer_id.clone());
    next.reviewed_at = Some(action.at);

    if let Some(content) = action.comment.as_deref().map(str::trim) {
        if !content.is_empty() {
            next.comments.push(ReviewComment {
                id: Uuid::new_v4().to_string(),
                user_id: action.reviewer_id.clone(),
                content: content.to_string(),
                created_at: action.at,
            });
        }
    }

    next
}
