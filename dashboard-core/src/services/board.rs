//! Task board and approval desk
//!
//! Commands that run the local mutations against an injected repository.
//! Unknown ids surface as `NotFound`; everything else always succeeds.

use crate::dataset::{BudgetRequest, RequestStatus, Repository, Task, TaskStatus};
use crate::error::{AppError, EntityKind, Result};
use crate::services::mutations::{
    apply_review, apply_task_action, ReviewAction, ReviewDecision, TaskAction,
};
use chrono::{DateTime, Utc};

/// Service for task-level interactions on the kanban and detail pages
pub struct TaskBoard<R: Repository<Task>> {
    repo: R,
    current_user_id: String,
}

impl<R: Repository<Task>> TaskBoard<R> {
    pub fn new(repo: R, current_user_id: impl Into<String>) -> Self {
        Self {
            repo,
            current_user_id: current_user_id.into(),
        }
    }

    /// Get a task by ID
    pub fn get_task(&self, id: &str) -> Result<Task> {
        self.repo
            .get(id)
            .ok_or_else(|| AppError::not_found(EntityKind::Task, id))
    }

    pub fn list_tasks(&self) -> Vec<Task> {
        self.repo.list()
    }

    /// Flip a subtask and store the recomputed progress
    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<Task> {
        tracing::debug!("Toggling subtask {} on task {}", subtask_id, task_id);

        self.apply(
            task_id,
            TaskAction::ToggleSubtask {
                subtask_id: subtask_id.to_string(),
            },
        )
    }

    /// Append a comment by the current user
    pub fn add_comment(
        &mut self,
        task_id: &str,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        tracing::info!("Adding comment to task: {}", task_id);

        self.apply(
            task_id,
            TaskAction::AddComment {
                author_id: self.current_user_id.clone(),
                content,
                at: now,
            },
        )
    }

    /// Drag a card to another kanban column
    pub fn move_task(&mut self, task_id: &str, status: TaskStatus) -> Result<Task> {
        tracing::info!("Moving task {} to {}", task_id, status);

        self.apply(task_id, TaskAction::MoveTo(status))
    }

    fn apply(&mut self, task_id: &str, action: TaskAction) -> Result<Task> {
        let task = self.get_task(task_id)?;
        let updated = apply_task_action(&task, &action);
        self.repo.save(updated.clone());
        Ok(updated)
    }

    /// Hand back the repository, e.g. to persist it
    pub fn into_inner(self) -> R {
        self.repo
    }
}

/// Service for reviewing budget requests
pub struct ApprovalDesk<R: Repository<BudgetRequest>> {
    repo: R,
    reviewer_id: String,
}

impl<R: Repository<BudgetRequest>> ApprovalDesk<R> {
    pub fn new(repo: R, reviewer_id: impl Into<String>) -> Self {
        Self {
            repo,
            reviewer_id: reviewer_id.into(),
        }
    }

    /// Requests still waiting for a decision
    pub fn pending(&self) -> Vec<BudgetRequest> {
        self.repo
            .list()
            .into_iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .collect()
    }

    pub fn approve(
        &mut self,
        request_id: &str,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<BudgetRequest> {
        self.review(request_id, ReviewDecision::Approve, comment, now)
    }

    pub fn reject(
        &mut self,
        request_id: &str,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<BudgetRequest> {
        self.review(request_id, ReviewDecision::Reject, comment, now)
    }

    fn review(
        &mut self,
        request_id: &str,
        decision: ReviewDecision,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<BudgetRequest> {
        let request = self
            .repo
            .get(request_id)
            .ok_or_else(|| AppError::not_found(EntityKind::BudgetRequest, request_id))?;

        let updated = apply_review(
            &request,
            &ReviewAction {
                decision,
                reviewer_id: self.reviewer_id.clone(),
                comment,
                at: now,
            },
        );
        self.repo.save(updated.clone());

        tracing::info!(
            "Budget request {} marked {} by {}",
            request_id,
            updated.status,
            self.reviewer_id
        );

        Ok(updated)
    }

    pub fn into_inner(self) -> R {
        self.repo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{seed_dataset, InMemoryRepository};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 9, 30, 0).unwrap()
    }

    fn board() -> TaskBoard<InMemoryRepository<Task>> {
        let ds = seed_dataset().unwrap();
        TaskBoard::new(ds.task_repository(), "1")
    }

    #[test]
    fn test_toggle_subtask_is_saved() {
        let mut board = board();

        let updated = board.toggle_subtask("t1", "s4").unwrap();
        assert_eq!(updated.progress, 75);
        assert_eq!(board.get_task("t1").unwrap().progress, 75);
    }

    #[test]
    fn test_add_comment_attributes_current_user() {
        let mut board = board();

        let updated = board
            .add_comment("t4", "Venue confirmed".to_string(), now())
            .unwrap();

        let comment = updated.comments.last().unwrap();
        assert_eq!(comment.user_id, "1");
        assert_eq!(comment.content, "Venue confirmed");
        assert_eq!(board.get_task("t4").unwrap().comments.len(), 1);
    }

    #[test]
    fn test_move_task_keeps_other_tasks() {
        let mut board = board();
        let before = board.list_tasks();

        board.move_task("t4", TaskStatus::InProgress).unwrap();

        let after = board.list_tasks();
        assert_eq!(after.len(), before.len());
        for (b, a) in before.iter().zip(&after) {
            if b.id == "t4" {
                assert_eq!(a.status, TaskStatus::InProgress);
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_unknown_task_is_not_found() {
        let mut board = board();

        let err = board.move_task("t99", TaskStatus::Completed).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(board.list_tasks().len(), 6);
    }

    #[test]
    fn test_approve_and_reject() {
        let ds = seed_dataset().unwrap();
        let mut desk = ApprovalDesk::new(ds.budget_request_repository(), "1");
        assert_eq!(desk.pending().len(), 2);

        let approved = desk
            .approve("br1", Some("Within plan".to_string()), now())
            .unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        assert_eq!(approved.reviewed_by.as_deref(), Some("1"));
        assert_eq!(approved.comments.len(), 1);

        let rejected = desk.reject("br3", None, now()).unwrap();
        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert!(rejected.comments.is_empty());

        assert!(desk.pending().is_empty());
    }

    #[test]
    fn test_review_unknown_request_is_not_found() {
        let ds = seed_dataset().unwrap();
        let mut desk = ApprovalDesk::new(ds.budget_request_repository(), "1");

        let err = desk.approve("br404", None, now()).unwrap_err();
        assert!(matches!(
            err,
            AppError::NotFound {
                kind: EntityKind::BudgetRequest,
                ..
            }
        ));
    }
}
