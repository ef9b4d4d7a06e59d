//! Lookup and relation accessors over the dataset
//!
//! Lookups return `None` on a miss. Relation filters preserve source order
//! and never sort. Resolvers for nested references skip ids that do not
//! resolve to a user.

use super::models::*;
use super::repository::Entity;
use super::Dataset;

/// Find a record by id in source order
pub fn find_by_id<'a, T: Entity>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Filter records whose foreign key equals `id`, preserving order
fn filter_by<'a, T, F>(items: &'a [T], id: &str, key: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<&str>,
{
    items.iter().filter(|item| key(*item) == Some(id)).collect()
}

impl Dataset {
    // ===== Lookup by id =====

    pub fn user(&self, id: &str) -> Option<&User> {
        find_by_id(&self.users, id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        find_by_id(&self.projects, id)
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        find_by_id(&self.events, id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        find_by_id(&self.tasks, id)
    }

    pub fn meeting(&self, id: &str) -> Option<&Meeting> {
        find_by_id(&self.meetings, id)
    }

    pub fn file(&self, id: &str) -> Option<&FileMetadata> {
        find_by_id(&self.files, id)
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        find_by_id(&self.folders, id)
    }

    pub fn budget_request(&self, id: &str) -> Option<&BudgetRequest> {
        find_by_id(&self.finance.budget_requests, id)
    }

    /// Display name for a user id, "Unassigned" when absent or unknown
    pub fn user_name_or_unassigned(&self, id: Option<&str>) -> &str {
        id.and_then(|id| self.user(id))
            .map(|u| u.name.as_str())
            .unwrap_or("Unassigned")
    }

    // ===== Filter by relation =====

    pub fn tasks_for_project(&self, project_id: &str) -> Vec<&Task> {
        filter_by(&self.tasks, project_id, |t| t.project_id.as_deref())
    }

    pub fn tasks_for_event(&self, event_id: &str) -> Vec<&Task> {
        filter_by(&self.tasks, event_id, |t| t.event_id.as_deref())
    }

    pub fn tasks_for_assignee(&self, user_id: &str) -> Vec<&Task> {
        filter_by(&self.tasks, user_id, |t| t.assignee_id.as_deref())
    }

    pub fn events_for_project(&self, project_id: &str) -> Vec<&Event> {
        filter_by(&self.events, project_id, |e| e.project_id.as_deref())
    }

    pub fn meetings_for_project(&self, project_id: &str) -> Vec<&Meeting> {
        filter_by(&self.meetings, project_id, |m| m.project_id.as_deref())
    }

    pub fn meetings_for_event(&self, event_id: &str) -> Vec<&Meeting> {
        filter_by(&self.meetings, event_id, |m| m.event_id.as_deref())
    }

    pub fn files_for_project(&self, project_id: &str) -> Vec<&FileMetadata> {
        filter_by(&self.files, project_id, |f| f.project_id.as_deref())
    }

    pub fn files_for_event(&self, event_id: &str) -> Vec<&FileMetadata> {
        filter_by(&self.files, event_id, |f| f.event_id.as_deref())
    }

    /// Files directly inside a folder; `None` selects unfiled files
    pub fn files_in_folder(&self, folder_id: Option<&str>) -> Vec<&FileMetadata> {
        self.files
            .iter()
            .filter(|f| f.folder_id.as_deref() == folder_id)
            .collect()
    }

    /// Direct children of a folder; `None` selects root folders
    pub fn child_folders(&self, parent_id: Option<&str>) -> Vec<&Folder> {
        self.folders
            .iter()
            .filter(|f| f.parent_id.as_deref() == parent_id)
            .collect()
    }

    pub fn expenses_for_category(&self, category_id: &str) -> Vec<&Expense> {
        self.finance
            .expenses
            .iter()
            .filter(|e| e.category_id == category_id)
            .collect()
    }

    pub fn budget_requests_for_project(&self, project_id: &str) -> Vec<&BudgetRequest> {
        filter_by(&self.finance.budget_requests, project_id, |r| {
            r.project_id.as_deref()
        })
    }

    // ===== Nested reference resolution =====

    /// Project members paired with their user records
    pub fn project_members<'a>(
        &'a self,
        project: &'a Project,
    ) -> Vec<(&'a ProjectMember, &'a User)> {
        project
            .members
            .iter()
            .filter_map(|m| self.resolve_user(&m.user_id).map(|u| (m, u)))
            .collect()
    }

    /// Event attendees paired with their user records
    pub fn event_attendees<'a>(
        &'a self,
        event: &'a Event,
    ) -> Vec<(&'a EventAttendee, &'a User)> {
        event
            .attendees
            .iter()
            .filter_map(|a| self.resolve_user(&a.user_id).map(|u| (a, u)))
            .collect()
    }

    /// Meeting participants paired with their user records
    pub fn meeting_participants<'a>(
        &'a self,
        meeting: &'a Meeting,
    ) -> Vec<(&'a MeetingParticipant, &'a User)> {
        meeting
            .participants
            .iter()
            .filter_map(|p| self.resolve_user(&p.user_id).map(|u| (p, u)))
            .collect()
    }

    fn resolve_user(&self, id: &str) -> Option<&User> {
        let user = self.user(id);
        if user.is_none() {
            tracing::warn!("Skipping unresolved user reference: {}", id);
        }
        user
    }
}

#[cfg(test)]
mod tests {
    use crate::dataset::seed_dataset;

    #[test]
    fn test_lookup_hit_and_miss() {
        let ds = seed_dataset().unwrap();

        assert_eq!(ds.project("p1").unwrap().title, "Clean Water Initiative");
        assert!(ds.user("404").is_none());
        assert!(ds.project("404").is_none());
        assert!(ds.event("404").is_none());
        assert!(ds.task("404").is_none());
        assert!(ds.meeting("404").is_none());
        assert!(ds.file("404").is_none());
        assert!(ds.folder("404").is_none());
        assert!(ds.budget_request("404").is_none());
    }

    #[test]
    fn test_relation_filters_preserve_source_order() {
        let ds = seed_dataset().unwrap();

        let ids: Vec<&str> = ds
            .tasks_for_project("p1")
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["t1", "t2"]);

        let assigned: Vec<&str> = ds
            .tasks_for_assignee("3")
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(assigned, vec!["t2", "t5"]);

        assert!(ds.tasks_for_project("unknown").is_empty());
    }

    #[test]
    fn test_folder_tree_accessors() {
        let ds = seed_dataset().unwrap();

        let roots: Vec<&str> = ds.child_folders(None).into_iter().map(|f| f.id.as_str()).collect();
        assert_eq!(roots, vec!["fo1", "fo4"]);

        let unfiled: Vec<&str> = ds.files_in_folder(None).into_iter().map(|f| f.id.as_str()).collect();
        assert_eq!(unfiled, vec!["f4", "f5"]);

        assert_eq!(ds.files_in_folder(Some("fo3")).len(), 1);
    }

    #[test]
    fn test_unknown_members_are_skipped() {
        let ds = seed_dataset().unwrap();
        let project = ds.project("p1").unwrap();

        assert_eq!(project.members.len(), 4);
        let resolved = ds.project_members(project);
        assert_eq!(resolved.len(), 3);
        assert!(resolved.iter().all(|(m, u)| m.user_id == u.id));
    }

    #[test]
    fn test_resolved_pairs_outlive_a_cloned_entity() {
        let ds = seed_dataset().unwrap();
        let meeting = ds.meeting("m2").unwrap().clone();
        let event = ds.event("e1").unwrap().clone();

        let participants = ds.meeting_participants(&meeting);
        let attendees = ds.event_attendees(&event);

        assert_eq!(participants.len(), 2);
        assert!(participants.iter().all(|(p, u)| p.user_id == u.id));
        assert_eq!(attendees.len(), 3);
    }

    #[test]
    fn test_unassigned_fallback_name() {
        let ds = seed_dataset().unwrap();
        let blocked = ds.task("t6").unwrap();

        assert_eq!(ds.user_name_or_unassigned(blocked.assignee_id.as_deref()), "Unassigned");
        assert_eq!(ds.user_name_or_unassigned(Some("4")), "Lucas Ferreira");
        assert_eq!(ds.user_name_or_unassigned(Some("9")), "Unassigned");
    }
}
