//! Dataset models
//!
//! Rust structs representing the dashboard entities.
//! Field names and enum strings match the JSON dataset exactly, since
//! badges and derived computations key off the literal values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Implements `Display` in terms of the enum's `as_str`
macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

// ===== Users =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Head,
    Manager,
    Employee,
    Volunteer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Head => "Head",
            Self::Manager => "Manager",
            Self::Employee => "Employee",
            Self::Volunteer => "Volunteer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Administration,
    Finance,
    Programs,
    Operations,
    Communications,
    #[serde(rename = "Human Resources")]
    HumanResources,
    Fundraising,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administration => "Administration",
            Self::Finance => "Finance",
            Self::Programs => "Programs",
            Self::Operations => "Operations",
            Self::Communications => "Communications",
            Self::HumanResources => "Human Resources",
            Self::Fundraising => "Fundraising",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    pub department: Department,
    #[serde(default)]
    pub avatar: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub is_active: bool,
}

// ===== Projects =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Planning,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::InProgress => "In Progress",
            Self::OnHold => "On Hold",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Planning and in-progress projects count as active on the overview
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Planning | Self::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub user_id: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Whole currency units
    pub budget: f64,
    /// Whole currency units; may exceed `budget`
    pub spent: f64,
    pub department: Department,
    pub lead_id: String,
    #[serde(default)]
    pub members: Vec<ProjectMember>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tracked independently of tasks, 0-100
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ===== Events =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    Upcoming,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendeeRole {
    Organizer,
    Coordinator,
    Speaker,
    Volunteer,
    Participant,
}

impl AttendeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Organizer => "Organizer",
            Self::Coordinator => "Coordinator",
            Self::Speaker => "Speaker",
            Self::Volunteer => "Volunteer",
            Self::Participant => "Participant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendee {
    pub user_id: String,
    pub role: AttendeeRole,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub status: EventStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: String,
    pub budget: f64,
    pub spent: f64,
    #[serde(default)]
    pub attendees: Vec<EventAttendee>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ===== Tasks =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "In Review")]
    InReview,
    Completed,
    Blocked,
}

impl TaskStatus {
    /// Kanban column order
    pub const ALL: [TaskStatus; 5] = [
        Self::Todo,
        Self::InProgress,
        Self::InReview,
        Self::Completed,
        Self::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::InReview => "In Review",
            Self::Completed => "Completed",
            Self::Blocked => "Blocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskVisibility {
    Public,
    Restricted,
    Private,
}

impl TaskVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Restricted => "Restricted",
            Self::Private => "Private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAttachment {
    pub id: String,
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskComment {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub visibility: TaskVisibility,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<TaskAttachment>,
    #[serde(default)]
    pub comments: Vec<TaskComment>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Stored progress, 0-100. Superseded by subtask completion when
    /// subtasks exist (see `metrics::effective_progress`).
    pub progress: u8,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ===== Meetings =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingType {
    Standalone,
    Project,
    Event,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standalone => "Standalone",
            Self::Project => "Project",
            Self::Event => "Event",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Accepted,
    Declined,
    Pending,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingParticipant {
    pub user_id: String,
    pub is_required: bool,
    pub status: RsvpStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub meeting_type: MeetingType,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub agenda: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub participants: Vec<MeetingParticipant>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

// ===== Files =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileCategory {
    Document,
    Image,
    Video,
    Spreadsheet,
    Presentation,
    Other,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Spreadsheet => "Spreadsheet",
            Self::Presentation => "Presentation",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    pub category: FileCategory,
    /// Bytes
    pub size: u64,
    pub mime_type: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub is_starred: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

// ===== Finance (page-local records) =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: String,
    pub name: String,
    pub allocated: f64,
    pub spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub category_id: String,
    pub description: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub submitted_by: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: String,
    pub name: String,
    pub total_donated: f64,
    pub last_donation_at: DateTime<Utc>,
    #[serde(default)]
    pub is_recurring: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewComment {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub requested_by: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<ReviewComment>,
}

/// Finance page data: budget lines, expenses, donors and requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceLedger {
    #[serde(default)]
    pub categories: Vec<BudgetCategory>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub donors: Vec<Donor>,
    #[serde(default)]
    pub budget_requests: Vec<BudgetRequest>,
}

display_as_str!(
    UserRole,
    Department,
    ProjectStatus,
    EventStatus,
    AttendeeRole,
    TaskStatus,
    TaskPriority,
    TaskVisibility,
    MeetingType,
    RsvpStatus,
    FileCategory,
    RequestStatus,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings_match_dataset() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(
            serde_json::to_string(&ProjectStatus::OnHold).unwrap(),
            "\"On Hold\""
        );
        assert_eq!(
            serde_json::to_string(&Department::HumanResources).unwrap(),
            "\"Human Resources\""
        );
        assert_eq!(serde_json::to_string(&RsvpStatus::Pending).unwrap(), "\"pending\"");

        let status: TaskStatus = serde_json::from_str("\"In Review\"").unwrap();
        assert_eq!(status, TaskStatus::InReview);
    }

    #[test]
    fn test_display_uses_literal_value() {
        assert_eq!(TaskStatus::InReview.to_string(), "In Review");
        assert_eq!(RequestStatus::Approved.to_string(), "approved");
        assert_eq!(MeetingType::Event.to_string(), "Event");
    }

    #[test]
    fn test_as_str_agrees_with_serde() {
        for status in TaskStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_meeting_type_field_is_named_type() {
        let json = r#"{
            "id": "m-x",
            "title": "Sync",
            "type": "Project",
            "projectId": "p1",
            "startDate": "2026-01-05T10:00:00Z",
            "endDate": "2026-01-05T11:00:00Z",
            "createdBy": "1",
            "createdAt": "2026-01-01T00:00:00Z"
        }"#;
        let meeting: Meeting = serde_json::from_str(json).unwrap();
        assert_eq!(meeting.meeting_type, MeetingType::Project);
        assert!(meeting.participants.is_empty());
    }
}
