//! Services module
//!
//! Derived metrics, layout and view adapters over the dataset, plus the
//! commands that apply local mutations through a repository.

pub mod board;
pub mod dashboard;
pub mod details;
pub mod files;
pub mod finance;
pub mod metrics;
pub mod mutations;
pub mod schedule;
pub mod settings;
pub mod tasks;
pub mod timeline;

pub use board::{ApprovalDesk, TaskBoard};
pub use dashboard::{build_snapshot, DashboardSnapshot};
pub use schedule::{ScheduleItem, ScheduleKind};
pub use settings::{MetricsSettings, SettingsService};
