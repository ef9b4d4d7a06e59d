//! Dashboard configuration constants
//!
//! Central location for the presentation heuristics used by the derived
//! metrics layer. These are display tuning knobs, not business rules;
//! `MetricsSettings` can override each of them at runtime.

// ===== Workload =====

/// Number of open assigned tasks that corresponds to a 100% workload score
pub const WORKLOAD_TASK_CAP: u32 = 10;

/// Score at or above which a member is "Moderate"
pub const WORKLOAD_MODERATE_THRESHOLD: f64 = 25.0;
/// Score at or above which a member is "Heavy"
pub const WORKLOAD_HEAVY_THRESHOLD: f64 = 50.0;
/// Score at or above which a member is "Overloaded"
pub const WORKLOAD_OVERLOADED_THRESHOLD: f64 = 75.0;

// ===== Project Health =====

/// Planned duration in days for a project or event without an end date.
/// Shared by every report; some pages used 365 in the past.
pub const DEFAULT_PROJECT_DURATION_DAYS: i64 = 180;

/// Percentage points of slack between progress and elapsed time
/// before a project counts as ahead of or behind schedule
pub const ON_TRACK_TOLERANCE: f64 = 10.0;

// ===== Budget =====

/// Utilization at or above which a budget is "Near Limit"
pub const BUDGET_NEAR_LIMIT_THRESHOLD: f64 = 90.0;

// ===== Timeline =====

/// Months shown before the current month on the project timeline
pub const TIMELINE_MONTHS_BACK: u32 = 2;
/// Months shown from the current month onward on the project timeline
pub const TIMELINE_MONTHS_FORWARD: u32 = 12;

/// Duration in days used for timeline bars without an end date
pub const TIMELINE_DEFAULT_DURATION_DAYS: i64 = 30;

/// Smallest bar width in percent so short items stay clickable
pub const TIMELINE_MIN_BAR_WIDTH_PCT: f64 = 0.5;

// ===== Session =====

/// Author id attributed to locally appended comments and reviews
pub const CURRENT_USER_ID: &str = "1";

/// Look-ahead window in days for "upcoming" events and meetings
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

// ===== Settings Limits =====

/// Largest timeline window accepted by settings validation (10 years)
pub const MAX_TIMELINE_MONTHS: u32 = 120;
