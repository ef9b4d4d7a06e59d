//! Settings service
//!
//! Manages the tunable metric heuristics using JSON file storage.
//! Missing fields fall back to the constants in `config`.

use crate::config;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Workload score tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSettings {
    /// Open tasks that map to a 100% score
    #[serde(default = "default_task_cap")]
    pub task_cap: u32,
    #[serde(default = "default_moderate_threshold")]
    pub moderate_threshold: f64,
    #[serde(default = "default_heavy_threshold")]
    pub heavy_threshold: f64,
    #[serde(default = "default_overloaded_threshold")]
    pub overloaded_threshold: f64,
}

fn default_task_cap() -> u32 {
    config::WORKLOAD_TASK_CAP
}

fn default_moderate_threshold() -> f64 {
    config::WORKLOAD_MODERATE_THRESHOLD
}

fn default_heavy_threshold() -> f64 {
    config::WORKLOAD_HEAVY_THRESHOLD
}

fn default_overloaded_threshold() -> f64 {
    config::WORKLOAD_OVERLOADED_THRESHOLD
}

impl Default for WorkloadSettings {
    fn default() -> Self {
        Self {
            task_cap: default_task_cap(),
            moderate_threshold: default_moderate_threshold(),
            heavy_threshold: default_heavy_threshold(),
            overloaded_threshold: default_overloaded_threshold(),
        }
    }
}

/// Project timeline window and bar sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSettings {
    #[serde(default = "default_months_back")]
    pub months_back: u32,
    #[serde(default = "default_months_forward")]
    pub months_forward: u32,
    /// Bar length for items without an end date
    #[serde(default = "default_item_duration")]
    pub default_duration_days: i64,
    #[serde(default = "default_min_bar_width")]
    pub min_bar_width_pct: f64,
}

fn default_months_back() -> u32 {
    config::TIMELINE_MONTHS_BACK
}

fn default_months_forward() -> u32 {
    config::TIMELINE_MONTHS_FORWARD
}

fn default_item_duration() -> i64 {
    config::TIMELINE_DEFAULT_DURATION_DAYS
}

fn default_min_bar_width() -> f64 {
    config::TIMELINE_MIN_BAR_WIDTH_PCT
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            months_back: default_months_back(),
            months_forward: default_months_forward(),
            default_duration_days: default_item_duration(),
            min_bar_width_pct: default_min_bar_width(),
        }
    }
}

/// Schedule health and budget badge tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettings {
    /// Planned duration for projects without an end date
    #[serde(default = "default_project_duration")]
    pub default_project_duration_days: i64,
    #[serde(default = "default_on_track_tolerance")]
    pub on_track_tolerance: f64,
    #[serde(default = "default_near_limit_threshold")]
    pub budget_near_limit_threshold: f64,
    #[serde(default = "default_upcoming_window")]
    pub upcoming_window_days: i64,
}

fn default_project_duration() -> i64 {
    config::DEFAULT_PROJECT_DURATION_DAYS
}

fn default_on_track_tolerance() -> f64 {
    config::ON_TRACK_TOLERANCE
}

fn default_near_limit_threshold() -> f64 {
    config::BUDGET_NEAR_LIMIT_THRESHOLD
}

fn default_upcoming_window() -> i64 {
    config::UPCOMING_WINDOW_DAYS
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            default_project_duration_days: default_project_duration(),
            on_track_tolerance: default_on_track_tolerance(),
            budget_near_limit_threshold: default_near_limit_threshold(),
            upcoming_window_days: default_upcoming_window(),
        }
    }
}

/// All tunable heuristics of the derived metrics layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSettings {
    #[serde(default)]
    pub workload: WorkloadSettings,
    #[serde(default)]
    pub timeline: TimelineSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    /// Author of locally appended comments and reviews
    #[serde(default = "default_current_user")]
    pub current_user_id: String,
}

fn default_current_user() -> String {
    config::CURRENT_USER_ID.to_string()
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            workload: WorkloadSettings::default(),
            timeline: TimelineSettings::default(),
            schedule: ScheduleSettings::default(),
            current_user_id: default_current_user(),
        }
    }
}

impl MetricsSettings {
    /// Reject values the metric functions cannot work with
    pub fn validate(&self) -> Result<()> {
        let w = &self.workload;
        if w.task_cap == 0 {
            return Err(AppError::InvalidSettings(
                "workload task cap must be at least 1".to_string(),
            ));
        }
        if !(0.0 <= w.moderate_threshold
            && w.moderate_threshold <= w.heavy_threshold
            && w.heavy_threshold <= w.overloaded_threshold
            && w.overloaded_threshold <= 100.0)
        {
            return Err(AppError::InvalidSettings(format!(
                "workload thresholds must ascend within 0-100, got {}/{}/{}",
                w.moderate_threshold, w.heavy_threshold, w.overloaded_threshold
            )));
        }

        let t = &self.timeline;
        if t.months_forward == 0 {
            return Err(AppError::InvalidSettings(
                "timeline needs at least one forward month".to_string(),
            ));
        }
        let months = t.months_back.checked_add(t.months_forward);
        if months.map_or(true, |n| n > config::MAX_TIMELINE_MONTHS) {
            return Err(AppError::InvalidSettings(format!(
                "timeline window cannot exceed {} months",
                config::MAX_TIMELINE_MONTHS
            )));
        }
        if t.default_duration_days <= 0 {
            return Err(AppError::InvalidSettings(
                "default timeline duration must be positive".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&t.min_bar_width_pct) {
            return Err(AppError::InvalidSettings(
                "minimum bar width must be within 0-100".to_string(),
            ));
        }

        let s = &self.schedule;
        if s.default_project_duration_days <= 0 {
            return Err(AppError::InvalidSettings(
                "default project duration must be positive".to_string(),
            ));
        }
        if s.on_track_tolerance < 0.0 {
            return Err(AppError::InvalidSettings(
                "on-track tolerance cannot be negative".to_string(),
            ));
        }
        if s.upcoming_window_days < 0 {
            return Err(AppError::InvalidSettings(
                "upcoming window cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Service for loading and saving metric settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            settings_path: data_dir.join("settings.json"),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<MetricsSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = MetricsSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: MetricsSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::InvalidSettings(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &MetricsSettings) -> Result<()> {
        settings.validate()?;

        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Update workload settings
    pub async fn update_workload(&self, workload: WorkloadSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.workload = workload;
        self.save(&settings).await
    }

    /// Update timeline settings
    pub async fn update_timeline(&self, timeline: TimelineSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.timeline = timeline;
        self.save(&settings).await
    }

    /// Update schedule settings
    pub async fn update_schedule(&self, schedule: ScheduleSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.schedule = schedule;
        self.save(&settings).await
    }
}
