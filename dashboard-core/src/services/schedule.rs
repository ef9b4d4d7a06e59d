//! Calendar schedule
//!
//! Events and meetings share the calendar and the detail side panel. They
//! are carried as a tagged `ScheduleItem` so callers branch on the variant
//! instead of probing fields.

use crate::dataset::{Dataset, Event, EventStatus, Meeting};
use crate::error::{AppError, EntityKind, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Discriminant of a `ScheduleItem`, used to address one from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Event,
    Meeting,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScheduleItem<'a> {
    Event(&'a Event),
    Meeting(&'a Meeting),
}

impl<'a> ScheduleItem<'a> {
    /// Look up the item a calendar entry points at
    pub fn resolve(dataset: &'a Dataset, kind: ScheduleKind, id: &str) -> Result<Self> {
        match kind {
            ScheduleKind::Event => dataset
                .event(id)
                .map(Self::Event)
                .ok_or_else(|| AppError::not_found(EntityKind::Event, id)),
            ScheduleKind::Meeting => dataset
                .meeting(id)
                .map(Self::Meeting)
                .ok_or_else(|| AppError::not_found(EntityKind::Meeting, id)),
        }
    }

    pub fn kind(&self) -> ScheduleKind {
        match self {
            Self::Event(_) => ScheduleKind::Event,
            Self::Meeting(_) => ScheduleKind::Meeting,
        }
    }

    pub fn id(&self) -> &'a str {
        match *self {
            Self::Event(e) => &e.id,
            Self::Meeting(m) => &m.id,
        }
    }

    pub fn title(&self) -> &'a str {
        match *self {
            Self::Event(e) => &e.title,
            Self::Meeting(m) => &m.title,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        match self {
            Self::Event(e) => e.start_date,
            Self::Meeting(m) => m.start_date,
        }
    }

    pub fn end(&self) -> DateTime<Utc> {
        match self {
            Self::Event(e) => e.end_date,
            Self::Meeting(m) => m.end_date,
        }
    }

    /// Whether the item spans any part of `day`
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        let end = self.end().max(self.start());
        self.start().date_naive() <= day && day <= end.date_naive()
    }

    fn is_cancelled(&self) -> bool {
        matches!(self, Self::Event(e) if e.status == EventStatus::Cancelled)
    }
}

/// Every event and meeting, ordered by start
pub fn schedule_items(dataset: &Dataset) -> Vec<ScheduleItem<'_>> {
    let mut items: Vec<ScheduleItem> = dataset
        .events
        .iter()
        .map(ScheduleItem::Event)
        .chain(dataset.meetings.iter().map(ScheduleItem::Meeting))
        .collect();
    items.sort_by_key(|item| item.start());
    items
}

/// Items occurring on `day`, ordered by start
pub fn day_agenda(dataset: &Dataset, day: NaiveDate) -> Vec<ScheduleItem<'_>> {
    schedule_items(dataset)
        .into_iter()
        .filter(|item| item.occurs_on(day))
        .collect()
}

/// Items starting within `days` of `now`, cancelled events excluded
pub fn upcoming(dataset: &Dataset, now: DateTime<Utc>, days: i64) -> Vec<ScheduleItem<'_>> {
    let horizon = now + Duration::days(days);
    schedule_items(dataset)
        .into_iter()
        .filter(|item| !item.is_cancelled())
        .filter(|item| item.start() >= now && item.start() <= horizon)
        .collect()
}
