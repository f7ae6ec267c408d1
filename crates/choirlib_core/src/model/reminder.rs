//! Reminder-run data structures.
//!
//! # Responsibility
//! - Define the temporal buckets and the per-recipient aggregate.
//! - Provide the run-scoped calendar computed in the store's time zone.
//!
//! # Invariants
//! - The three bucket boundaries (`< today`, `== today+1`, `== today+7`)
//!   are disjoint, so an item lands in at most one bucket per run.
//! - `ReminderCalendar::today` is the calendar day in the store zone, not
//!   the host process zone.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Temporal reminder category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Overdue,
    DueTomorrow,
    DueInWeek,
}

/// Bucket membership for one classified item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketSet {
    pub overdue: bool,
    pub due_tomorrow: bool,
    pub due_in_week: bool,
}

impl BucketSet {
    pub fn is_empty(&self) -> bool {
        !(self.overdue || self.due_tomorrow || self.due_in_week)
    }

    pub fn contains(&self, bucket: Bucket) -> bool {
        match bucket {
            Bucket::Overdue => self.overdue,
            Bucket::DueTomorrow => self.due_tomorrow,
            Bucket::DueInWeek => self.due_in_week,
        }
    }
}

/// Read-only projection of a checked-out row used during one reminder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedOutItem {
    pub item_id: String,
    pub holder_name: String,
    pub holder_email: String,
    pub due_date: NaiveDate,
}

/// Per-recipient aggregate of everything worth mentioning today.
///
/// Keyed by the raw holder email; discarded after the email is composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderGroup {
    pub email: String,
    pub name: String,
    pub overdue: Vec<CheckedOutItem>,
    pub due_tomorrow: Vec<CheckedOutItem>,
    pub due_in_week: Vec<CheckedOutItem>,
}

impl ReminderGroup {
    /// Creates an empty group for one recipient.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            overdue: Vec::new(),
            due_tomorrow: Vec::new(),
            due_in_week: Vec::new(),
        }
    }
}

/// Date thresholds for one reminder run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderCalendar {
    pub today: NaiveDate,
    pub tomorrow: NaiveDate,
    pub one_week_out: NaiveDate,
    /// Overdue reminders only go out on Monday runs.
    pub monday_run: bool,
}

impl ReminderCalendar {
    /// Builds the calendar for `now` as seen from the store's time zone.
    pub fn from_instant(now: DateTime<Utc>, zone: Tz) -> Self {
        let today = now.with_timezone(&zone).date_naive();
        Self::for_day(today)
    }

    /// Builds the calendar for an explicit local calendar day.
    pub fn for_day(today: NaiveDate) -> Self {
        Self {
            today,
            tomorrow: today + Days::new(1),
            one_week_out: today + Days::new(7),
            monday_run: today.weekday() == Weekday::Mon,
        }
    }
}
