//! Per-row bucket classification.
//!
//! # Responsibility
//! - Decide, for one normalized row and one run calendar, whether the row
//!   is ignored, skipped as malformed, quiet this run, or due for mention.
//!
//! # Invariants
//! - The four outcomes are mutually exclusive and exhaustive per row.
//! - Overdue membership requires a Monday run; overdue nagging is batched
//!   weekly instead of firing every day.
//! - All comparisons are calendar-day only.

use crate::model::item::{ItemRecord, ItemStatus};
use crate::model::reminder::{BucketSet, CheckedOutItem, ReminderCalendar};

/// Why a checked-out row was excluded from a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingEmail,
    MissingOrInvalidDueDate,
}

/// Disposition of one row within one reminder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Row is not checked out; not an error, not counted.
    NotCheckedOut,
    /// Row is checked out but malformed; counted and logged by the caller.
    Skipped(SkipReason),
    /// Well-formed but no bucket boundary matched today.
    NoReminderDue,
    /// Row needs mention in at least one bucket.
    Due {
        item: CheckedOutItem,
        buckets: BucketSet,
    },
}

/// Classifies one row against the run calendar.
pub fn classify_item(record: &ItemRecord, calendar: &ReminderCalendar) -> Classification {
    if record.status != ItemStatus::CheckedOut {
        return Classification::NotCheckedOut;
    }
    if record.has_blank_email() {
        return Classification::Skipped(SkipReason::MissingEmail);
    }
    let Some(due_date) = record.due_date else {
        return Classification::Skipped(SkipReason::MissingOrInvalidDueDate);
    };

    let buckets = BucketSet {
        overdue: due_date < calendar.today && calendar.monday_run,
        due_tomorrow: due_date == calendar.tomorrow,
        due_in_week: due_date == calendar.one_week_out,
    };

    if buckets.is_empty() {
        return Classification::NoReminderDue;
    }

    Classification::Due {
        item: CheckedOutItem {
            item_id: record.id.clone(),
            holder_name: record.holder_name.clone(),
            holder_email: record.holder_email.clone(),
            due_date,
        },
        buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_item, Classification, SkipReason};
    use crate::model::item::{ItemRecord, ItemStatus};
    use crate::model::reminder::ReminderCalendar;
    use chrono::NaiveDate;

    fn record(status: ItemStatus, email: &str, due: Option<NaiveDate>) -> ItemRecord {
        ItemRecord {
            row_index: 1,
            id: "7".to_string(),
            name: "Messiah".to_string(),
            status,
            holder_name: "Alto One".to_string(),
            holder_email: email.to_string(),
            due_date: due,
        }
    }

    fn tuesday() -> ReminderCalendar {
        ReminderCalendar::for_day(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap())
    }

    fn monday() -> ReminderCalendar {
        ReminderCalendar::for_day(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
    }

    #[test]
    fn checked_in_rows_are_ignored() {
        let row = record(ItemStatus::CheckedIn, "a@x.com", None);
        assert_eq!(classify_item(&row, &tuesday()), Classification::NotCheckedOut);
    }

    #[test]
    fn blank_email_is_skipped_before_due_date_checks() {
        let row = record(ItemStatus::CheckedOut, "   ", None);
        assert_eq!(
            classify_item(&row, &tuesday()),
            Classification::Skipped(SkipReason::MissingEmail)
        );
    }

    #[test]
    fn missing_due_date_is_skipped() {
        let row = record(ItemStatus::CheckedOut, "a@x.com", None);
        assert_eq!(
            classify_item(&row, &tuesday()),
            Classification::Skipped(SkipReason::MissingOrInvalidDueDate)
        );
    }

    #[test]
    fn overdue_requires_monday() {
        let due = NaiveDate::from_ymd_opt(2025, 3, 1);
        let row = record(ItemStatus::CheckedOut, "a@x.com", due);

        assert_eq!(classify_item(&row, &tuesday()), Classification::NoReminderDue);

        match classify_item(&row, &monday()) {
            Classification::Due { buckets, .. } => {
                assert!(buckets.overdue);
                assert!(!buckets.due_tomorrow);
                assert!(!buckets.due_in_week);
            }
            other => panic!("expected overdue bucket, got {other:?}"),
        }
    }

    #[test]
    fn tomorrow_and_week_boundaries_are_exact() {
        let calendar = tuesday();

        let tomorrow = record(ItemStatus::CheckedOut, "a@x.com", Some(calendar.tomorrow));
        assert!(matches!(
            classify_item(&tomorrow, &calendar),
            Classification::Due { buckets, .. } if buckets.due_tomorrow
        ));

        let week = record(ItemStatus::CheckedOut, "a@x.com", Some(calendar.one_week_out));
        assert!(matches!(
            classify_item(&week, &calendar),
            Classification::Due { buckets, .. } if buckets.due_in_week
        ));

        let six_days = NaiveDate::from_ymd_opt(2025, 3, 17);
        let neither = record(ItemStatus::CheckedOut, "a@x.com", six_days);
        assert_eq!(classify_item(&neither, &calendar), Classification::NoReminderDue);
    }
}
