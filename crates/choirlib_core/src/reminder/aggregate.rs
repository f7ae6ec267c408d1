//! Per-recipient aggregation of classified items.
//!
//! # Responsibility
//! - Merge every due item for the same holder into one `ReminderGroup` so
//!   each person receives exactly one email per run.
//!
//! # Invariants
//! - The grouping key is the raw email string: case-sensitive, untrimmed.
//!   Equivalent-but-differently-cased emails are distinct recipients;
//!   upstream data hygiene owns that, not this component.
//! - Bucket insertion order follows row-scan order, top to bottom.

use crate::model::reminder::{BucketSet, CheckedOutItem, ReminderGroup};
use std::collections::BTreeMap;

/// Placeholder greeting name for rows with a blank holder name.
pub const FALLBACK_HOLDER_NAME: &str = "Choir Member";

/// Groups classified items by recipient email.
///
/// Map ordering is deterministic (sorted by email) but carries no meaning;
/// only the per-bucket item order inside a group is contractual.
pub fn aggregate_reminders(
    classified: Vec<(CheckedOutItem, BucketSet)>,
) -> BTreeMap<String, ReminderGroup> {
    let mut groups: BTreeMap<String, ReminderGroup> = BTreeMap::new();

    for (item, buckets) in classified {
        let group = groups.entry(item.holder_email.clone()).or_insert_with(|| {
            let name = if item.holder_name.trim().is_empty() {
                FALLBACK_HOLDER_NAME.to_string()
            } else {
                item.holder_name.clone()
            };
            ReminderGroup::new(item.holder_email.clone(), name)
        });

        if buckets.overdue {
            group.overdue.push(item.clone());
        }
        if buckets.due_tomorrow {
            group.due_tomorrow.push(item.clone());
        }
        if buckets.due_in_week {
            group.due_in_week.push(item);
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::{aggregate_reminders, FALLBACK_HOLDER_NAME};
    use crate::model::reminder::{BucketSet, CheckedOutItem};
    use chrono::NaiveDate;

    fn item(id: &str, name: &str, email: &str) -> CheckedOutItem {
        CheckedOutItem {
            item_id: id.to_string(),
            holder_name: name.to_string(),
            holder_email: email.to_string(),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
        }
    }

    fn tomorrow_bucket() -> BucketSet {
        BucketSet {
            due_tomorrow: true,
            ..BucketSet::default()
        }
    }

    #[test]
    fn same_email_merges_into_one_group_in_scan_order() {
        let groups = aggregate_reminders(vec![
            (item("10", "Pat", "p@x.com"), tomorrow_bucket()),
            (item("11", "Pat", "p@x.com"), tomorrow_bucket()),
        ]);

        assert_eq!(groups.len(), 1);
        let group = groups.get("p@x.com").unwrap();
        assert_eq!(group.due_tomorrow.len(), 2);
        assert_eq!(group.due_tomorrow[0].item_id, "10");
        assert_eq!(group.due_tomorrow[1].item_id, "11");
    }

    #[test]
    fn email_key_is_case_sensitive() {
        let groups = aggregate_reminders(vec![
            (item("10", "Pat", "p@x.com"), tomorrow_bucket()),
            (item("11", "Pat", "P@x.com"), tomorrow_bucket()),
        ]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn blank_holder_name_falls_back_to_placeholder() {
        let groups = aggregate_reminders(vec![(item("10", "  ", "p@x.com"), tomorrow_bucket())]);
        assert_eq!(groups.get("p@x.com").unwrap().name, FALLBACK_HOLDER_NAME);
    }
}
