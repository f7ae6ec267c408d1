//! Notification rendering.
//!
//! # Responsibility
//! - Render one deterministic subject/body pair from a reminder group.
//!
//! # Invariants
//! - Subject priority is Overdue > DueTomorrow > DueInWeek.
//! - Sections appear in fixed order (overdue, tomorrow, week), each only
//!   when non-empty; items group under formatted due-date sub-headers in
//!   first-seen date order.
//! - Pure and side-effect free; delivery is the caller's problem.

use crate::model::reminder::{CheckedOutItem, ReminderGroup};

const SUBJECT_OVERDUE: &str = "OVERDUE: Sheet Music Return - San Diego Saints Choir";
const SUBJECT_TOMORROW: &str = "Sheet Music Due Tomorrow - San Diego Saints Choir";
const SUBJECT_WEEK: &str = "Sheet Music Due in 1 Week - San Diego Saints Choir";
const SIGNATURE: &str = "Thank you,\nSan Diego Saints Choir Library";

/// Composed notification ready for a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEmail {
    pub subject: String,
    pub body: String,
}

/// Renders the consolidated reminder for one recipient.
pub fn compose_reminder(group: &ReminderGroup) -> ReminderEmail {
    let has_overdue = !group.overdue.is_empty();
    let has_tomorrow = !group.due_tomorrow.is_empty();
    let has_week = !group.due_in_week.is_empty();

    let subject = if has_overdue {
        SUBJECT_OVERDUE
    } else if has_tomorrow {
        SUBJECT_TOMORROW
    } else {
        SUBJECT_WEEK
    };

    let mut body = format!("Hi {},\n\n", group.name);

    if has_overdue && (has_tomorrow || has_week) {
        body.push_str("This is a reminder about your checked-out sheet music:\n\n");
    } else if has_overdue {
        body.push_str(
            "This is a notice that you have OVERDUE sheet music that needs to be returned:\n\n",
        );
    } else if has_tomorrow {
        body.push_str("This is a reminder that you have sheet music due back TOMORROW:\n\n");
    } else {
        body.push_str(
            "This is a friendly reminder that you have sheet music due back in 7 days:\n\n",
        );
    }

    if has_overdue {
        push_section(&mut body, "OVERDUE ITEMS:", "Was due on", &group.overdue);
    }
    if has_tomorrow {
        push_section(&mut body, "ITEMS DUE TOMORROW:", "Due on", &group.due_tomorrow);
    }
    if has_week {
        push_section(&mut body, "ITEMS DUE IN 7 DAYS:", "Due on", &group.due_in_week);
    }

    if has_overdue {
        body.push_str("Please return overdue items as soon as possible");
        if has_tomorrow || has_week {
            body.push_str(", and plan ahead for upcoming due dates");
        }
        body.push_str(".\n\n");
    } else if has_tomorrow {
        body.push_str(
            "Please return these items by tomorrow. If you need more time, \
             please contact the choir librarian.\n\n",
        );
    } else {
        body.push_str(
            "Please plan to return these items by the due date. If you need more time, \
             please contact the choir librarian.\n\n",
        );
    }

    body.push_str(SIGNATURE);

    ReminderEmail {
        subject: subject.to_string(),
        body,
    }
}

fn push_section(body: &mut String, header: &str, date_prefix: &str, items: &[CheckedOutItem]) {
    body.push_str(header);
    body.push('\n');
    for (date_label, date_items) in group_by_due_date(items) {
        body.push_str(&format!("  {date_prefix} {date_label}:\n"));
        for item in date_items {
            body.push_str(&format!("  - Item #{}\n", item.item_id));
        }
    }
    body.push('\n');
}

/// Groups items under their formatted due-date label, first-seen order.
fn group_by_due_date(items: &[CheckedOutItem]) -> Vec<(String, Vec<&CheckedOutItem>)> {
    let mut grouped: Vec<(String, Vec<&CheckedOutItem>)> = Vec::new();

    for item in items {
        let label = item.due_date.format("%b %-d, %Y").to_string();
        match grouped.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, bucket)) => bucket.push(item),
            None => grouped.push((label, vec![item])),
        }
    }

    grouped
}
