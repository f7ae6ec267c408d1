//! Daily reminder run orchestration.
//!
//! # Responsibility
//! - Drive one reminder run: resolve the store zone, scan the snapshot
//!   once, classify, aggregate, compose and deliver per recipient.
//!
//! # Invariants
//! - The snapshot is read exactly once per run; classification sees a
//!   consistent point-in-time view.
//! - Delivery failures are caught at the per-recipient boundary and never
//!   abort the batch.
//! - Store faults are fatal for the run with no partial mail side effects
//!   beyond recipients already processed.

use crate::config::LibraryConfig;
use crate::mail::{MailTransport, OutboundEmail};
use crate::model::item::ItemRecord;
use crate::model::reminder::ReminderCalendar;
use crate::reminder::aggregate::aggregate_reminders;
use crate::reminder::classify::{classify_item, Classification, SkipReason};
use crate::reminder::compose::compose_reminder;
use crate::store::inventory_store::{InventoryStore, StoreError};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Counters for one completed reminder run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderRunReport {
    /// Data rows scanned (header excluded).
    pub rows_scanned: usize,
    /// Checked-out rows skipped as malformed.
    pub skipped: usize,
    /// Items that landed in at least one bucket.
    pub scheduled_items: usize,
    /// Distinct recipients with a non-empty group.
    pub recipients: usize,
    pub emails_sent: usize,
    pub delivery_failures: usize,
}

/// Reminder-run error. Only store faults are fatal.
#[derive(Debug)]
pub enum ReminderError {
    Store(StoreError),
}

impl Display for ReminderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReminderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ReminderError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Daily reminder engine over a store and a mail transport.
pub struct ReminderService<S: InventoryStore, M: MailTransport> {
    store: S,
    mail: M,
    config: LibraryConfig,
}

impl<S: InventoryStore, M: MailTransport> ReminderService<S, M> {
    pub fn new(store: S, mail: M, config: LibraryConfig) -> Self {
        Self {
            store,
            mail,
            config,
        }
    }

    /// Runs today's reminders against the current clock.
    pub fn run_daily(&self) -> Result<ReminderRunReport, ReminderError> {
        self.run_daily_at(Utc::now())
    }

    /// Runs the reminders for an explicit instant.
    ///
    /// The instant is translated into the store's configured zone before
    /// any calendar-day math; host-local time never leaks in.
    pub fn run_daily_at(&self, now: DateTime<Utc>) -> Result<ReminderRunReport, ReminderError> {
        let zone = self.store.resolve_time_zone()?;
        let calendar = ReminderCalendar::from_instant(now, zone);
        info!(
            "event=reminder_run module=reminder status=start today={} monday={}",
            calendar.today, calendar.monday_run
        );

        let layout = &self.config.items_sheet;
        let rows = self.store.read_rows()?;

        let mut report = ReminderRunReport::default();
        let mut classified = Vec::new();

        for (row_index, cells) in rows.iter().enumerate().skip(1) {
            report.rows_scanned += 1;
            let record = ItemRecord::from_cells(row_index, cells, layout);

            match classify_item(&record, &calendar) {
                Classification::NotCheckedOut | Classification::NoReminderDue => {}
                Classification::Skipped(reason) => {
                    let detail = match reason {
                        SkipReason::MissingEmail => "no_email",
                        SkipReason::MissingOrInvalidDueDate => "invalid_due_date",
                    };
                    warn!(
                        "event=reminder_scan module=reminder status=skipped item_id={} reason={detail}",
                        record.id
                    );
                    report.skipped += 1;
                }
                Classification::Due { item, buckets } => {
                    report.scheduled_items += 1;
                    classified.push((item, buckets));
                }
            }
        }

        let groups = aggregate_reminders(classified);
        report.recipients = groups.len();
        info!(
            "event=reminder_run module=reminder status=classified scheduled={} skipped={} recipients={}",
            report.scheduled_items, report.skipped, report.recipients
        );

        for group in groups.values() {
            let email = compose_reminder(group);
            let outbound = OutboundEmail {
                to: group.email.clone(),
                subject: email.subject,
                body: email.body,
            };
            match self.mail.send(&outbound) {
                Ok(()) => {
                    info!(
                        "event=mail_send module=reminder status=ok to={}",
                        group.email
                    );
                    report.emails_sent += 1;
                }
                Err(err) => {
                    error!(
                        "event=mail_send module=reminder status=error to={} error={err}",
                        group.email
                    );
                    report.delivery_failures += 1;
                }
            }
        }

        info!(
            "event=reminder_run module=reminder status=done sent={} failures={}",
            report.emails_sent, report.delivery_failures
        );
        Ok(report)
    }
}
