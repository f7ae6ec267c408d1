//! Core domain logic for the choir sheet-music library.
//!
//! Tracks which inventory items are checked out to whom, reconciles
//! free-text ID lists from form submissions against the row store, and
//! drives the daily consolidated reminder emails. This crate is the single
//! source of truth for circulation invariants; transports (row store, mail
//! delivery) stay behind traits.

pub mod config;
pub mod db;
pub mod logging;
pub mod mail;
pub mod model;
pub mod reminder;
pub mod service;
pub mod store;

pub use config::{CheckinFormLayout, CheckoutFormLayout, LibraryConfig, SheetLayout, SheetNames};
pub use logging::{default_log_level, init_logging, logging_status};
pub use mail::{LogOnlyMailer, MailError, MailTransport, OutboundEmail, RecordingMailer};
pub use model::item::{ItemRecord, ItemStatus, STATUS_CHECKED_IN, STATUS_CHECKED_OUT};
pub use model::reminder::{
    Bucket, BucketSet, CheckedOutItem, ReminderCalendar, ReminderGroup,
};
pub use reminder::aggregate::{aggregate_reminders, FALLBACK_HOLDER_NAME};
pub use reminder::classify::{classify_item, Classification, SkipReason};
pub use reminder::compose::{compose_reminder, ReminderEmail};
pub use service::reconcile::{
    split_requested_ids, CheckOutRequest, FormSubmission, ReconcileError, ReconcileOutcome,
    ReconcileService, SubmissionOutcome,
};
pub use service::reminder::{ReminderError, ReminderRunReport, ReminderService};
pub use store::inventory_store::{
    CellValue, InventoryStore, SqliteInventoryStore, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
