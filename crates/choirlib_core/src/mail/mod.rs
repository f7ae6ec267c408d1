//! Mail transport boundary.
//!
//! # Responsibility
//! - Define the fire-and-forget delivery contract the reminder run uses.
//! - Provide a log-only transport for local runs and a recording transport
//!   for tests.
//!
//! # Invariants
//! - One `send` per recipient per run; a failure affects only that
//!   recipient and is surfaced as a typed error, never a panic.
//! - No delivery retry lives behind this trait.

use log::info;
use std::cell::RefCell;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One composed message addressed to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery failure for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    Rejected { recipient: String, message: String },
}

impl Display for MailError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { recipient, message } => {
                write!(f, "delivery to `{recipient}` rejected: {message}")
            }
        }
    }
}

impl Error for MailError {}

/// Synchronous, per-recipient delivery contract.
pub trait MailTransport {
    fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}

impl<M: MailTransport + ?Sized> MailTransport for &M {
    fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        (**self).send(email)
    }
}

/// Transport that logs instead of delivering.
///
/// Default for CLI runs where no real mail backend is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnlyMailer;

impl MailTransport for LogOnlyMailer {
    fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        info!(
            "event=mail_send module=mail status=ok mode=log_only to={} subject={}",
            email.to, email.subject
        );
        Ok(())
    }
}

/// In-memory transport capturing every send for assertions.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: RefCell<Vec<OutboundEmail>>,
    rejected_recipients: RefCell<HashSet<String>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every future send to `recipient` fail.
    pub fn reject_recipient(&self, recipient: impl Into<String>) {
        self.rejected_recipients
            .borrow_mut()
            .insert(recipient.into());
    }

    /// Returns a copy of everything delivered so far.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.borrow().clone()
    }
}

impl MailTransport for RecordingMailer {
    fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        if self.rejected_recipients.borrow().contains(&email.to) {
            return Err(MailError::Rejected {
                recipient: email.to.clone(),
                message: "rejected by recording transport".to_string(),
            });
        }
        self.sent.borrow_mut().push(email.clone());
        Ok(())
    }
}
