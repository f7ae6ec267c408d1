//! Reminder scheduling engine.
//!
//! # Responsibility
//! - Classify checked-out rows into temporal buckets.
//! - Aggregate classified items per recipient.
//! - Compose the deterministic per-recipient notification text.
//!
//! # Invariants
//! - Everything here is pure; store and mail side effects live in the
//!   service layer.

pub mod aggregate;
pub mod classify;
pub mod compose;
