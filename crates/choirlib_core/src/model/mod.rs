//! Strict domain model for inventory and reminder data.
//!
//! # Responsibility
//! - Define the normalized record types used by core business logic.
//! - Keep loose cell-value coercion confined to the store boundary.
//!
//! # Invariants
//! - Every record is addressed by its snapshot `row_index`; row 0 is the
//!   header and never carries an `ItemRecord`.
//! - Reminder aggregates are ephemeral per run and never persisted.

pub mod item;
pub mod reminder;
