//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store and mail calls into the two batch entry points:
//!   form-submission reconciliation and the daily reminder run.
//! - Keep transports decoupled from the pure scheduling algorithms.

pub mod reconcile;
pub mod reminder;
