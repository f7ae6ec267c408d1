//! Row-store boundary abstractions and the SQLite-backed implementation.
//!
//! # Responsibility
//! - Define the external inventory-store contract the core consumes.
//! - Keep loose cell typing and SQL details inside this boundary.
//!
//! # Invariants
//! - Snapshots are ordered; row 0 is the header and is never writable.
//! - Cell values cross the boundary as tagged `CellValue`s, never as
//!   ad-hoc strings.

pub mod inventory_store;

pub use inventory_store::{CellValue, InventoryStore, SqliteInventoryStore, StoreError, StoreResult};
