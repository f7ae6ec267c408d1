//! Sheet layout and form-field configuration.
//!
//! # Responsibility
//! - Map logical item fields to physical sheet column indices.
//! - Map form-submission value positions for check-in/check-out payloads.
//! - Name the logical sheets used for routing.
//!
//! # Invariants
//! - Read indices are 0-based positions into a row's cell array.
//! - `update_start_column` is 1-based, matching the store's range-write API.
//! - Defaults mirror the production spreadsheet layout.

use serde::{Deserialize, Serialize};

/// Column indices of the items sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Column B: item name.
    pub name_column: usize,
    /// Column C: status text (`Checked In` / `Checked Out`).
    pub status_column: usize,
    /// Column D: holder name.
    pub holder_name_column: usize,
    /// Column E: holder email.
    pub holder_email_column: usize,
    /// Column F: return date.
    pub due_date_column: usize,
    /// Column G: human-assigned item ID.
    pub id_column: usize,
    /// First column of the writable status range, 1-based.
    pub update_start_column: usize,
    /// Width of the writable status range (status, name, email, due date).
    pub update_column_count: usize,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            name_column: 1,
            status_column: 2,
            holder_name_column: 3,
            holder_email_column: 4,
            due_date_column: 5,
            id_column: 6,
            update_start_column: 3,
            update_column_count: 4,
        }
    }
}

impl SheetLayout {
    /// Returns the row width implied by the mapped columns.
    pub fn column_count(&self) -> usize {
        let max_index = [
            self.name_column,
            self.status_column,
            self.holder_name_column,
            self.holder_email_column,
            self.due_date_column,
            self.id_column,
        ]
        .into_iter()
        .max()
        .unwrap_or(0);
        max_index + 1
    }
}

/// Value positions in a check-out form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutFormLayout {
    pub holder_email: usize,
    pub return_date: usize,
    pub item_ids: usize,
    pub holder_name: usize,
}

impl Default for CheckoutFormLayout {
    fn default() -> Self {
        Self {
            holder_email: 1,
            return_date: 2,
            item_ids: 3,
            holder_name: 4,
        }
    }
}

/// Value positions in a check-in form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckinFormLayout {
    pub item_ids: usize,
}

impl Default for CheckinFormLayout {
    fn default() -> Self {
        Self { item_ids: 2 }
    }
}

/// Logical sheet names used to route form submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub items: String,
    pub checkin_responses: String,
    pub checkout_responses: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            items: "Items".to_string(),
            checkin_responses: "Check In Responses".to_string(),
            checkout_responses: "Check Out Responses".to_string(),
        }
    }
}

/// Aggregated configuration consumed by the services.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub items_sheet: SheetLayout,
    pub checkin_form: CheckinFormLayout,
    pub checkout_form: CheckoutFormLayout,
    pub sheet_names: SheetNames,
}
