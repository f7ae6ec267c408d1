//! Inventory item record and cell normalization.
//!
//! # Responsibility
//! - Project one loose sheet row into strict, typed item fields.
//! - Define the check-in/check-out status enum and its sheet spelling.
//!
//! # Invariants
//! - `id` is the trimmed display form of the ID cell; numeric cells render
//!   without a fractional suffix so `42` and `"42"` compare equal.
//! - `holder_email` keeps the raw cell text; blankness is judged on a
//!   trimmed view but the stored value is never normalized.
//! - `due_date` is calendar-day precision; any time-of-day is discarded.

use crate::config::SheetLayout;
use crate::store::CellValue;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Status cell text written for checked-in items.
pub const STATUS_CHECKED_IN: &str = "Checked In";
/// Status cell text written for checked-out items.
pub const STATUS_CHECKED_OUT: &str = "Checked Out";

/// Circulation state of one inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    CheckedIn,
    CheckedOut,
}

impl ItemStatus {
    /// Parses status cell text.
    ///
    /// Anything other than the exact checked-out marker normalizes to
    /// `CheckedIn`; the reminder scan only ever asks "is it checked out",
    /// so unknown status text behaves like a checked-in row.
    pub fn from_cell_text(text: &str) -> Self {
        if text == STATUS_CHECKED_OUT {
            Self::CheckedOut
        } else {
            Self::CheckedIn
        }
    }

    /// Returns the sheet spelling for this status.
    pub fn as_cell_text(&self) -> &'static str {
        match self {
            Self::CheckedIn => STATUS_CHECKED_IN,
            Self::CheckedOut => STATUS_CHECKED_OUT,
        }
    }
}

/// One inventory row normalized from the store snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Position in the snapshot; row 0 is the header.
    pub row_index: usize,
    /// Trimmed display form of the ID cell; may be empty.
    pub id: String,
    /// Item name.
    pub name: String,
    /// Circulation status.
    pub status: ItemStatus,
    /// Raw holder name cell text; may be blank.
    pub holder_name: String,
    /// Raw holder email cell text; never trimmed or case-folded.
    pub holder_email: String,
    /// Parsed due date, or `None` when the cell is blank or unparseable.
    pub due_date: Option<NaiveDate>,
}

impl ItemRecord {
    /// Builds a record from one snapshot row using the configured layout.
    ///
    /// Missing trailing cells read as blank, matching how short sheet rows
    /// surface from the store.
    pub fn from_cells(row_index: usize, cells: &[CellValue], layout: &SheetLayout) -> Self {
        let cell = |index: usize| cells.get(index).unwrap_or(&CellValue::Blank);

        Self {
            row_index,
            id: id_display_string(cell(layout.id_column)),
            name: cell(layout.name_column).display_string(),
            status: ItemStatus::from_cell_text(&cell(layout.status_column).display_string()),
            holder_name: cell(layout.holder_name_column).display_string(),
            holder_email: cell(layout.holder_email_column).display_string(),
            due_date: parse_due_date(cell(layout.due_date_column)),
        }
    }

    /// Returns whether the email cell is effectively blank.
    pub fn has_blank_email(&self) -> bool {
        self.holder_email.trim().is_empty()
    }
}

/// Normalizes an ID cell to its comparable string form.
///
/// Numeric cells drop a zero fractional part so an ID typed as a number in
/// the sheet still matches the same ID submitted as form text.
pub fn id_display_string(cell: &CellValue) -> String {
    match cell {
        CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        other => other.display_string().trim().to_string(),
    }
}

/// Parses a due-date cell to calendar-day precision.
///
/// Date cells are truncated to their day. Text cells go through a small set
/// of accepted formats; anything else is treated as missing and left for
/// the caller's malformed-row handling.
pub fn parse_due_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(datetime) => Some(datetime.date()),
        CellValue::Text(text) => parse_due_date_text(text),
        CellValue::Number(_) | CellValue::Blank => None,
    }
}

fn parse_due_date_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::{id_display_string, parse_due_date, ItemStatus};
    use crate::store::CellValue;
    use chrono::NaiveDate;

    #[test]
    fn numeric_id_cell_renders_without_fraction() {
        assert_eq!(id_display_string(&CellValue::Number(42.0)), "42");
        assert_eq!(id_display_string(&CellValue::Text(" 42 ".into())), "42");
    }

    #[test]
    fn due_date_text_truncates_time_of_day() {
        let parsed = parse_due_date(&CellValue::Text("2025-03-11T15:30:00".into()));
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2025, 3, 11));
    }

    #[test]
    fn unknown_status_text_reads_as_checked_in() {
        assert_eq!(ItemStatus::from_cell_text("Lost"), ItemStatus::CheckedIn);
        assert_eq!(
            ItemStatus::from_cell_text("Checked Out"),
            ItemStatus::CheckedOut
        );
    }
}
