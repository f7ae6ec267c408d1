//! Item-state reconciliation service.
//!
//! # Responsibility
//! - Resolve free-text item-ID lists from form submissions against the
//!   current snapshot and apply check-in/check-out transitions.
//! - Route raw submissions to the right handler by sheet name.
//!
//! # Invariants
//! - Matching is first-row-wins over an index built once per call; blank
//!   ID cells are never indexed and the header is never scanned.
//! - Duplicate requested tokens are each processed independently, so
//!   `matched + not_found.len()` always equals the token count.
//! - Not-found IDs are accumulated and reported, never fatal.

use crate::config::LibraryConfig;
use crate::model::item::{id_display_string, STATUS_CHECKED_IN, STATUS_CHECKED_OUT};
use crate::store::inventory_store::{CellValue, InventoryStore, StoreError};
use log::{info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw form-submission event: ordered values plus the originating sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub sheet_name: String,
    pub values: Vec<String>,
}

/// Check-out payload extracted from a submission or built by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutRequest {
    pub holder_name: String,
    pub holder_email: String,
    /// Written through as raw text; validated at the next reminder read.
    pub return_date: String,
    pub item_ids: String,
}

/// Accounting for one reconciliation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Token count after trim/split/filter.
    pub requested: usize,
    pub matched: usize,
    pub not_found: Vec<String>,
}

/// What a routed submission turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    CheckIn(ReconcileOutcome),
    CheckOut(ReconcileOutcome),
    /// Sheet name matched neither response sheet; logged, no action.
    UnknownSheet,
}

/// Reconciliation-layer error.
#[derive(Debug)]
pub enum ReconcileError {
    Store(StoreError),
    /// Submission is missing a configured value position.
    MissingField { field: &'static str, index: usize },
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::MissingField { field, index } => {
                write!(f, "submission has no `{field}` value at index {index}")
            }
        }
    }
}

impl Error for ReconcileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::MissingField { .. } => None,
        }
    }
}

impl From<StoreError> for ReconcileError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Splits a raw comma-separated ID list into match tokens.
pub fn split_requested_ids(raw: &str) -> Vec<String> {
    raw.trim()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Reconciliation service over an inventory store.
pub struct ReconcileService<S: InventoryStore> {
    store: S,
    config: LibraryConfig,
}

impl<S: InventoryStore> ReconcileService<S> {
    pub fn new(store: S, config: LibraryConfig) -> Self {
        Self { store, config }
    }

    /// Checks in every matched ID: status reset, holder fields cleared.
    ///
    /// Re-applying a check-in is idempotent.
    pub fn check_in(&self, raw_ids: &str) -> Result<ReconcileOutcome, ReconcileError> {
        let cleared = vec![
            CellValue::Text(STATUS_CHECKED_IN.to_string()),
            CellValue::Blank,
            CellValue::Blank,
            CellValue::Blank,
        ];
        self.apply_transition("check_in", raw_ids, &cleared)
    }

    /// Checks out every matched ID to the requested holder.
    pub fn check_out(&self, request: &CheckOutRequest) -> Result<ReconcileOutcome, ReconcileError> {
        let assigned = vec![
            CellValue::Text(STATUS_CHECKED_OUT.to_string()),
            CellValue::Text(request.holder_name.clone()),
            CellValue::Text(request.holder_email.clone()),
            CellValue::Text(request.return_date.clone()),
        ];
        self.apply_transition("check_out", &request.item_ids, &assigned)
    }

    /// Routes one form submission by originating sheet name.
    pub fn handle_submission(
        &self,
        submission: &FormSubmission,
    ) -> Result<SubmissionOutcome, ReconcileError> {
        let names = &self.config.sheet_names;

        if submission.sheet_name == names.checkin_responses {
            let raw_ids = field(
                &submission.values,
                self.config.checkin_form.item_ids,
                "item ids",
            )?;
            return Ok(SubmissionOutcome::CheckIn(self.check_in(raw_ids)?));
        }

        if submission.sheet_name == names.checkout_responses {
            let form = &self.config.checkout_form;
            let request = CheckOutRequest {
                holder_email: field(&submission.values, form.holder_email, "holder email")?
                    .to_string(),
                return_date: field(&submission.values, form.return_date, "return date")?
                    .to_string(),
                item_ids: field(&submission.values, form.item_ids, "item ids")?.to_string(),
                holder_name: field(&submission.values, form.holder_name, "holder name")?
                    .to_string(),
            };
            return Ok(SubmissionOutcome::CheckOut(self.check_out(&request)?));
        }

        warn!(
            "event=form_submission module=reconcile status=ignored sheet={}",
            submission.sheet_name
        );
        Ok(SubmissionOutcome::UnknownSheet)
    }

    /// Initializes blank status cells on data rows to `Checked In`.
    ///
    /// Covers rows appended to the sheet outside the form flow. Returns
    /// the number of rows touched.
    pub fn init_row_defaults(&self) -> Result<usize, ReconcileError> {
        let layout = &self.config.items_sheet;
        let rows = self.store.read_rows()?;
        let mut initialized = 0;

        for (row_index, cells) in rows.iter().enumerate().skip(1) {
            let blank_status = cells
                .get(layout.status_column)
                .map_or(true, CellValue::is_blank);
            if blank_status {
                self.store.write_row_fields(
                    row_index,
                    layout.status_column + 1,
                    &[CellValue::Text(STATUS_CHECKED_IN.to_string())],
                )?;
                initialized += 1;
            }
        }

        if initialized > 0 {
            info!(
                "event=init_defaults module=reconcile status=ok initialized={initialized}"
            );
        }
        Ok(initialized)
    }

    fn apply_transition(
        &self,
        operation: &str,
        raw_ids: &str,
        row_values: &[CellValue],
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let layout = &self.config.items_sheet;
        let tokens = split_requested_ids(raw_ids);
        info!(
            "event={operation} module=reconcile status=start requested={}",
            tokens.len()
        );

        let rows = self.store.read_rows()?;
        let index = first_match_index(&rows, layout.id_column);

        let mut matched = 0;
        let mut not_found = Vec::new();
        for token in &tokens {
            match index.get(token.as_str()) {
                Some(&row_index) => {
                    self.store
                        .write_row_fields(row_index, layout.update_start_column, row_values)?;
                    info!(
                        "event={operation} module=reconcile status=ok item_id={token} row={row_index}"
                    );
                    matched += 1;
                }
                None => {
                    warn!(
                        "event={operation} module=reconcile status=not_found item_id={token}"
                    );
                    not_found.push(token.clone());
                }
            }
        }

        info!(
            "event={operation} module=reconcile status=done matched={matched} not_found={}",
            not_found.len()
        );
        Ok(ReconcileOutcome {
            requested: tokens.len(),
            matched,
            not_found,
        })
    }
}

/// Builds the ID → first-matching-row index for one snapshot.
///
/// First match wins is a policy, not an accident of scan order: each
/// requested ID maps to at most one row even when IDs repeat further down.
fn first_match_index(rows: &[Vec<CellValue>], id_column: usize) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (row_index, cells) in rows.iter().enumerate().skip(1) {
        let id = id_display_string(cells.get(id_column).unwrap_or(&CellValue::Blank));
        if id.is_empty() {
            continue;
        }
        index.entry(id).or_insert(row_index);
    }
    index
}

fn field<'a>(
    values: &'a [String],
    index: usize,
    name: &'static str,
) -> Result<&'a str, ReconcileError> {
    values
        .get(index)
        .map(String::as_str)
        .ok_or(ReconcileError::MissingField { field: name, index })
}

#[cfg(test)]
mod tests {
    use super::split_requested_ids;

    #[test]
    fn splitting_trims_tokens_and_drops_empties() {
        assert_eq!(
            split_requested_ids("  10, 99 ,,  10 , "),
            vec!["10", "99", "10"]
        );
        assert!(split_requested_ids("   ").is_empty());
    }
}
