//! Inventory store contract and SQLite implementation.
//!
//! # Responsibility
//! - Expose the three primitives the core needs from the row store: full
//!   snapshot read, targeted range write, time-zone resolution.
//! - Mirror sheet semantics over SQLite for local runs and tests.
//!
//! # Invariants
//! - `read_rows` returns the header at index 0 followed by data rows in
//!   stable position order.
//! - Writes address snapshot row indices, not storage keys; the header is
//!   immutable through this API.
//! - ID cells keep their storage class (number stays `Number`, text stays
//!   `Text`), so callers must compare through the normalized display form.

use crate::config::SheetLayout;
use crate::db::DbError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

const META_TIME_ZONE_KEY: &str = "time_zone";
const REQUIRED_ITEM_COLUMNS: &[&str] = &[
    "position",
    "name",
    "status",
    "holder_name",
    "holder_email",
    "due_date",
    "item_id",
];

pub type StoreResult<T> = Result<T, StoreError>;

/// Loosely typed sheet cell, normalized into strict fields on read.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl CellValue {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Renders the cell the way it would display in the sheet.
    pub fn display_string(&self) -> String {
        match self {
            Self::Blank => String::new(),
            Self::Text(text) => text.clone(),
            Self::Number(value) => value.to_string(),
            Self::Date(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Store-boundary error for snapshot reads, range writes and metadata.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Connection has no applied schema; refuse to guess at table shape.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Row 0 of the snapshot is the header and cannot be written.
    HeaderRowImmutable,
    RowNotFound(usize),
    /// The write range covers a column with no mapped item field.
    UnmappedColumn(usize),
    InvalidTimeZone(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection has schema version {actual_version}, expected {expected_version}; \
                 run migrations before constructing a store"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::HeaderRowImmutable => write!(f, "header row 0 cannot be written"),
            Self::RowNotFound(row_index) => write!(f, "no data row at index {row_index}"),
            Self::UnmappedColumn(column) => {
                write!(f, "write range covers unmapped column {column}")
            }
            Self::InvalidTimeZone(value) => {
                write!(f, "store time zone `{value}` is not a valid IANA zone")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// External row-store contract consumed by the services.
///
/// The production deployment backs this with a hosted spreadsheet; the
/// SQLite implementation below serves local runs and tests. Either way the
/// core only ever sees ordered snapshots and targeted range writes.
pub trait InventoryStore {
    /// Reads the full ordered snapshot, header row included.
    fn read_rows(&self) -> StoreResult<Vec<Vec<CellValue>>>;

    /// Writes `values` into one data row starting at a 1-based column.
    fn write_row_fields(
        &self,
        row_index: usize,
        start_column: usize,
        values: &[CellValue],
    ) -> StoreResult<()>;

    /// Resolves the store-configured IANA time zone.
    fn resolve_time_zone(&self) -> StoreResult<Tz>;
}

/// SQLite-backed inventory store mirroring the items sheet.
#[derive(Debug)]
pub struct SqliteInventoryStore<'conn> {
    conn: &'conn Connection,
    layout: SheetLayout,
}

impl<'conn> SqliteInventoryStore<'conn> {
    /// Validates schema shape before handing out a store.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` does not
    ///   match the migrations compiled into this binary.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   was created outside the migration path.
    pub fn try_new(conn: &'conn Connection, layout: SheetLayout) -> StoreResult<Self> {
        let expected_version = crate::db::migrations::latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        for table in ["items", "store_meta"] {
            if !table_exists(conn, table)? {
                return Err(StoreError::MissingRequiredTable(table));
            }
        }
        for column in REQUIRED_ITEM_COLUMNS {
            if !table_has_column(conn, "items", column)? {
                return Err(StoreError::MissingRequiredColumn {
                    table: "items",
                    column,
                });
            }
        }

        Ok(Self { conn, layout })
    }

    fn header_row(&self) -> Vec<CellValue> {
        let mut row = vec![CellValue::Blank; self.layout.column_count()];
        let titles = [
            (self.layout.name_column, "Item Name"),
            (self.layout.status_column, "Status"),
            (self.layout.holder_name_column, "Holder Name"),
            (self.layout.holder_email_column, "Holder Email"),
            (self.layout.due_date_column, "Return Date"),
            (self.layout.id_column, "Item ID"),
        ];
        for (index, title) in titles {
            row[index] = CellValue::Text(title.to_string());
        }
        row
    }

    /// Maps an absolute 0-based sheet column to its item field.
    fn column_field(&self, column: usize) -> Option<&'static str> {
        let layout = &self.layout;
        if column == layout.name_column {
            Some("name")
        } else if column == layout.status_column {
            Some("status")
        } else if column == layout.holder_name_column {
            Some("holder_name")
        } else if column == layout.holder_email_column {
            Some("holder_email")
        } else if column == layout.due_date_column {
            Some("due_date")
        } else if column == layout.id_column {
            Some("item_id")
        } else {
            None
        }
    }
}

impl InventoryStore for SqliteInventoryStore<'_> {
    fn read_rows(&self) -> StoreResult<Vec<Vec<CellValue>>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, status, holder_name, holder_email, due_date, item_id
             FROM items
             ORDER BY position ASC;",
        )?;

        let width = self.layout.column_count();
        let mut rows = vec![self.header_row()];

        let mut result = stmt.query([])?;
        while let Some(row) = result.next()? {
            let mut cells = vec![CellValue::Blank; width];
            cells[self.layout.name_column] = text_cell(row.get("name")?);
            cells[self.layout.status_column] = text_cell(row.get("status")?);
            cells[self.layout.holder_name_column] = text_cell(row.get("holder_name")?);
            cells[self.layout.holder_email_column] = text_cell(row.get("holder_email")?);
            cells[self.layout.due_date_column] = due_date_cell(row.get("due_date")?);
            cells[self.layout.id_column] = loose_cell(row.get_ref("item_id")?);
            rows.push(cells);
        }

        Ok(rows)
    }

    fn write_row_fields(
        &self,
        row_index: usize,
        start_column: usize,
        values: &[CellValue],
    ) -> StoreResult<()> {
        if row_index == 0 {
            return Err(StoreError::HeaderRowImmutable);
        }

        let mut assignments = Vec::with_capacity(values.len());
        let mut bind_values: Vec<Value> = Vec::with_capacity(values.len() + 1);
        for (offset, value) in values.iter().enumerate() {
            // `start_column` is 1-based to match the sheet range API.
            let column = start_column - 1 + offset;
            let field = self
                .column_field(column)
                .ok_or(StoreError::UnmappedColumn(column))?;
            assignments.push(format!("{field} = ?{}", offset + 1));
            bind_values.push(cell_to_sql(value));
        }

        let sql = format!(
            "UPDATE items SET {} WHERE position =
                (SELECT position FROM items ORDER BY position ASC LIMIT 1 OFFSET ?{});",
            assignments.join(", "),
            values.len() + 1
        );
        bind_values.push(Value::Integer(row_index as i64 - 1));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(StoreError::RowNotFound(row_index));
        }

        Ok(())
    }

    fn resolve_time_zone(&self) -> StoreResult<Tz> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM store_meta WHERE key = ?1;",
                [META_TIME_ZONE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(value) => value
                .parse::<Tz>()
                .map_err(|_| StoreError::InvalidTimeZone(value)),
            None => Ok(chrono_tz::UTC),
        }
    }
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn text_cell(value: Option<String>) -> CellValue {
    match value {
        Some(text) if !text.is_empty() => CellValue::Text(text),
        _ => CellValue::Blank,
    }
}

/// Surfaces a due-date column as a date cell when it parses as one.
///
/// Unparseable text stays a text cell; the malformed-row handling upstream
/// decides what that means for a reminder run.
fn due_date_cell(value: Option<String>) -> CellValue {
    let Some(text) = value else {
        return CellValue::Blank;
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return CellValue::Blank;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date.and_time(NaiveTime::MIN));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return CellValue::Date(datetime);
        }
    }

    CellValue::Text(text)
}

fn loose_cell(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Blank,
        ValueRef::Integer(number) => CellValue::Number(number as f64),
        ValueRef::Real(number) => CellValue::Number(number),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) if !text.is_empty() => CellValue::Text(text.to_string()),
            _ => CellValue::Blank,
        },
        ValueRef::Blob(_) => CellValue::Blank,
    }
}

fn cell_to_sql(value: &CellValue) -> Value {
    match value {
        CellValue::Blank => Value::Null,
        CellValue::Text(text) => Value::Text(text.clone()),
        CellValue::Number(number) => Value::Real(*number),
        CellValue::Date(datetime) => Value::Text(datetime.format("%Y-%m-%d").to_string()),
    }
}
