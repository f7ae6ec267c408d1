use choirlib_core::db::migrations::latest_version;
use choirlib_core::db::open_db_in_memory;
use choirlib_core::{CellValue, InventoryStore, SheetLayout, SqliteInventoryStore, StoreError};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection};

fn store(conn: &Connection) -> SqliteInventoryStore<'_> {
    SqliteInventoryStore::try_new(conn, SheetLayout::default()).unwrap()
}

fn insert_item(conn: &Connection, name: &str, status: &str, holder: &str, email: &str, due: &str, id: &str) {
    conn.execute(
        "INSERT INTO items (name, status, holder_name, holder_email, due_date, item_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![name, status, holder, email, due, id],
    )
    .unwrap();
}

#[test]
fn rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteInventoryStore::try_new(&conn, SheetLayout::default()) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        other => panic!("expected uninitialized connection error, got {other:?}"),
    }
}

#[test]
fn rejects_connection_without_items_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteInventoryStore::try_new(&conn, SheetLayout::default());
    assert!(matches!(result, Err(StoreError::MissingRequiredTable("items"))));
}

#[test]
fn rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE items (
            position INTEGER PRIMARY KEY,
            name TEXT,
            status TEXT,
            holder_name TEXT,
            due_date TEXT,
            item_id
        );
        CREATE TABLE store_meta (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL);",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteInventoryStore::try_new(&conn, SheetLayout::default());
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredColumn {
            table: "items",
            column: "holder_email"
        })
    ));
}

#[test]
fn snapshot_starts_with_header_row() {
    let conn = open_db_in_memory().unwrap();
    let rows = store(&conn).read_rows().unwrap();

    assert_eq!(rows.len(), 1);
    let layout = SheetLayout::default();
    assert_eq!(rows[0][layout.id_column], CellValue::Text("Item ID".into()));
    assert_eq!(rows[0][layout.status_column], CellValue::Text("Status".into()));
    assert_eq!(rows[0][0], CellValue::Blank);
}

#[test]
fn cells_surface_with_their_storage_class() {
    let conn = open_db_in_memory().unwrap();
    insert_item(&conn, "Messiah", "Checked Out", "Pat", "p@x.com", "2025-03-12", "");
    // Plain integers keep their numeric storage class, like sheet cells.
    conn.execute("UPDATE items SET item_id = 42 WHERE position = 1;", [])
        .unwrap();
    insert_item(&conn, "Requiem", "Checked In", "", "", "", "A-7");

    let layout = SheetLayout::default();
    let rows = store(&conn).read_rows().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[1][layout.id_column], CellValue::Number(42.0));
    assert_eq!(
        rows[1][layout.due_date_column],
        CellValue::Date(
            NaiveDate::from_ymd_opt(2025, 3, 12)
                .unwrap()
                .and_time(NaiveTime::MIN)
        )
    );
    assert_eq!(rows[2][layout.id_column], CellValue::Text("A-7".into()));
    assert_eq!(rows[2][layout.holder_email_column], CellValue::Blank);
    assert_eq!(rows[2][layout.due_date_column], CellValue::Blank);
}

#[test]
fn unparseable_due_date_stays_text() {
    let conn = open_db_in_memory().unwrap();
    insert_item(&conn, "Elijah", "Checked Out", "Pat", "p@x.com", "soon", "10");

    let layout = SheetLayout::default();
    let rows = store(&conn).read_rows().unwrap();
    assert_eq!(rows[1][layout.due_date_column], CellValue::Text("soon".into()));
}

#[test]
fn range_write_updates_mapped_fields() {
    let conn = open_db_in_memory().unwrap();
    insert_item(&conn, "Elijah", "Checked In", "", "", "", "10");
    let layout = SheetLayout::default();
    let sheet = store(&conn);

    sheet
        .write_row_fields(
            1,
            layout.update_start_column,
            &[
                CellValue::Text("Checked Out".into()),
                CellValue::Text("Pat".into()),
                CellValue::Text("p@x.com".into()),
                CellValue::Text("2025-03-12".into()),
            ],
        )
        .unwrap();

    let rows = sheet.read_rows().unwrap();
    assert_eq!(rows[1][layout.status_column], CellValue::Text("Checked Out".into()));
    assert_eq!(rows[1][layout.holder_name_column], CellValue::Text("Pat".into()));
    assert_eq!(rows[1][layout.holder_email_column], CellValue::Text("p@x.com".into()));
    assert!(matches!(rows[1][layout.due_date_column], CellValue::Date(_)));
}

#[test]
fn blank_cells_clear_stored_fields() {
    let conn = open_db_in_memory().unwrap();
    insert_item(&conn, "Elijah", "Checked Out", "Pat", "p@x.com", "2025-03-12", "10");
    let layout = SheetLayout::default();
    let sheet = store(&conn);

    sheet
        .write_row_fields(
            1,
            layout.update_start_column,
            &[
                CellValue::Text("Checked In".into()),
                CellValue::Blank,
                CellValue::Blank,
                CellValue::Blank,
            ],
        )
        .unwrap();

    let rows = sheet.read_rows().unwrap();
    assert_eq!(rows[1][layout.holder_name_column], CellValue::Blank);
    assert_eq!(rows[1][layout.holder_email_column], CellValue::Blank);
    assert_eq!(rows[1][layout.due_date_column], CellValue::Blank);
}

#[test]
fn header_row_is_immutable() {
    let conn = open_db_in_memory().unwrap();
    let result = store(&conn).write_row_fields(0, 3, &[CellValue::Blank]);
    assert!(matches!(result, Err(StoreError::HeaderRowImmutable)));
}

#[test]
fn writes_to_missing_rows_and_unmapped_columns_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    insert_item(&conn, "Elijah", "Checked In", "", "", "", "10");
    let sheet = store(&conn);

    let missing = sheet.write_row_fields(9, 3, &[CellValue::Text("Checked In".into())]);
    assert!(matches!(missing, Err(StoreError::RowNotFound(9))));

    // Column A carries no mapped item field.
    let unmapped = sheet.write_row_fields(1, 1, &[CellValue::Text("x".into())]);
    assert!(matches!(unmapped, Err(StoreError::UnmappedColumn(0))));
}

#[test]
fn resolves_configured_time_zone() {
    let conn = open_db_in_memory().unwrap();
    let sheet = store(&conn);

    assert_eq!(sheet.resolve_time_zone().unwrap(), chrono_tz::UTC);

    conn.execute(
        "UPDATE store_meta SET value = 'America/Los_Angeles' WHERE key = 'time_zone';",
        [],
    )
    .unwrap();
    assert_eq!(
        sheet.resolve_time_zone().unwrap(),
        chrono_tz::America::Los_Angeles
    );

    conn.execute(
        "UPDATE store_meta SET value = 'Mars/Olympus' WHERE key = 'time_zone';",
        [],
    )
    .unwrap();
    assert!(matches!(
        sheet.resolve_time_zone(),
        Err(StoreError::InvalidTimeZone(value)) if value == "Mars/Olympus"
    ));
}
