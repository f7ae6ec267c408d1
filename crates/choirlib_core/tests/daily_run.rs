//! Full circulation cycle: check-out by form, remind, check-in, silence.

use choirlib_core::db::open_db_in_memory;
use choirlib_core::{
    FormSubmission, LibraryConfig, RecordingMailer, ReconcileService, ReminderService,
    SqliteInventoryStore, SubmissionOutcome,
};
use chrono::{TimeZone, Utc};
use rusqlite::Connection;

fn reconciler(conn: &Connection) -> ReconcileService<SqliteInventoryStore<'_>> {
    let config = LibraryConfig::default();
    let store = SqliteInventoryStore::try_new(conn, config.items_sheet.clone()).unwrap();
    ReconcileService::new(store, config)
}

#[test]
fn checkout_remind_checkin_cycle() {
    let conn = open_db_in_memory().unwrap();
    for id in ["10", "11"] {
        conn.execute(
            "INSERT INTO items (name, status, item_id) VALUES ('Anthem', 'Checked In', ?1);",
            [id],
        )
        .unwrap();
    }

    // A checkout form submission assigns both items to one holder.
    let outcome = reconciler(&conn)
        .handle_submission(&FormSubmission {
            sheet_name: "Check Out Responses".into(),
            values: vec![
                "2025-03-01 10:00:00".into(),
                "p@x.com".into(),
                "2025-03-12".into(),
                "10, 11".into(),
                "Pat".into(),
            ],
        })
        .unwrap();
    assert!(matches!(
        outcome,
        SubmissionOutcome::CheckOut(outcome) if outcome.matched == 2
    ));

    // The day before the due date both items land in one email.
    let config = LibraryConfig::default();
    let mailer = RecordingMailer::new();
    let store = SqliteInventoryStore::try_new(&conn, config.items_sheet.clone()).unwrap();
    let report = ReminderService::new(store, &mailer, config.clone())
        .run_daily_at(Utc.with_ymd_and_hms(2025, 3, 11, 12, 0, 0).unwrap())
        .unwrap();

    assert_eq!(report.recipients, 1);
    assert_eq!(report.emails_sent, 1);
    let sent = mailer.sent();
    assert!(sent[0].body.contains("  - Item #10"));
    assert!(sent[0].body.contains("  - Item #11"));

    // After check-in the next run has nothing to say.
    let checkin = reconciler(&conn).check_in("10, 11").unwrap();
    assert_eq!(checkin.matched, 2);

    let mailer = RecordingMailer::new();
    let store = SqliteInventoryStore::try_new(&conn, config.items_sheet.clone()).unwrap();
    let report = ReminderService::new(store, &mailer, config)
        .run_daily_at(Utc.with_ymd_and_hms(2025, 3, 11, 12, 0, 0).unwrap())
        .unwrap();

    assert_eq!(report.scheduled_items, 0);
    assert_eq!(report.emails_sent, 0);
    assert!(mailer.sent().is_empty());
}
