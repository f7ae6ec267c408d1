//! Operational CLI for the sheet-music library core.
//!
//! # Responsibility
//! - Run the two batch entry points (daily reminders, reconciliation)
//!   against a local SQLite store.
//! - Keep output deterministic for quick local sanity checks.

use choirlib_core::db::open_db;
use choirlib_core::{
    default_log_level, init_logging, CheckOutRequest, LibraryConfig, LogOnlyMailer,
    ReconcileOutcome, ReconcileService, ReminderService, SqliteInventoryStore,
};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "usage: choirlib <db-path> <command> [args]

commands:
  remind                                    run today's reminder batch
  check-in <ids>                            check in a comma-separated ID list
  check-out <email> <date> <ids> [name]     check out an ID list to a holder
  init-defaults                             set blank status cells to Checked In

set CHOIRLIB_LOG_DIR to an absolute path to enable file logging.";

fn main() -> ExitCode {
    if let Ok(log_dir) = env::var("CHOIRLIB_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("choirlib: {err}");
            return ExitCode::FAILURE;
        }
    }

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("choirlib: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let (db_path, command) = match args {
        [db_path, command, ..] => (db_path, command.as_str()),
        _ => return Err(USAGE.to_string()),
    };
    let rest = &args[2..];

    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let config = LibraryConfig::default();
    let store = SqliteInventoryStore::try_new(&conn, config.items_sheet.clone())
        .map_err(|err| err.to_string())?;

    match command {
        "remind" => {
            let service = ReminderService::new(store, LogOnlyMailer, config);
            let report = service.run_daily().map_err(|err| err.to_string())?;
            println!(
                "scanned={} skipped={} scheduled={} recipients={} sent={} failures={}",
                report.rows_scanned,
                report.skipped,
                report.scheduled_items,
                report.recipients,
                report.emails_sent,
                report.delivery_failures
            );
            Ok(())
        }
        "check-in" => {
            let [ids] = rest else {
                return Err("check-in expects exactly one <ids> argument".to_string());
            };
            let service = ReconcileService::new(store, config);
            let outcome = service.check_in(ids).map_err(|err| err.to_string())?;
            print_outcome(&outcome);
            Ok(())
        }
        "check-out" => {
            let (email, date, ids, name) = match rest {
                [email, date, ids] => (email, date, ids, ""),
                [email, date, ids, name] => (email, date, ids, name.as_str()),
                _ => return Err("check-out expects <email> <date> <ids> [name]".to_string()),
            };
            let service = ReconcileService::new(store, config);
            let outcome = service
                .check_out(&CheckOutRequest {
                    holder_name: name.to_string(),
                    holder_email: email.clone(),
                    return_date: date.clone(),
                    item_ids: ids.clone(),
                })
                .map_err(|err| err.to_string())?;
            print_outcome(&outcome);
            Ok(())
        }
        "init-defaults" => {
            let service = ReconcileService::new(store, config);
            let initialized = service.init_row_defaults().map_err(|err| err.to_string())?;
            println!("initialized={initialized}");
            Ok(())
        }
        other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
    }
}

fn print_outcome(outcome: &ReconcileOutcome) {
    println!(
        "requested={} matched={} not_found={}",
        outcome.requested,
        outcome.matched,
        if outcome.not_found.is_empty() {
            "-".to_string()
        } else {
            outcome.not_found.join(",")
        }
    );
}
