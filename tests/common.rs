#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn tb() -> Command {
    cargo_bin_cmd!("timebank")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timebank.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize the schema in a fresh test DB
pub fn init_db(db_path: &str) {
    tb().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Register a worker, optionally with the approval capability
pub fn add_worker(db_path: &str, name: &str, approver: bool) {
    let mut args = vec!["--db", db_path, "--test", "worker-add", name];
    if approver {
        args.push("--approver");
    }
    tb().args(&args).assert().success();
}

/// Register a worker backdated to `since` (YYYY-MM-DD)
pub fn add_worker_since(db_path: &str, name: &str, since: &str) {
    tb().args([
        "--db", db_path, "--test", "worker-add", name, "--since", since,
    ])
    .assert()
    .success();
}

/// Give a worker the same expectation on all seven weekdays:
/// 8h expected, entry 09:00, exit 17:00.
pub fn schedule_all_days(db_path: &str, worker: &str) {
    for day in ["mon", "tue", "wed", "thu", "fri", "sat", "sun"] {
        tb().args([
            "--db", db_path, "--test", "schedule", worker, "--day", day, "--hours", "8",
            "--entry", "09:00", "--exit", "17:00", "--break", "60",
        ])
        .assert()
        .success();
    }
}

/// Record an approved manual punch (acting as an approver)
pub fn manual_punch(db_path: &str, worker: &str, date: &str, time: &str, kind: &str, acting: &str) {
    tb().args([
        "--db", db_path, "--test", "manual", worker, date, time, kind, "--note",
        "backfilled punch", "--as", acting,
    ])
    .assert()
    .success();
}

/// Record a full worked span on one date through approved manual punches
pub fn worked_day(db_path: &str, worker: &str, date: &str, start: &str, end: &str, acting: &str) {
    manual_punch(db_path, worker, date, start, "in", acting);
    manual_punch(db_path, worker, date, end, "out", acting);
}

/// Read (worked, extras, deficit, status) from the persisted day record
pub fn day_record(db_path: &str, worker_id: i64, date: &str) -> (f64, f64, f64, String) {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    conn.query_row(
        "SELECT worked_hours, extra_hours, deficit_hours, status \
         FROM day_records WHERE worker_id = ?1 AND date = ?2",
        rusqlite::params![worker_id, date],
        |r| {
            Ok((
                r.get::<_, f64>(0)?,
                r.get::<_, f64>(1)?,
                r.get::<_, f64>(2)?,
                r.get::<_, String>(3)?,
            ))
        },
    )
    .expect("day record")
}

/// Read the hour-bank balance in minutes (0 when the row does not exist)
pub fn bank_minutes(db_path: &str, worker_id: i64) -> i64 {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    conn.query_row(
        "SELECT balance_minutes FROM hour_bank WHERE worker_id = ?1",
        [worker_id],
        |r| r.get(0),
    )
    .unwrap_or(0)
}
