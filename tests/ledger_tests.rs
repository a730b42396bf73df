mod common;
use chrono::Duration;
use common::*;
use predicates::prelude::*;

#[test]
fn bank_close_is_gated_and_settles_the_balance() {
    let db = setup_test_db("ledger_close");
    init_db(&db);
    add_worker(&db, "rui", false);
    add_worker(&db, "ana", true);
    schedule_all_days(&db, "rui");

    // 10h worked: extras 2h
    worked_day(&db, "rui", "2025-06-10", "09:00", "19:00", "ana");
    assert_eq!(bank_minutes(&db, 1), 120);

    // --close needs an acting approver
    tb().args(["--db", &db, "--test", "bank", "rui", "--close"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation"));
    tb().args(["--db", &db, "--test", "bank", "rui", "--close", "--as", "rui"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("authorization"));

    tb().args(["--db", &db, "--test", "bank", "rui", "--close", "--as", "ana"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+02h 00m"));
    assert_eq!(bank_minutes(&db, 1), 0);
}

#[test]
fn close_then_recompute_returns_zero() {
    let db = setup_test_db("ledger_close_recompute");
    init_db(&db);
    add_worker(&db, "rui", false);
    add_worker(&db, "ana", true);
    schedule_all_days(&db, "rui");

    worked_day(&db, "rui", "2025-06-10", "09:00", "19:00", "ana");

    tb().args(["--db", &db, "--test", "bank", "rui", "--close", "--as", "ana"])
        .assert()
        .success();
    tb().args(["--db", &db, "--test", "bank", "rui", "--recompute"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00h 00m"));
    assert_eq!(bank_minutes(&db, 1), 0);
}

// The recompute is drift-correcting: whatever garbage ends up in the
// stored balance, rebuilding from raw events lands on the derived truth.
#[test]
fn recompute_rebuilds_the_balance_from_raw_events() {
    let db = setup_test_db("ledger_recompute");
    init_db(&db);

    let today = chrono::Local::now().date_naive();
    let start = today - Duration::days(3);
    let day1 = start.format("%Y-%m-%d").to_string();

    add_worker_since(&db, "rui", &day1);
    add_worker(&db, "ana", true);
    schedule_all_days(&db, "rui");

    // day 1 fully worked; days 2 and 3 untouched (full absences);
    // today has no clock-outs and is excluded
    worked_day(&db, "rui", &day1, "09:00", "17:00", "ana");
    assert_eq!(bank_minutes(&db, 1), 0);

    // tamper with the stored balance to simulate drift
    let conn = rusqlite::Connection::open(&db).expect("open db");
    conn.execute("UPDATE hour_bank SET balance_minutes = 999 WHERE worker_id = 1", [])
        .expect("tamper");
    drop(conn);

    tb().args(["--db", &db, "--test", "bank", "rui", "--recompute"])
        .assert()
        .success();

    // two absence days at 8h each
    assert_eq!(bank_minutes(&db, 1), -960);
}

#[test]
fn recompute_skips_days_forgiven_by_approved_justifications() {
    let db = setup_test_db("ledger_recompute_forgiven");
    init_db(&db);

    let today = chrono::Local::now().date_naive();
    let start = today - Duration::days(3);
    let day1 = start.format("%Y-%m-%d").to_string();
    let day2 = (start + Duration::days(1)).format("%Y-%m-%d").to_string();

    add_worker_since(&db, "rui", &day1);
    add_worker(&db, "ana", true);
    schedule_all_days(&db, "rui");

    worked_day(&db, "rui", &day1, "09:00", "17:00", "ana");

    // forgive the absence on day 2
    tb().args([
        "--db", &db, "--test", "justify", "rui", &day2, "medical-visit", "--description",
        "surgery",
    ])
    .assert()
    .success();
    tb().args(["--db", &db, "--test", "justify-approve", "1", "--as", "ana"])
        .assert()
        .success();

    tb().args(["--db", &db, "--test", "bank", "rui", "--recompute"])
        .assert()
        .success();

    // only the day-3 absence remains
    assert_eq!(bank_minutes(&db, 1), -480);
}

#[test]
fn bank_show_reports_balance_and_start_marker() {
    let db = setup_test_db("ledger_show");
    init_db(&db);
    add_worker(&db, "rui", false);
    add_worker(&db, "ana", true);
    schedule_all_days(&db, "rui");

    worked_day(&db, "rui", "2025-06-10", "09:00", "16:30", "ana");

    tb().args(["--db", &db, "--test", "bank", "rui"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-00h 30m"));

    tb().args(["--db", &db, "--test", "bank", "rui", "--close", "--as", "ana"])
        .assert()
        .success();
    tb().args(["--db", &db, "--test", "bank", "rui"])
        .assert()
        .success()
        .stdout(predicate::str::contains("started"));
}
