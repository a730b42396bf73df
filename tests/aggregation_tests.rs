mod common;
use common::*;
use predicates::prelude::*;

// Tolerance boundary cases against an 8h expectation. The worked spans
// are recorded through approved manual punches, so aggregation runs
// immediately and lands in day_records + hour_bank.
#[test]
fn tolerance_boundaries_classify_days() {
    let db = setup_test_db("agg_tolerance");
    init_db(&db);
    add_worker(&db, "rui", false);
    add_worker(&db, "ana", true);
    schedule_all_days(&db, "rui");

    // 8h08: inside tolerance, normal
    worked_day(&db, "rui", "2025-06-02", "09:00", "17:08", "ana");
    let (_, extras, deficit, status) = day_record(&db, 1, "2025-06-02");
    assert_eq!(extras, 0.0);
    assert_eq!(deficit, 0.0);
    assert_eq!(status, "normal");

    // 8h15: 0.25h extras, divergent
    worked_day(&db, "rui", "2025-06-03", "09:00", "17:15", "ana");
    let (_, extras, deficit, status) = day_record(&db, 1, "2025-06-03");
    assert_eq!(extras, 0.25);
    assert_eq!(deficit, 0.0);
    assert_eq!(status, "divergent");

    // 7h52: 8 minutes short, inside tolerance, normal
    worked_day(&db, "rui", "2025-06-04", "09:00", "16:52", "ana");
    let (_, extras, deficit, status) = day_record(&db, 1, "2025-06-04");
    assert_eq!(extras, 0.0);
    assert_eq!(deficit, 0.0);
    assert_eq!(status, "normal");

    // 7h30: 0.5h deficit, divergent
    worked_day(&db, "rui", "2025-06-05", "09:00", "16:30", "ana");
    let (_, extras, deficit, status) = day_record(&db, 1, "2025-06-05");
    assert_eq!(extras, 0.0);
    assert_eq!(deficit, 0.5);
    assert_eq!(status, "divergent");

    // the bank carries the signed sum: +15 - 30 = -15
    assert_eq!(bank_minutes(&db, 1), -15);
}

#[test]
fn split_shifts_sum_matched_pairs() {
    let db = setup_test_db("agg_split_shift");
    init_db(&db);
    add_worker(&db, "rui", false);
    add_worker(&db, "ana", true);
    schedule_all_days(&db, "rui");

    // two spans: 09:00-12:00 and 13:00-18:00 → 8h
    manual_punch(&db, "rui", "2025-06-10", "09:00", "in", "ana");
    manual_punch(&db, "rui", "2025-06-10", "12:00", "out", "ana");
    manual_punch(&db, "rui", "2025-06-10", "13:00", "in", "ana");
    manual_punch(&db, "rui", "2025-06-10", "18:00", "out", "ana");

    let (worked, extras, deficit, status) = day_record(&db, 1, "2025-06-10");
    assert_eq!(worked, 8.0);
    assert_eq!(extras, 0.0);
    assert_eq!(deficit, 0.0);
    assert_eq!(status, "normal");
    assert_eq!(bank_minutes(&db, 1), 0);
}

#[test]
fn monthly_report_includes_absences_and_unscheduled_days() {
    let db = setup_test_db("agg_report");
    init_db(&db);
    add_worker(&db, "rui", false);
    add_worker(&db, "ana", true);
    schedule_all_days(&db, "rui");

    worked_day(&db, "rui", "2025-06-10", "09:00", "16:30", "ana");

    let output = tb()
        .args(["--db", &db, "--test", "report", "rui", "2025-06", "--json"])
        .output()
        .expect("failed to run report");
    assert!(output.status.success());

    let days: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    let days = days.as_array().expect("array");
    assert_eq!(days.len(), 30);

    let by_date = |date: &str| {
        days.iter()
            .find(|d| d["date"] == date)
            .unwrap_or_else(|| panic!("missing {}", date))
    };

    // the persisted worked day
    let worked = by_date("2025-06-10");
    assert_eq!(worked["deficit_hours"], 0.5);
    assert_eq!(worked["status"], "Divergent");

    // an untouched scheduled day in the past reads as a full absence,
    // derived in memory without being persisted
    let absence = by_date("2025-06-11");
    assert_eq!(absence["worked_hours"], 0.0);
    assert_eq!(absence["deficit_hours"], 8.0);
    assert_eq!(absence["status"], "Divergent");

    let conn = rusqlite::Connection::open(&db).expect("open db");
    let persisted: i64 = conn
        .query_row("SELECT COUNT(*) FROM day_records", [], |r| r.get(0))
        .expect("count");
    assert_eq!(persisted, 1);
}

#[test]
fn worker_without_schedule_never_diverges() {
    let db = setup_test_db("agg_no_schedule");
    init_db(&db);
    add_worker(&db, "rui", false);
    add_worker(&db, "ana", true);

    // 12h worked with no schedule assigned: everything stays normal
    worked_day(&db, "rui", "2025-06-10", "08:00", "20:00", "ana");

    let (worked, extras, deficit, status) = day_record(&db, 1, "2025-06-10");
    assert_eq!(worked, 12.0);
    assert_eq!(extras, 0.0);
    assert_eq!(deficit, 0.0);
    assert_eq!(status, "normal");
    assert_eq!(bank_minutes(&db, 1), 0);
}

#[test]
fn reaggregating_an_unchanged_day_is_a_net_zero_delta() {
    let db = setup_test_db("agg_net_zero");
    init_db(&db);
    add_worker(&db, "rui", false);
    add_worker(&db, "ana", true);
    schedule_all_days(&db, "rui");

    // 10h worked: extras 2h
    worked_day(&db, "rui", "2025-06-10", "09:00", "19:00", "ana");
    assert_eq!(bank_minutes(&db, 1), 120);

    // an overtime dispute re-runs the aggregation on approval; the day is
    // unchanged, so the second pass must not move the bank
    tb().args([
        "--db", &db, "--test", "justify", "rui", "2025-06-10", "overtime",
    ])
    .assert()
    .success();
    tb().args(["--db", &db, "--test", "justify-approve", "1", "--as", "ana"])
        .assert()
        .success();

    assert_eq!(bank_minutes(&db, 1), 120);
    let (_, extras, _, status) = day_record(&db, 1, "2025-06-10");
    assert_eq!(extras, 2.0);
    assert_eq!(status, "normal");
}

#[test]
fn report_rejects_malformed_months() {
    let db = setup_test_db("agg_bad_month");
    init_db(&db);
    add_worker(&db, "rui", false);

    tb().args(["--db", &db, "--test", "report", "rui", "2025-6", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation"));

    tb().args(["--db", &db, "--test", "report", "rui", "2025-13", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation"));
}
