//! Hour-bank operations: balance lookup, close (snapshot + reset) and the
//! drift-correcting full recompute.

use crate::auth::AuthContext;
use crate::core::aggregator::classify_day;
use crate::core::schedule::ScheduleResolver;
use crate::db;
use crate::errors::AppResult;
use crate::models::hour_bank::HourBank;
use crate::utils;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

/// Current bank for a worker; a worker that never moved hours gets a
/// zeroed bank rather than an error.
pub fn balance(conn: &Connection, worker_id: i64) -> AppResult<HourBank> {
    let worker = db::workers::get_worker(conn, worker_id)?;
    match db::ledger::get_bank(conn, worker.id) {
        Ok(bank) => Ok(bank),
        Err(crate::errors::AppError::NotFound(_)) => Ok(HourBank {
            worker_id: worker.id,
            balance_minutes: 0,
            updated_at: Utc::now().to_rfc3339(),
            start_date: None,
        }),
        Err(e) => Err(e),
    }
}

/// Close the bank: return the balance as of now, reset it to zero and
/// stamp the ledger-start marker so recomputes never reach further back.
pub fn close_ledger(conn: &mut Connection, ctx: &AuthContext, worker_id: i64) -> AppResult<i64> {
    ctx.require_approver()?;

    let worker = db::workers::get_worker(conn, worker_id)?;
    let today = utils::date::today();

    let tx = conn.transaction()?;
    let previous = db::ledger::balance_or_zero(&tx, worker.id)?;
    db::ledger::reset_bank(&tx, worker.id, today, &Utc::now().to_rfc3339())?;

    let message = format!(
        "Bank closed for {}: settled {} and restarted at {}",
        worker.name,
        utils::mins2readable(previous, true, false),
        today
    );
    let _ = db::audit::ttlog(&tx, "close_ledger", &worker.name, &message);
    tx.commit()?;

    Ok(previous)
}

/// Signed contribution of one day during a recompute, in minutes.
///
/// Days fully forgiven by an approved justification contribute zero, and
/// "today" only counts once it has at least two clock-outs (an open day
/// is skipped until it looks closed).
fn recompute_day_minutes(
    conn: &Connection,
    resolver: &dyn ScheduleResolver,
    worker_id: i64,
    date: NaiveDate,
    today: NaiveDate,
) -> AppResult<i64> {
    if date == today && db::events::count_countable_outs(conn, worker_id, date)? < 2 {
        return Ok(0);
    }
    if db::justifications::has_forgiving_approval(conn, worker_id, date)? {
        return Ok(0);
    }

    let events = db::events::load_countable_events(conn, worker_id, date)?;
    let expectation = resolver.resolve(conn, worker_id, date)?;
    let totals = classify_day(&events, expectation.as_ref(), date, today);

    Ok(totals.extra_minutes - totals.deficit_minutes)
}

/// Full drift-correcting rebuild of a worker's bank.
///
/// Walks every month between `max(ledger-start, worker creation)` and
/// today, re-derives each day from raw events with the aggregation rules,
/// and overwrites the balance with the fresh sum in one final write —
/// a retry after partial failure always lands on the same value.
pub fn recompute_ledger(
    conn: &Connection,
    resolver: &dyn ScheduleResolver,
    worker_id: i64,
) -> AppResult<i64> {
    let worker = db::workers::get_worker(conn, worker_id)?;
    let today = utils::date::today();

    // The marker day itself was settled by the close, so the walk starts
    // strictly after it; without a marker it starts at the creation date.
    let start = match db::ledger::get_bank(conn, worker.id) {
        Ok(bank) => match bank.start_date {
            Some(marker) => marker.succ_opt().unwrap_or(marker).max(worker.created_at),
            None => worker.created_at,
        },
        Err(crate::errors::AppError::NotFound(_)) => worker.created_at,
        Err(e) => return Err(e),
    };

    let mut total = 0i64;
    for (year, month) in utils::date::months_between(start, today) {
        for date in utils::date::all_days_of_month(year, month) {
            if date < start || date > today {
                continue;
            }
            total += recompute_day_minutes(conn, resolver, worker.id, date, today)?;
        }
    }

    db::ledger::overwrite_balance(conn, worker.id, total, &Utc::now().to_rfc3339())?;

    let message = format!(
        "Bank recomputed for {} since {}: {}",
        worker.name,
        start,
        utils::mins2readable(total, true, false)
    );
    let _ = db::audit::ttlog(conn, "recompute_ledger", &worker.name, &message);

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthContext;
    use crate::core::schedule::FixedResolver;
    use crate::models::event::ClockEvent;
    use crate::models::event_status::EventStatus;
    use crate::models::justification::{Justification, JustificationKind, JustificationStatus};
    use crate::models::punch_kind::PunchKind;
    use crate::models::schedule::DayExpectation;
    use chrono::{Duration, NaiveTime};

    fn setup(created_at: NaiveDate) -> (Connection, i64) {
        let conn = Connection::open_in_memory().expect("open");
        db::migrate::run_pending_migrations(&conn).expect("migrate");
        let id = db::workers::insert_worker(&conn, "mara", false, created_at).expect("worker");
        (conn, id)
    }

    fn resolver_8h() -> FixedResolver {
        FixedResolver(Some(DayExpectation {
            expected_minutes: 480,
            entry: NaiveTime::from_hms_opt(9, 0, 0),
            exit: NaiveTime::from_hms_opt(17, 0, 0),
            min_break_minutes: 60,
        }))
    }

    fn punch(conn: &Connection, worker_id: i64, date: NaiveDate, h: u32, m: u32, kind: PunchKind) {
        let ev = ClockEvent::new(
            worker_id,
            date,
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            kind,
            EventStatus::Normal,
            "",
            "self",
        );
        db::events::insert_event(conn, &ev).expect("insert event");
    }

    #[test]
    fn today_is_excluded_until_two_clock_outs() {
        let today = utils::date::today();
        let (conn, id) = setup(today);
        let resolver = resolver_8h();

        assert_eq!(recompute_ledger(&conn, &resolver, id).unwrap(), 0);

        punch(&conn, id, today, 9, 0, PunchKind::In);
        punch(&conn, id, today, 10, 0, PunchKind::Out);
        // one clock-out: day still looks open
        assert_eq!(recompute_ledger(&conn, &resolver, id).unwrap(), 0);

        punch(&conn, id, today, 10, 30, PunchKind::In);
        punch(&conn, id, today, 11, 0, PunchKind::Out);
        // two clock-outs: 90 worked vs 480 expected
        assert_eq!(recompute_ledger(&conn, &resolver, id).unwrap(), -390);
    }

    #[test]
    fn forgiven_days_contribute_zero_but_unjustified_absences_stand() {
        let today = utils::date::today();
        let start = today - Duration::days(3);
        let (conn, id) = setup(start);
        let resolver = resolver_8h();

        // day 1 fully worked, days 2 and 3 are absences
        punch(&conn, id, start, 9, 0, PunchKind::In);
        punch(&conn, id, start, 17, 0, PunchKind::Out);
        assert_eq!(recompute_ledger(&conn, &resolver, id).unwrap(), -960);

        let approved = |kind: JustificationKind, date: NaiveDate| Justification {
            id: 0,
            worker_id: id,
            date,
            kind,
            status: JustificationStatus::Approved,
            description: String::new(),
            attachment: None,
            reviewed_by: None,
            reviewed_at: Some(Utc::now().to_rfc3339()),
            created_at: Utc::now().to_rfc3339(),
        };

        // medical visit forgives day 2 entirely
        db::justifications::insert_justification(
            &conn,
            &approved(JustificationKind::MedicalVisit, start + Duration::days(1)),
        )
        .unwrap();
        assert_eq!(recompute_ledger(&conn, &resolver, id).unwrap(), -480);

        // an unjustified absence on day 3 is silenced, never forgiven
        db::justifications::insert_justification(
            &conn,
            &approved(JustificationKind::UnjustifiedAbsence, start + Duration::days(2)),
        )
        .unwrap();
        assert_eq!(recompute_ledger(&conn, &resolver, id).unwrap(), -480);
    }

    #[test]
    fn close_then_recompute_lands_on_zero() {
        let today = utils::date::today();
        let (mut conn, id) = setup(today);
        let resolver = resolver_8h();

        db::ledger::apply_delta(&conn, id, 120, &Utc::now().to_rfc3339()).unwrap();

        let ctx = AuthContext {
            worker_id: id,
            approver: true,
        };
        assert_eq!(close_ledger(&mut conn, &ctx, id).unwrap(), 120);
        assert_eq!(balance(&conn, id).unwrap().balance_minutes, 0);
        assert_eq!(recompute_ledger(&conn, &resolver, id).unwrap(), 0);
    }

    #[test]
    fn close_requires_the_approval_capability() {
        let today = utils::date::today();
        let (mut conn, id) = setup(today);

        let ctx = AuthContext {
            worker_id: id,
            approver: false,
        };
        let err = close_ledger(&mut conn, &ctx, id).unwrap_err();
        assert_eq!(err.kind(), "authorization");
    }
}
