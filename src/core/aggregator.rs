//! Day aggregation: derives worked/extra/deficit totals from the day's
//! countable events and the expected schedule, classifies the day, and
//! keeps the hour bank in sync through snapshot-based deltas.

use crate::core::schedule::ScheduleResolver;
use crate::db;
use crate::errors::AppResult;
use crate::models::day_record::{DayRecord, DayStatus, round_hours};
use crate::models::event::ClockEvent;
use crate::models::schedule::DayExpectation;
use crate::utils;
use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::Connection;

/// Grace window: differences below this many minutes are not counted as
/// extras or deficit.
pub const TOLERANCE_MINUTES: i64 = 10;

/// Raw aggregation result for one day, in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTotals {
    pub worked_minutes: i64,
    pub extra_minutes: i64,
    pub deficit_minutes: i64,
    pub status: DayStatus,
}

impl DayTotals {
    pub fn is_divergent(&self) -> bool {
        self.status == DayStatus::Divergent
    }
}

/// Sum the matched in/out pairs of a chronologically sorted day.
///
/// An `in` opens an entrance, overwriting any unmatched previous one; an
/// `out` closes the open entrance if present. A trailing `in` or an orphan
/// `out` contributes zero.
fn worked_minutes(events: &[ClockEvent]) -> i64 {
    let mut total = 0i64;
    let mut open_in: Option<NaiveTime> = None;

    for ev in events {
        if ev.kind.is_in() {
            open_in = Some(ev.time);
        } else if let Some(start) = open_in.take() {
            total += utils::time::minutes_between(start, ev.time).max(0);
        }
    }

    total
}

/// Classify one day. Pure: `events` must already be the countable set
/// (status normal/approved) sorted by time, `today` anchors the absence
/// rule.
pub fn classify_day(
    events: &[ClockEvent],
    expectation: Option<&DayExpectation>,
    date: NaiveDate,
    today: NaiveDate,
) -> DayTotals {
    let worked = worked_minutes(events);

    let Some(exp) = expectation else {
        // No schedule assigned: divergence is disabled for this day.
        return DayTotals {
            worked_minutes: worked,
            extra_minutes: 0,
            deficit_minutes: 0,
            status: DayStatus::Normal,
        };
    };

    let expected = exp.expected_minutes;

    if events.is_empty() {
        // A day the worker never touched: an absence once it is in the
        // past (tolerance does not apply), nothing at all before that.
        let deficit = if date < today && expected > 0 { expected } else { 0 };
        return DayTotals {
            worked_minutes: 0,
            extra_minutes: 0,
            deficit_minutes: deficit,
            status: if deficit > 0 {
                DayStatus::Divergent
            } else {
                DayStatus::Normal
            },
        };
    }

    let mut extra = (worked - expected).max(0);
    let mut deficit = (expected - worked).max(0);

    if extra < TOLERANCE_MINUTES {
        extra = 0;
    }
    if deficit < TOLERANCE_MINUTES {
        deficit = 0;
    }

    let status = if extra > 0 || deficit > 0 {
        DayStatus::Divergent
    } else {
        DayStatus::Normal
    };

    DayTotals {
        worked_minutes: worked,
        extra_minutes: extra,
        deficit_minutes: deficit,
        status,
    }
}

/// Build the persisted record for a set of totals.
pub fn record_from_totals(
    worker_id: i64,
    date: NaiveDate,
    totals: &DayTotals,
    expectation: Option<&DayExpectation>,
) -> DayRecord {
    DayRecord {
        worker_id,
        date,
        worked_hours: round_hours(totals.worked_minutes as f64 / 60.0),
        extra_hours: round_hours(totals.extra_minutes as f64 / 60.0),
        deficit_hours: round_hours(totals.deficit_minutes as f64 / 60.0),
        status: totals.status,
        expected_in: expectation.and_then(|e| e.entry),
        expected_out: expectation.and_then(|e| e.exit),
        updated_at: Utc::now().to_rfc3339(),
    }
}

/// The ledger delta is a pure function of the two snapshots around an
/// upsert: `(new extras − new deficit) − (old extras − old deficit)`.
pub fn ledger_delta_minutes(previous: Option<&DayRecord>, current: &DayRecord) -> i64 {
    let old = previous.map(|p| p.signed_minutes()).unwrap_or(0);
    current.signed_minutes() - old
}

/// Outcome of a day refresh: both snapshots plus the applied delta.
#[derive(Debug)]
pub struct DayRefresh {
    pub previous: Option<DayRecord>,
    pub current: DayRecord,
    pub delta_minutes: i64,
}

/// Re-derive and upsert one day, applying the hour-bank delta.
///
/// Must run inside the caller's transaction: the previous-snapshot read,
/// the upsert and the delta application have to commit or fail together.
pub fn refresh_day_tx(
    conn: &Connection,
    resolver: &dyn ScheduleResolver,
    worker_id: i64,
    date: NaiveDate,
) -> AppResult<DayRefresh> {
    let events = db::events::load_countable_events(conn, worker_id, date)?;
    let expectation = resolver.resolve(conn, worker_id, date)?;
    let totals = classify_day(&events, expectation.as_ref(), date, utils::date::today());

    let previous = db::days::get_day_record(conn, worker_id, date)?;
    let current = record_from_totals(worker_id, date, &totals, expectation.as_ref());
    db::days::upsert_day_record(conn, &current)?;

    let delta_minutes = ledger_delta_minutes(previous.as_ref(), &current);
    if delta_minutes != 0 {
        db::ledger::apply_delta(conn, worker_id, delta_minutes, &current.updated_at)?;
    }

    Ok(DayRefresh {
        previous,
        current,
        delta_minutes,
    })
}

/// Overwrite one day with fixed values (full forgiveness paths), applying
/// the same snapshot-based delta. Runs inside the caller's transaction.
pub fn force_day_tx(
    conn: &Connection,
    resolver: &dyn ScheduleResolver,
    worker_id: i64,
    date: NaiveDate,
    totals: DayTotals,
) -> AppResult<DayRefresh> {
    let expectation = resolver.resolve(conn, worker_id, date)?;

    let previous = db::days::get_day_record(conn, worker_id, date)?;
    let current = record_from_totals(worker_id, date, &totals, expectation.as_ref());
    db::days::upsert_day_record(conn, &current)?;

    let delta_minutes = ledger_delta_minutes(previous.as_ref(), &current);
    if delta_minutes != 0 {
        db::ledger::apply_delta(conn, worker_id, delta_minutes, &current.updated_at)?;
    }

    Ok(DayRefresh {
        previous,
        current,
        delta_minutes,
    })
}

/// Convenience wrapper opening its own transaction.
pub fn refresh_day(
    conn: &mut Connection,
    resolver: &dyn ScheduleResolver,
    worker_id: i64,
    date: NaiveDate,
) -> AppResult<DayRefresh> {
    let tx = conn.transaction()?;
    let refresh = refresh_day_tx(&tx, resolver, worker_id, date)?;
    tx.commit()?;
    Ok(refresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event_status::EventStatus;
    use crate::models::punch_kind::PunchKind;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn ev(date: &str, time: &str, kind: PunchKind) -> ClockEvent {
        ClockEvent::new(
            1,
            d(date),
            t(time),
            kind,
            EventStatus::Normal,
            "",
            "self",
        )
    }

    fn expectation(minutes: i64) -> DayExpectation {
        DayExpectation {
            expected_minutes: minutes,
            entry: Some(t("09:00")),
            exit: Some(t("18:00")),
            min_break_minutes: 60,
        }
    }

    const TODAY: &str = "2025-06-20";

    fn classify(events: &[ClockEvent], expected_minutes: Option<i64>, date: &str) -> DayTotals {
        let exp = expected_minutes.map(expectation);
        classify_day(events, exp.as_ref(), d(date), d(TODAY))
    }

    #[test]
    fn matched_pairs_sum_and_trailing_in_counts_zero() {
        let events = vec![
            ev("2025-06-10", "09:00", PunchKind::In),
            ev("2025-06-10", "12:00", PunchKind::Out),
            ev("2025-06-10", "13:00", PunchKind::In),
            ev("2025-06-10", "18:00", PunchKind::Out),
            ev("2025-06-10", "19:00", PunchKind::In), // trailing, unmatched
        ];
        let totals = classify(&events, Some(480), "2025-06-10");
        assert_eq!(totals.worked_minutes, 480);
        assert_eq!(totals.extra_minutes, 0);
        assert_eq!(totals.deficit_minutes, 0);
        assert_eq!(totals.status, DayStatus::Normal);
    }

    #[test]
    fn orphan_out_contributes_zero() {
        let events = vec![
            ev("2025-06-10", "08:00", PunchKind::Out),
            ev("2025-06-10", "09:00", PunchKind::In),
            ev("2025-06-10", "17:00", PunchKind::Out),
        ];
        let totals = classify(&events, Some(480), "2025-06-10");
        assert_eq!(totals.worked_minutes, 480);
    }

    #[test]
    fn second_in_overwrites_open_entrance() {
        let events = vec![
            ev("2025-06-10", "08:00", PunchKind::In),
            ev("2025-06-10", "09:00", PunchKind::In),
            ev("2025-06-10", "10:00", PunchKind::Out),
        ];
        let totals = classify(&events, None, "2025-06-10");
        assert_eq!(totals.worked_minutes, 60);
    }

    #[test]
    fn tolerance_window_zeroes_small_differences() {
        // 8h08 worked vs 8h expected → inside tolerance, normal
        let events = vec![
            ev("2025-06-10", "09:00", PunchKind::In),
            ev("2025-06-10", "17:08", PunchKind::Out),
        ];
        let totals = classify(&events, Some(480), "2025-06-10");
        assert_eq!(totals.extra_minutes, 0);
        assert_eq!(totals.deficit_minutes, 0);
        assert_eq!(totals.status, DayStatus::Normal);

        // 8h15 → 15 extra minutes (0.25h), divergent
        let events = vec![
            ev("2025-06-10", "09:00", PunchKind::In),
            ev("2025-06-10", "17:15", PunchKind::Out),
        ];
        let totals = classify(&events, Some(480), "2025-06-10");
        assert_eq!(totals.extra_minutes, 15);
        assert_eq!(totals.status, DayStatus::Divergent);

        // 7h52 worked → 8 minutes short, inside tolerance
        let events = vec![
            ev("2025-06-10", "09:00", PunchKind::In),
            ev("2025-06-10", "16:52", PunchKind::Out),
        ];
        let totals = classify(&events, Some(480), "2025-06-10");
        assert_eq!(totals.deficit_minutes, 0);
        assert_eq!(totals.status, DayStatus::Normal);

        // 7h30 → 30 deficit minutes, divergent
        let events = vec![
            ev("2025-06-10", "09:00", PunchKind::In),
            ev("2025-06-10", "16:30", PunchKind::Out),
        ];
        let totals = classify(&events, Some(480), "2025-06-10");
        assert_eq!(totals.deficit_minutes, 30);
        assert_eq!(totals.status, DayStatus::Divergent);
    }

    #[test]
    fn past_empty_day_is_a_full_absence() {
        let totals = classify(&[], Some(480), "2025-06-10");
        assert_eq!(totals.deficit_minutes, 480);
        assert_eq!(totals.status, DayStatus::Divergent);
    }

    #[test]
    fn today_without_events_is_not_an_absence_yet() {
        let totals = classify(&[], Some(480), TODAY);
        assert_eq!(totals.deficit_minutes, 0);
        assert_eq!(totals.status, DayStatus::Normal);
    }

    #[test]
    fn no_schedule_disables_divergence() {
        let events = vec![
            ev("2025-06-10", "09:00", PunchKind::In),
            ev("2025-06-10", "21:00", PunchKind::Out),
        ];
        let totals = classify(&events, None, "2025-06-10");
        assert_eq!(totals.worked_minutes, 720);
        assert_eq!(totals.extra_minutes, 0);
        assert_eq!(totals.deficit_minutes, 0);
        assert_eq!(totals.status, DayStatus::Normal);
    }

    #[test]
    fn delta_is_difference_of_snapshots() {
        let totals_before = DayTotals {
            worked_minutes: 420,
            extra_minutes: 0,
            deficit_minutes: 60,
            status: DayStatus::Divergent,
        };
        let totals_after = DayTotals {
            worked_minutes: 480,
            extra_minutes: 0,
            deficit_minutes: 0,
            status: DayStatus::Normal,
        };
        let prev = record_from_totals(1, d("2025-06-10"), &totals_before, None);
        let cur = record_from_totals(1, d("2025-06-10"), &totals_after, None);

        assert_eq!(ledger_delta_minutes(Some(&prev), &cur), 60);
        assert_eq!(ledger_delta_minutes(None, &cur), 0);
        // re-deriving an unchanged day nets to zero
        assert_eq!(ledger_delta_minutes(Some(&cur.clone()), &cur), 0);
    }
}
