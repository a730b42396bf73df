//! Read-only views: today's situation and the monthly report.
//!
//! The monthly report treats the persisted `day_records` table as the
//! source of truth; only days without a row (never aggregated) are derived
//! in memory, and nothing is written either way.

use crate::core::aggregator::classify_day;
use crate::core::schedule::ScheduleResolver;
use crate::db;
use crate::errors::AppResult;
use crate::models::day_record::{DayStatus, round_hours};
use crate::models::event::ClockEvent;
use crate::models::justification::Justification;
use crate::utils;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

/// Live snapshot of a worker's current day.
#[derive(Debug, Serialize)]
pub struct TodayView {
    pub date: NaiveDate,
    pub events: Vec<ClockEvent>,
    pub expected_hours: Option<f64>,
    pub status: DayStatus,
    pub extra_hours: f64,
    pub deficit_hours: f64,
    pub bank_minutes: i64,
}

/// One row of the monthly report.
#[derive(Debug, Serialize)]
pub struct ReportDay {
    pub date: NaiveDate,
    pub worked_hours: f64,
    pub extra_hours: f64,
    pub deficit_hours: f64,
    pub status: DayStatus,
    pub justifications: Vec<Justification>,
}

/// Compute the current-day situation live, without persisting anything.
pub fn today_view(
    conn: &Connection,
    resolver: &dyn ScheduleResolver,
    worker_id: i64,
) -> AppResult<TodayView> {
    let worker = db::workers::get_worker(conn, worker_id)?;
    let date = utils::date::today();

    let all_events = db::events::load_events_by_date(conn, worker.id, date)?;
    let countable: Vec<ClockEvent> = all_events
        .iter()
        .filter(|e| e.status.counts_for_aggregation())
        .cloned()
        .collect();

    let expectation = resolver.resolve(conn, worker.id, date)?;
    let totals = classify_day(&countable, expectation.as_ref(), date, date);
    let bank_minutes = db::ledger::balance_or_zero(conn, worker.id)?;

    Ok(TodayView {
        date,
        events: all_events,
        expected_hours: expectation.map(|e| round_hours(e.expected_hours())),
        status: totals.status,
        extra_hours: round_hours(totals.extra_minutes as f64 / 60.0),
        deficit_hours: round_hours(totals.deficit_minutes as f64 / 60.0),
        bank_minutes,
    })
}

/// Build the report for one month, oldest day first. Days after "today"
/// are omitted; days without a persisted record are derived in memory.
pub fn monthly_report(
    conn: &Connection,
    resolver: &dyn ScheduleResolver,
    worker_id: i64,
    year: i32,
    month: u32,
) -> AppResult<Vec<ReportDay>> {
    let worker = db::workers::get_worker(conn, worker_id)?;
    let today = utils::date::today();

    let days = utils::date::all_days_of_month(year, month);
    let (Some(first), Some(last)) = (days.first().copied(), days.last().copied()) else {
        return Ok(Vec::new());
    };

    let persisted = db::days::load_day_records(conn, worker.id, first, last)?;
    let mut by_date: HashMap<NaiveDate, _> = persisted.into_iter().map(|r| (r.date, r)).collect();

    let mut out = Vec::new();
    for date in days {
        if date > today {
            break;
        }

        let justifications = db::justifications::list_for_day(conn, worker.id, date)?;

        let row = if let Some(rec) = by_date.remove(&date) {
            ReportDay {
                date,
                worked_hours: rec.worked_hours,
                extra_hours: rec.extra_hours,
                deficit_hours: rec.deficit_hours,
                status: rec.status,
                justifications,
            }
        } else {
            let events = db::events::load_countable_events(conn, worker.id, date)?;
            let expectation = resolver.resolve(conn, worker.id, date)?;
            let totals = classify_day(&events, expectation.as_ref(), date, today);
            ReportDay {
                date,
                worked_hours: round_hours(totals.worked_minutes as f64 / 60.0),
                extra_hours: round_hours(totals.extra_minutes as f64 / 60.0),
                deficit_hours: round_hours(totals.deficit_minutes as f64 / 60.0),
                status: totals.status,
                justifications,
            }
        };
        out.push(row);
    }

    Ok(out)
}
