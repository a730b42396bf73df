//! Schedule profile resolution.
//!
//! The engine never reads the weekly template directly: everything goes
//! through the `ScheduleResolver` seam, so the template source can be
//! swapped without touching the aggregation rules. `None` means "no
//! schedule assigned", which disables divergence for that day entirely.

use crate::db;
use crate::errors::AppResult;
use crate::models::schedule::DayExpectation;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;

pub trait ScheduleResolver {
    fn resolve(
        &self,
        conn: &Connection,
        worker_id: i64,
        date: NaiveDate,
    ) -> AppResult<Option<DayExpectation>>;
}

/// Production resolver backed by the `worker_schedules` table.
pub struct DbScheduleResolver;

impl ScheduleResolver for DbScheduleResolver {
    fn resolve(
        &self,
        conn: &Connection,
        worker_id: i64,
        date: NaiveDate,
    ) -> AppResult<Option<DayExpectation>> {
        let week = db::schedules::load_week(conn, worker_id)?;
        Ok(week.get(date.weekday()))
    }
}

/// Fixed resolver used by tests: the same expectation every day.
pub struct FixedResolver(pub Option<DayExpectation>);

impl ScheduleResolver for FixedResolver {
    fn resolve(
        &self,
        _conn: &Connection,
        _worker_id: i64,
        _date: NaiveDate,
    ) -> AppResult<Option<DayExpectation>> {
        Ok(self.0)
    }
}
