//! Weekly schedule template persistence: one row per (worker, weekday).

use crate::errors::AppResult;
use crate::models::schedule::{DayExpectation, WeekSchedule};
use chrono::{NaiveTime, Weekday};
use rusqlite::{Connection, params};

pub fn upsert_slot(
    conn: &Connection,
    worker_id: i64,
    weekday: Weekday,
    expectation: &DayExpectation,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO worker_schedules (worker_id, weekday, expected_minutes, entry_time, \
         exit_time, min_break_minutes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(worker_id, weekday) DO UPDATE SET
            expected_minutes = excluded.expected_minutes,
            entry_time = excluded.entry_time,
            exit_time = excluded.exit_time,
            min_break_minutes = excluded.min_break_minutes",
        params![
            worker_id,
            weekday.num_days_from_monday() as i64,
            expectation.expected_minutes,
            expectation.entry.map(|t| t.format("%H:%M").to_string()),
            expectation.exit.map(|t| t.format("%H:%M").to_string()),
            expectation.min_break_minutes,
        ],
    )?;
    Ok(())
}

pub fn clear_slot(conn: &Connection, worker_id: i64, weekday: Weekday) -> AppResult<()> {
    conn.execute(
        "DELETE FROM worker_schedules WHERE worker_id = ?1 AND weekday = ?2",
        params![worker_id, weekday.num_days_from_monday() as i64],
    )?;
    Ok(())
}

/// Load the full 7-slot template; unset weekdays stay None.
pub fn load_week(conn: &Connection, worker_id: i64) -> AppResult<WeekSchedule> {
    let mut stmt = conn.prepare_cached(
        "SELECT weekday, expected_minutes, entry_time, exit_time, min_break_minutes \
         FROM worker_schedules WHERE worker_id = ?1",
    )?;
    let rows = stmt.query_map([worker_id], |row| {
        let weekday_num: i64 = row.get(0)?;
        let entry: Option<String> = row.get(2)?;
        let exit: Option<String> = row.get(3)?;
        Ok((
            weekday_num,
            DayExpectation {
                expected_minutes: row.get(1)?,
                entry: entry.and_then(|s| NaiveTime::parse_from_str(&s, "%H:%M").ok()),
                exit: exit.and_then(|s| NaiveTime::parse_from_str(&s, "%H:%M").ok()),
                min_break_minutes: row.get(4)?,
            },
        ))
    })?;

    let mut week = WeekSchedule::default();
    for r in rows {
        let (weekday_num, expectation) = r?;
        if let Some(weekday) = weekday_from_monday_index(weekday_num) {
            week.set(weekday, expectation);
        }
    }
    Ok(week)
}

fn weekday_from_monday_index(n: i64) -> Option<Weekday> {
    match n {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}
