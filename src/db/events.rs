//! Clock event persistence: append-mostly inserts, status transitions,
//! time corrections driven by justifications.

use crate::errors::{AppError, AppResult};
use crate::models::event::ClockEvent;
use crate::models::event_status::EventStatus;
use crate::models::punch_kind::PunchKind;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

const EVENT_COLS: &str = "id, worker_id, date, time, kind, status, note, attachment, \
     justification_id, approved_by, approved_at, source, created_at";

pub fn map_row(row: &Row) -> rusqlite::Result<ClockEvent> {
    let date_str: String = row.get("date")?;
    let time_str: String = row.get("time")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let time = NaiveTime::parse_from_str(&time_str, "%H:%M").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTime(time_str.clone())),
        )
    })?;

    let kind_str: String = row.get("kind")?;
    let kind = PunchKind::from_db_str(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidPunchKind(kind_str.clone())),
        )
    })?;

    let status_str: String = row.get("status")?;
    let status = EventStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("invalid event status: {}", status_str))),
        )
    })?;

    Ok(ClockEvent {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        date,
        time,
        kind,
        status,
        note: row.get("note")?,
        attachment: row.get("attachment")?,
        justification_id: row.get("justification_id")?,
        approved_by: row.get("approved_by")?,
        approved_at: row.get("approved_at")?,
        source: row.get("source")?,
        created_at: row.get("created_at")?,
    })
}

/// Insert an event and return its id.
pub fn insert_event(conn: &Connection, ev: &ClockEvent) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO events (worker_id, date, time, kind, status, note, attachment, \
         justification_id, approved_by, approved_at, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            ev.worker_id,
            ev.date_str(),
            ev.time_str(),
            ev.kind.to_db_str(),
            ev.status.to_db_str(),
            ev.note,
            ev.attachment,
            ev.justification_id,
            ev.approved_by,
            ev.approved_at,
            ev.source,
            ev.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_event(conn: &Connection, id: i64) -> AppResult<ClockEvent> {
    let sql = format!("SELECT {} FROM events WHERE id = ?1", EVENT_COLS);
    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.query_row([id], map_row)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("event {}", id)))
}

/// All events of a worker's day, every status, ordered by time.
pub fn load_events_by_date(
    conn: &Connection,
    worker_id: i64,
    date: NaiveDate,
) -> AppResult<Vec<ClockEvent>> {
    let sql = format!(
        "SELECT {} FROM events WHERE worker_id = ?1 AND date = ?2 ORDER BY time ASC, id ASC",
        EVENT_COLS
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![worker_id, date.format("%Y-%m-%d").to_string()], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Events that feed aggregation: status normal or approved, ordered by time.
pub fn load_countable_events(
    conn: &Connection,
    worker_id: i64,
    date: NaiveDate,
) -> AppResult<Vec<ClockEvent>> {
    let sql = format!(
        "SELECT {} FROM events \
         WHERE worker_id = ?1 AND date = ?2 AND status IN ('normal','approved') \
         ORDER BY time ASC, id ASC",
        EVENT_COLS
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![worker_id, date.format("%Y-%m-%d").to_string()], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// The last non-rejected event of a worker's day, if any.
/// Drives the in/out alternation of self-punches.
pub fn last_active_event(
    conn: &Connection,
    worker_id: i64,
    date: NaiveDate,
) -> AppResult<Option<ClockEvent>> {
    let sql = format!(
        "SELECT {} FROM events \
         WHERE worker_id = ?1 AND date = ?2 AND status != 'rejected' \
         ORDER BY time DESC, id DESC LIMIT 1",
        EVENT_COLS
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let ev = stmt
        .query_row(params![worker_id, date.format("%Y-%m-%d").to_string()], map_row)
        .optional()?;
    Ok(ev)
}

/// Number of countable clock-out events on a date. The recompute uses this
/// to decide whether "today" already looks like a closed day.
pub fn count_countable_outs(conn: &Connection, worker_id: i64, date: NaiveDate) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "SELECT COUNT(*) FROM events \
         WHERE worker_id = ?1 AND date = ?2 AND kind = 'out' AND status IN ('normal','approved')",
    )?;
    let n: i64 =
        stmt.query_row(params![worker_id, date.format("%Y-%m-%d").to_string()], |r| r.get(0))?;
    Ok(n)
}

/// Resolve a pending event: stamp the approver and the outcome status.
pub fn mark_event_reviewed(
    conn: &Connection,
    id: i64,
    status: EventStatus,
    approver_id: i64,
    reviewed_at: &str,
) -> AppResult<()> {
    conn.execute(
        "UPDATE events SET status = ?1, approved_by = ?2, approved_at = ?3 WHERE id = ?4",
        params![status.to_db_str(), approver_id, reviewed_at, id],
    )?;
    Ok(())
}

/// Rewrite the time of an event corrected by a justification, tagging it
/// with the justification id.
pub fn correct_event_time(
    conn: &Connection,
    id: i64,
    new_time: NaiveTime,
    justification_id: i64,
) -> AppResult<()> {
    conn.execute(
        "UPDATE events SET time = ?1, justification_id = ?2 WHERE id = ?3",
        params![new_time.format("%H:%M").to_string(), justification_id, id],
    )?;
    Ok(())
}
