//! Day record persistence. Rows are always derived by the aggregator and
//! upserted; the caller reads the previous row first to compute deltas.

use crate::errors::{AppError, AppResult};
use crate::models::day_record::{DayRecord, DayStatus};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<DayRecord> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let status_str: String = row.get("status")?;
    let status = DayStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("invalid day status: {}", status_str))),
        )
    })?;

    let expected_in: Option<String> = row.get("expected_in")?;
    let expected_out: Option<String> = row.get("expected_out")?;

    Ok(DayRecord {
        worker_id: row.get("worker_id")?,
        date,
        worked_hours: row.get("worked_hours")?,
        extra_hours: row.get("extra_hours")?,
        deficit_hours: row.get("deficit_hours")?,
        status,
        expected_in: expected_in.and_then(|s| NaiveTime::parse_from_str(&s, "%H:%M").ok()),
        expected_out: expected_out.and_then(|s| NaiveTime::parse_from_str(&s, "%H:%M").ok()),
        updated_at: row.get("updated_at")?,
    })
}

pub fn get_day_record(
    conn: &Connection,
    worker_id: i64,
    date: NaiveDate,
) -> AppResult<Option<DayRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT worker_id, date, worked_hours, extra_hours, deficit_hours, status, \
         expected_in, expected_out, updated_at \
         FROM day_records WHERE worker_id = ?1 AND date = ?2",
    )?;
    let rec = stmt
        .query_row(params![worker_id, date.format("%Y-%m-%d").to_string()], map_row)
        .optional()?;
    Ok(rec)
}

/// All day records of a worker inside [from, to], ordered by date.
pub fn load_day_records(
    conn: &Connection,
    worker_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<DayRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT worker_id, date, worked_hours, extra_hours, deficit_hours, status, \
         expected_in, expected_out, updated_at \
         FROM day_records WHERE worker_id = ?1 AND date >= ?2 AND date <= ?3 \
         ORDER BY date ASC",
    )?;
    let rows = stmt.query_map(
        params![
            worker_id,
            from.format("%Y-%m-%d").to_string(),
            to.format("%Y-%m-%d").to_string()
        ],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn upsert_day_record(conn: &Connection, rec: &DayRecord) -> AppResult<()> {
    conn.execute(
        "INSERT INTO day_records (worker_id, date, worked_hours, extra_hours, deficit_hours, \
         status, expected_in, expected_out, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(worker_id, date) DO UPDATE SET
            worked_hours = excluded.worked_hours,
            extra_hours = excluded.extra_hours,
            deficit_hours = excluded.deficit_hours,
            status = excluded.status,
            expected_in = excluded.expected_in,
            expected_out = excluded.expected_out,
            updated_at = excluded.updated_at",
        params![
            rec.worker_id,
            rec.date.format("%Y-%m-%d").to_string(),
            rec.worked_hours,
            rec.extra_hours,
            rec.deficit_hours,
            rec.status.to_db_str(),
            rec.expected_in.map(|t| t.format("%H:%M").to_string()),
            rec.expected_out.map(|t| t.format("%H:%M").to_string()),
            rec.updated_at,
        ],
    )?;
    Ok(())
}

/// Force only the divergence flag, leaving hours untouched.
/// Used when a resolution silences a day without forgiving it.
pub fn set_day_status(
    conn: &Connection,
    worker_id: i64,
    date: NaiveDate,
    status: DayStatus,
    updated_at: &str,
) -> AppResult<()> {
    conn.execute(
        "UPDATE day_records SET status = ?1, updated_at = ?2 WHERE worker_id = ?3 AND date = ?4",
        params![
            status.to_db_str(),
            updated_at,
            worker_id,
            date.format("%Y-%m-%d").to_string()
        ],
    )?;
    Ok(())
}
