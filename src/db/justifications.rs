//! Justification persistence.

use crate::errors::{AppError, AppResult};
use crate::models::justification::{Justification, JustificationKind, JustificationStatus};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

const JUST_COLS: &str = "id, worker_id, date, kind, status, description, attachment, \
     reviewed_by, reviewed_at, created_at";

fn map_row(row: &Row) -> rusqlite::Result<Justification> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let kind_str: String = row.get("kind")?;
    let kind = JustificationKind::from_db_str(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidJustificationKind(kind_str.clone())),
        )
    })?;

    let status_str: String = row.get("status")?;
    let status = JustificationStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!(
                "invalid justification status: {}",
                status_str
            ))),
        )
    })?;

    Ok(Justification {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        date,
        kind,
        status,
        description: row.get("description")?,
        attachment: row.get("attachment")?,
        reviewed_by: row.get("reviewed_by")?,
        reviewed_at: row.get("reviewed_at")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_justification(conn: &Connection, j: &Justification) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO justifications (worker_id, date, kind, status, description, attachment, \
         reviewed_by, reviewed_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            j.worker_id,
            j.date.format("%Y-%m-%d").to_string(),
            j.kind.to_db_str(),
            j.status.to_db_str(),
            j.description,
            j.attachment,
            j.reviewed_by,
            j.reviewed_at,
            j.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_justification(conn: &Connection, id: i64) -> AppResult<Justification> {
    let sql = format!("SELECT {} FROM justifications WHERE id = ?1", JUST_COLS);
    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.query_row([id], map_row)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("justification {}", id)))
}

/// Invariant guard: at most one pending justification per (worker, date).
pub fn pending_exists(conn: &Connection, worker_id: i64, date: NaiveDate) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM justifications \
         WHERE worker_id = ?1 AND date = ?2 AND status = 'pending' LIMIT 1",
    )?;
    let found = stmt
        .query_row(params![worker_id, date.format("%Y-%m-%d").to_string()], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// All justifications filed for a worker's day, newest first.
pub fn list_for_day(
    conn: &Connection,
    worker_id: i64,
    date: NaiveDate,
) -> AppResult<Vec<Justification>> {
    let sql = format!(
        "SELECT {} FROM justifications WHERE worker_id = ?1 AND date = ?2 \
         ORDER BY created_at DESC, id DESC",
        JUST_COLS
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![worker_id, date.format("%Y-%m-%d").to_string()], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Whether the day is covered by an approved justification whose kind
/// forgives it (contribution zero during recompute).
pub fn has_forgiving_approval(
    conn: &Connection,
    worker_id: i64,
    date: NaiveDate,
) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM justifications \
         WHERE worker_id = ?1 AND date = ?2 AND status = 'approved' \
         AND kind NOT IN ('unjustified-absence','overtime') LIMIT 1",
    )?;
    let found = stmt
        .query_row(params![worker_id, date.format("%Y-%m-%d").to_string()], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Stamp the reviewer and the terminal status.
pub fn mark_reviewed(
    conn: &Connection,
    id: i64,
    status: JustificationStatus,
    reviewer_id: i64,
    reviewed_at: &str,
) -> AppResult<()> {
    conn.execute(
        "UPDATE justifications SET status = ?1, reviewed_by = ?2, reviewed_at = ?3 WHERE id = ?4",
        params![status.to_db_str(), reviewer_id, reviewed_at, id],
    )?;
    Ok(())
}
