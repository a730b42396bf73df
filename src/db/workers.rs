//! Worker persistence (minimal: personnel management is external).

use crate::errors::{AppError, AppResult};
use crate::models::worker::Worker;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<Worker> {
    let created_str: String = row.get("created_at")?;
    let created_at = NaiveDate::parse_from_str(&created_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(created_str.clone())),
        )
    })?;

    Ok(Worker {
        id: row.get("id")?,
        name: row.get("name")?,
        approver: row.get::<_, i64>("approver")? != 0,
        created_at,
    })
}

pub fn insert_worker(
    conn: &Connection,
    name: &str,
    approver: bool,
    created_at: NaiveDate,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO workers (name, approver, created_at) VALUES (?1, ?2, ?3)",
        params![
            name,
            approver as i64,
            created_at.format("%Y-%m-%d").to_string()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_worker(conn: &Connection, id: i64) -> AppResult<Worker> {
    let mut stmt = conn
        .prepare_cached("SELECT id, name, approver, created_at FROM workers WHERE id = ?1")?;
    stmt.query_row([id], map_row)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("worker {}", id)))
}

pub fn get_worker_by_name(conn: &Connection, name: &str) -> AppResult<Worker> {
    let mut stmt = conn
        .prepare_cached("SELECT id, name, approver, created_at FROM workers WHERE name = ?1")?;
    stmt.query_row([name], map_row)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("worker '{}'", name)))
}

/// Accept either a numeric id or a worker name.
pub fn resolve_worker(conn: &Connection, reference: &str) -> AppResult<Worker> {
    if let Ok(id) = reference.parse::<i64>() {
        return get_worker(conn, id);
    }
    get_worker_by_name(conn, reference)
}

pub fn list_workers(conn: &Connection) -> AppResult<Vec<Worker>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, name, approver, created_at FROM workers ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
