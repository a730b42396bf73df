//! Hour-bank row persistence. The balance is only ever moved by deltas
//! (`apply_delta`) or wholesale-overwritten by an administrative recompute.

use crate::errors::{AppError, AppResult};
use crate::models::hour_bank::HourBank;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<HourBank> {
    let start_date: Option<String> = row.get("start_date")?;
    Ok(HourBank {
        worker_id: row.get("worker_id")?,
        balance_minutes: row.get("balance_minutes")?,
        updated_at: row.get("updated_at")?,
        start_date: start_date.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
    })
}

pub fn get_bank(conn: &Connection, worker_id: i64) -> AppResult<HourBank> {
    let mut stmt = conn.prepare_cached(
        "SELECT worker_id, balance_minutes, updated_at, start_date \
         FROM hour_bank WHERE worker_id = ?1",
    )?;
    stmt.query_row([worker_id], map_row)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("hour bank for worker {}", worker_id)))
}

/// Atomically add `delta_minutes` to the balance.
/// The row is created on first use so every worker always has a bank.
pub fn apply_delta(
    conn: &Connection,
    worker_id: i64,
    delta_minutes: i64,
    now: &str,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO hour_bank (worker_id, balance_minutes, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(worker_id) DO UPDATE SET
            balance_minutes = balance_minutes + excluded.balance_minutes,
            updated_at = excluded.updated_at",
        params![worker_id, delta_minutes, now],
    )?;
    Ok(())
}

/// Zero the balance and stamp the ledger-start marker.
pub fn reset_bank(
    conn: &Connection,
    worker_id: i64,
    start_date: NaiveDate,
    now: &str,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO hour_bank (worker_id, balance_minutes, updated_at, start_date)
         VALUES (?1, 0, ?2, ?3)
         ON CONFLICT(worker_id) DO UPDATE SET
            balance_minutes = 0,
            updated_at = excluded.updated_at,
            start_date = excluded.start_date",
        params![
            worker_id,
            now,
            start_date.format("%Y-%m-%d").to_string()
        ],
    )?;
    Ok(())
}

/// Overwrite the balance with a freshly recomputed value.
/// Only the recompute path may call this.
pub fn overwrite_balance(
    conn: &Connection,
    worker_id: i64,
    balance_minutes: i64,
    now: &str,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO hour_bank (worker_id, balance_minutes, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(worker_id) DO UPDATE SET
            balance_minutes = excluded.balance_minutes,
            updated_at = excluded.updated_at",
        params![worker_id, balance_minutes, now],
    )?;
    Ok(())
}

/// Balance lookup that treats a missing row as zero.
pub fn balance_or_zero(conn: &Connection, worker_id: i64) -> AppResult<i64> {
    match get_bank(conn, worker_id) {
        Ok(bank) => Ok(bank.balance_minutes),
        Err(AppError::NotFound(_)) => Ok(0),
        Err(e) => Err(e),
    }
}
