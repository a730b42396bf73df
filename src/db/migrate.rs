//! Schema migration engine.
//!
//! Every schema change lives here as a numbered step; `PRAGMA user_version`
//! tracks the last applied step so old databases upgrade in place.

use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    r#"
    CREATE TABLE IF NOT EXISTS workers (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL UNIQUE,
        approver    INTEGER NOT NULL DEFAULT 0,
        created_at  TEXT NOT NULL                -- YYYY-MM-DD
    );

    CREATE TABLE IF NOT EXISTS worker_schedules (
        worker_id          INTEGER NOT NULL REFERENCES workers(id),
        weekday            INTEGER NOT NULL CHECK (weekday BETWEEN 0 AND 6),
        expected_minutes   INTEGER NOT NULL,
        entry_time         TEXT,                 -- HH:MM
        exit_time          TEXT,                 -- HH:MM
        min_break_minutes  INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (worker_id, weekday)
    );

    CREATE TABLE IF NOT EXISTS events (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        worker_id        INTEGER NOT NULL REFERENCES workers(id),
        date             TEXT NOT NULL,          -- YYYY-MM-DD
        time             TEXT NOT NULL,          -- HH:MM
        kind             TEXT NOT NULL CHECK (kind IN ('in','out')),
        status           TEXT NOT NULL DEFAULT 'normal'
                         CHECK (status IN ('normal','pending','approved','rejected')),
        note             TEXT NOT NULL DEFAULT '',
        attachment       TEXT,
        justification_id INTEGER,
        approved_by      INTEGER,
        approved_at      TEXT,                   -- ISO 8601
        source           TEXT NOT NULL DEFAULT 'self',
        created_at       TEXT NOT NULL           -- ISO 8601
    );

    CREATE INDEX IF NOT EXISTS idx_events_worker_date ON events(worker_id, date, time);
    CREATE INDEX IF NOT EXISTS idx_events_status ON events(status);

    CREATE TABLE IF NOT EXISTS day_records (
        worker_id      INTEGER NOT NULL REFERENCES workers(id),
        date           TEXT NOT NULL,            -- YYYY-MM-DD
        worked_hours   REAL NOT NULL DEFAULT 0,
        extra_hours    REAL NOT NULL DEFAULT 0,
        deficit_hours  REAL NOT NULL DEFAULT 0,
        status         TEXT NOT NULL DEFAULT 'normal'
                       CHECK (status IN ('normal','divergent')),
        expected_in    TEXT,                     -- HH:MM
        expected_out   TEXT,                     -- HH:MM
        updated_at     TEXT NOT NULL,            -- ISO 8601
        PRIMARY KEY (worker_id, date)
    );

    CREATE TABLE IF NOT EXISTS hour_bank (
        worker_id        INTEGER PRIMARY KEY REFERENCES workers(id),
        balance_minutes  INTEGER NOT NULL DEFAULT 0,
        updated_at       TEXT NOT NULL,          -- ISO 8601
        start_date       TEXT                    -- YYYY-MM-DD, set by close
    );

    CREATE TABLE IF NOT EXISTS justifications (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        worker_id    INTEGER NOT NULL REFERENCES workers(id),
        date         TEXT NOT NULL,              -- YYYY-MM-DD
        kind         TEXT NOT NULL CHECK (kind IN (
                         'forgot-punch','late-entry','early-exit',
                         'justified-absence','medical-visit','overtime',
                         'other','unjustified-absence')),
        status       TEXT NOT NULL DEFAULT 'pending'
                     CHECK (status IN ('pending','approved','rejected')),
        description  TEXT NOT NULL DEFAULT '',
        attachment   TEXT,
        reviewed_by  INTEGER,
        reviewed_at  TEXT,                       -- ISO 8601
        created_at   TEXT NOT NULL               -- ISO 8601
    );

    CREATE INDEX IF NOT EXISTS idx_just_worker_date ON justifications(worker_id, date);

    CREATE TABLE IF NOT EXISTS log (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        date      TEXT NOT NULL,
        operation TEXT NOT NULL,
        target    TEXT DEFAULT '',
        message   TEXT NOT NULL
    );
    "#,
)];

fn schema_version(conn: &Connection) -> AppResult<i64> {
    let v: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(v)
}

fn set_schema_version(conn: &Connection, v: i64) -> AppResult<()> {
    conn.pragma_update(None, "user_version", v)?;
    Ok(())
}

/// Apply every migration step newer than the database's user_version.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    let current = schema_version(conn)?;

    for (version, sql) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        conn.execute_batch(sql)
            .map_err(|e| AppError::Migration(format!("step {}: {}", version, e)))?;
        set_schema_version(conn, *version)?;
    }

    Ok(())
}
