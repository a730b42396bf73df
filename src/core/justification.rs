//! Dispute workflow: a worker justifies a divergent day, an approver
//! resolves the dispute, and the resolution re-drives the aggregator and
//! the hour bank.
//!
//! States: pending → approved | rejected (terminal). The single exception
//! is `unjustified-absence`, which is approved at creation and silences
//! the day without forgiving its deficit.

use crate::auth::AuthContext;
use crate::core::aggregator::{self, DayTotals, classify_day};
use crate::core::schedule::ScheduleResolver;
use crate::db;
use crate::errors::{AppError, AppResult};
use crate::models::day_record::DayStatus;
use crate::models::event::ClockEvent;
use crate::models::event_status::EventStatus;
use crate::models::justification::{Justification, JustificationKind, JustificationStatus};
use crate::models::punch_kind::PunchKind;
use crate::models::schedule::DayExpectation;
use crate::utils;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

/// File a dispute against a divergent day.
///
/// Fails with ConflictError when the day is not currently divergent per a
/// live aggregation run, or when a pending justification already exists
/// for the same (worker, date).
pub fn create_justification(
    conn: &mut Connection,
    resolver: &dyn ScheduleResolver,
    worker_id: i64,
    date: NaiveDate,
    kind: JustificationKind,
    description: Option<&str>,
    attachment: Option<String>,
) -> AppResult<Justification> {
    let worker = db::workers::get_worker(conn, worker_id)?;

    let tx = conn.transaction()?;

    // Live divergence check; the persisted record may be stale or absent.
    let events = db::events::load_countable_events(&tx, worker_id, date)?;
    let expectation = resolver.resolve(&tx, worker_id, date)?;
    let totals = classify_day(&events, expectation.as_ref(), date, utils::date::today());
    if !totals.is_divergent() {
        return Err(AppError::Conflict(format!(
            "day {} of {} is not divergent, nothing to justify",
            date, worker.name
        )));
    }

    if db::justifications::pending_exists(&tx, worker_id, date)? {
        return Err(AppError::Conflict(format!(
            "a pending justification already exists for {} on {}",
            worker.name, date
        )));
    }

    let now = Utc::now().to_rfc3339();
    let auto = kind.auto_approves();
    let mut justification = Justification {
        id: 0,
        worker_id,
        date,
        kind,
        status: if auto {
            JustificationStatus::Approved
        } else {
            JustificationStatus::Pending
        },
        description: description.unwrap_or("").to_string(),
        attachment,
        reviewed_by: None,
        reviewed_at: if auto { Some(now.clone()) } else { None },
        created_at: now.clone(),
    };
    justification.id = db::justifications::insert_justification(&tx, &justification)?;

    if auto {
        // Unjustified absence: the deficit stands in the bank, only the
        // divergence flag is silenced. Persist the day first so the flag
        // has a row to land on.
        aggregator::refresh_day_tx(&tx, resolver, worker_id, date)?;
        db::days::set_day_status(&tx, worker_id, date, DayStatus::Normal, &now)?;
    }

    let _ = db::audit::ttlog(
        &tx,
        "create_justification",
        &worker.name,
        &format!(
            "{} filed for {} ({})",
            kind.to_db_str(),
            date,
            justification.status.to_db_str()
        ),
    );

    tx.commit()?;
    Ok(justification)
}

/// Synthesize the punches a forgotten day is missing, at schedule-implied
/// times. Only genuinely absent sides are created.
fn synthesize_missing_punches(
    conn: &Connection,
    justification: &Justification,
    expectation: &DayExpectation,
    approver_id: i64,
) -> AppResult<()> {
    let events = db::events::load_countable_events(conn, justification.worker_id, justification.date)?;
    let has_in = events.iter().any(|e| e.kind.is_in());
    let has_out = events.iter().any(|e| e.kind.is_out());
    let now = Utc::now().to_rfc3339();

    let synthesize = |time, kind: PunchKind| -> AppResult<()> {
        let mut ev = ClockEvent::new(
            justification.worker_id,
            justification.date,
            time,
            kind,
            EventStatus::Approved,
            "synthesized from approved justification",
            "justification",
        );
        ev.justification_id = Some(justification.id);
        ev.approved_by = Some(approver_id);
        ev.approved_at = Some(now.clone());
        db::events::insert_event(conn, &ev)?;
        Ok(())
    };

    if !has_in && let Some(entry) = expectation.entry {
        synthesize(entry, PunchKind::In)?;
    }
    if !has_out && let Some(exit) = expectation.exit {
        synthesize(exit, PunchKind::Out)?;
    }

    Ok(())
}

/// Rewrite the day's first clock-in to the scheduled start time.
fn correct_late_entry(
    conn: &Connection,
    justification: &Justification,
    expectation: &DayExpectation,
) -> AppResult<()> {
    let Some(entry) = expectation.entry else {
        return Ok(());
    };
    let events = db::events::load_countable_events(conn, justification.worker_id, justification.date)?;
    if let Some(first_in) = events.iter().find(|e| e.kind.is_in()) {
        db::events::correct_event_time(conn, first_in.id, entry, justification.id)?;
    }
    Ok(())
}

/// Rewrite the day's last clock-out to the scheduled end time.
fn correct_early_exit(
    conn: &Connection,
    justification: &Justification,
    expectation: &DayExpectation,
) -> AppResult<()> {
    let Some(exit) = expectation.exit else {
        return Ok(());
    };
    let events = db::events::load_countable_events(conn, justification.worker_id, justification.date)?;
    if let Some(last_out) = events.iter().rev().find(|e| e.kind.is_out()) {
        db::events::correct_event_time(conn, last_out.id, exit, justification.id)?;
    }
    Ok(())
}

/// Approve a pending justification and re-derive its day per type.
pub fn approve_justification(
    conn: &mut Connection,
    resolver: &dyn ScheduleResolver,
    ctx: &AuthContext,
    id: i64,
) -> AppResult<Justification> {
    ctx.require_approver()?;

    let justification = db::justifications::get_justification(conn, id)?;
    if justification.status != JustificationStatus::Pending {
        return Err(AppError::Conflict(format!(
            "justification {} is {}, only pending ones can be approved",
            id,
            justification.status.to_db_str()
        )));
    }

    let worker_id = justification.worker_id;
    let date = justification.date;
    let now = Utc::now().to_rfc3339();

    let tx = conn.transaction()?;
    db::justifications::mark_reviewed(&tx, id, JustificationStatus::Approved, ctx.worker_id, &now)?;

    let expectation = resolver.resolve(&tx, worker_id, date)?;

    match justification.kind {
        // Full forgiveness: the day stops counting entirely.
        JustificationKind::JustifiedAbsence | JustificationKind::MedicalVisit => {
            let forgiven = DayTotals {
                worked_minutes: 0,
                extra_minutes: 0,
                deficit_minutes: 0,
                status: DayStatus::Normal,
            };
            aggregator::force_day_tx(&tx, resolver, worker_id, date, forgiven)?;
        }

        // Overtime acknowledged: extras stay in the bank, flag silenced.
        JustificationKind::Overtime => {
            aggregator::refresh_day_tx(&tx, resolver, worker_id, date)?;
            db::days::set_day_status(&tx, worker_id, date, DayStatus::Normal, &now)?;
        }

        // Event corrections, then a plain re-aggregation decides.
        JustificationKind::ForgotPunch => {
            if let Some(exp) = expectation.as_ref() {
                synthesize_missing_punches(&tx, &justification, exp, ctx.worker_id)?;
            }
            aggregator::refresh_day_tx(&tx, resolver, worker_id, date)?;
        }
        JustificationKind::LateEntry => {
            if let Some(exp) = expectation.as_ref() {
                correct_late_entry(&tx, &justification, exp)?;
            }
            aggregator::refresh_day_tx(&tx, resolver, worker_id, date)?;
        }
        JustificationKind::EarlyExit => {
            if let Some(exp) = expectation.as_ref() {
                correct_early_exit(&tx, &justification, exp)?;
            }
            aggregator::refresh_day_tx(&tx, resolver, worker_id, date)?;
        }

        JustificationKind::Other => {
            aggregator::refresh_day_tx(&tx, resolver, worker_id, date)?;
            db::days::set_day_status(&tx, worker_id, date, DayStatus::Normal, &now)?;
        }

        // Auto-approved at creation, never reaches the review path.
        JustificationKind::UnjustifiedAbsence => {}
    }

    let _ = db::audit::ttlog(
        &tx,
        "approve_justification",
        &date.format("%Y-%m-%d").to_string(),
        &format!("{} approved for worker {}", justification.kind.to_db_str(), worker_id),
    );

    tx.commit()?;
    db::justifications::get_justification(conn, id)
}

/// Reject a pending justification: the divergence flag is silenced but
/// the hours stand untouched.
pub fn reject_justification(
    conn: &mut Connection,
    resolver: &dyn ScheduleResolver,
    ctx: &AuthContext,
    id: i64,
    reason: Option<&str>,
) -> AppResult<Justification> {
    ctx.require_approver()?;

    let justification = db::justifications::get_justification(conn, id)?;
    if justification.status != JustificationStatus::Pending {
        return Err(AppError::Conflict(format!(
            "justification {} is {}, only pending ones can be rejected",
            id,
            justification.status.to_db_str()
        )));
    }

    let worker_id = justification.worker_id;
    let date = justification.date;
    let now = Utc::now().to_rfc3339();

    let tx = conn.transaction()?;
    db::justifications::mark_reviewed(&tx, id, JustificationStatus::Rejected, ctx.worker_id, &now)?;

    // Make sure the day has a persisted row, then silence only the flag.
    if db::days::get_day_record(&tx, worker_id, date)?.is_none() {
        aggregator::refresh_day_tx(&tx, resolver, worker_id, date)?;
    }
    db::days::set_day_status(&tx, worker_id, date, DayStatus::Normal, &now)?;

    let _ = db::audit::ttlog(
        &tx,
        "reject_justification",
        &date.format("%Y-%m-%d").to_string(),
        &format!(
            "{} rejected for worker {}{}",
            justification.kind.to_db_str(),
            worker_id,
            reason.map(|r| format!(": {}", r)).unwrap_or_default()
        ),
    );

    tx.commit()?;
    db::justifications::get_justification(conn, id)
}
