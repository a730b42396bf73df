//! Clock event operations: self-punches, manual punches and their
//! review lifecycle.

use crate::auth::AuthContext;
use crate::core::aggregator;
use crate::core::schedule::ScheduleResolver;
use crate::db;
use crate::errors::{AppError, AppResult};
use crate::models::event::ClockEvent;
use crate::models::event_status::EventStatus;
use crate::models::punch_kind::PunchKind;
use crate::utils;
use chrono::{Local, NaiveDate, NaiveTime, Timelike, Utc};
use rusqlite::Connection;

/// Result handed back to the caller of a punch operation.
#[derive(Debug)]
pub struct PunchOutcome {
    pub event: ClockEvent,
    pub message: String,
}

fn now_hm() -> (NaiveDate, NaiveTime) {
    let now = Local::now().naive_local();
    let t = now.time();
    // storage precision is HH:MM
    let t = NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t);
    (now.date(), t)
}

/// Record a self-punch for "now", alternating in/out against the last
/// non-rejected event of the day (first punch of a day is a clock-in).
pub fn record_self_punch(
    conn: &mut Connection,
    resolver: &dyn ScheduleResolver,
    worker_id: i64,
) -> AppResult<PunchOutcome> {
    let worker = db::workers::get_worker(conn, worker_id)?;
    let (date, time) = now_hm();

    let tx = conn.transaction()?;

    let kind = match db::events::last_active_event(&tx, worker_id, date)? {
        Some(last) => last.kind.opposite(),
        None => PunchKind::In,
    };

    let mut event = ClockEvent::new(worker_id, date, time, kind, EventStatus::Normal, "", "self");
    event.id = db::events::insert_event(&tx, &event)?;

    let refresh = aggregator::refresh_day_tx(&tx, resolver, worker_id, date)?;

    let message = format!(
        "{} recorded for {} at {} ({}, bank {})",
        match kind {
            PunchKind::In => "Clock-in",
            PunchKind::Out => "Clock-out",
        },
        worker.name,
        event.time_str(),
        refresh.current.status.to_db_str(),
        utils::mins2readable(refresh.delta_minutes, true, true),
    );
    let _ = db::audit::ttlog(&tx, "punch", &worker.name, &message);

    tx.commit()?;
    Ok(PunchOutcome { event, message })
}

/// Record a manual punch at an arbitrary past timestamp.
///
/// The note is mandatory and the timestamp must not be in the future.
/// When the acting caller holds the approval capability the event is
/// approved on the spot and the day re-aggregated; otherwise it stays
/// pending and does not count until reviewed.
#[allow(clippy::too_many_arguments)]
pub fn record_manual_punch(
    conn: &mut Connection,
    resolver: &dyn ScheduleResolver,
    ctx: &AuthContext,
    worker_id: i64,
    date: NaiveDate,
    time: NaiveTime,
    kind: PunchKind,
    note: &str,
    attachment: Option<String>,
) -> AppResult<PunchOutcome> {
    let worker = db::workers::get_worker(conn, worker_id)?;

    if note.trim().is_empty() {
        return Err(AppError::Validation(
            "a manual punch requires a note".to_string(),
        ));
    }
    let now = Local::now().naive_local();
    if date.and_time(time) > now {
        return Err(AppError::Validation(format!(
            "manual punch timestamp {} {} is in the future",
            date, time
        )));
    }

    let tx = conn.transaction()?;

    let status = if ctx.approver {
        EventStatus::Approved
    } else {
        EventStatus::Pending
    };

    let mut event = ClockEvent::new(worker_id, date, time, kind, status, note, "manual");
    event.attachment = attachment;
    if ctx.approver {
        event.approved_by = Some(ctx.worker_id);
        event.approved_at = Some(Utc::now().to_rfc3339());
    }
    event.id = db::events::insert_event(&tx, &event)?;

    let message = if ctx.approver {
        let refresh = aggregator::refresh_day_tx(&tx, resolver, worker_id, date)?;
        format!(
            "Manual {} for {} on {} approved (day {}, bank {})",
            event.kind.to_db_str(),
            worker.name,
            event.date_str(),
            refresh.current.status.to_db_str(),
            utils::mins2readable(refresh.delta_minutes, true, true),
        )
    } else {
        format!(
            "Manual {} for {} on {} awaiting approval",
            event.kind.to_db_str(),
            worker.name,
            event.date_str(),
        )
    };
    let _ = db::audit::ttlog(&tx, "manual_punch", &worker.name, &message);

    tx.commit()?;
    Ok(PunchOutcome { event, message })
}

/// Approve a pending manual punch and re-aggregate its day.
pub fn approve_manual_punch(
    conn: &mut Connection,
    resolver: &dyn ScheduleResolver,
    ctx: &AuthContext,
    event_id: i64,
) -> AppResult<PunchOutcome> {
    ctx.require_approver()?;

    let event = db::events::get_event(conn, event_id)?;
    if event.status != EventStatus::Pending {
        return Err(AppError::Conflict(format!(
            "event {} is {}, only pending events can be approved",
            event_id,
            event.status.to_db_str()
        )));
    }

    let tx = conn.transaction()?;
    let reviewed_at = Utc::now().to_rfc3339();
    db::events::mark_event_reviewed(
        &tx,
        event_id,
        EventStatus::Approved,
        ctx.worker_id,
        &reviewed_at,
    )?;

    let refresh = aggregator::refresh_day_tx(&tx, resolver, event.worker_id, event.date)?;

    let message = format!(
        "Manual {} on {} approved (day {}, bank {})",
        event.kind.to_db_str(),
        event.date_str(),
        refresh.current.status.to_db_str(),
        utils::mins2readable(refresh.delta_minutes, true, true),
    );
    let _ = db::audit::ttlog(&tx, "approve_punch", &event.date_str(), &message);

    tx.commit()?;

    let event = db::events::get_event(conn, event_id)?;
    Ok(PunchOutcome { event, message })
}

/// Reject a pending manual punch. The event is kept for audit but will
/// never count towards aggregation.
pub fn reject_manual_punch(
    conn: &mut Connection,
    ctx: &AuthContext,
    event_id: i64,
    reason: Option<&str>,
) -> AppResult<PunchOutcome> {
    ctx.require_approver()?;

    let event = db::events::get_event(conn, event_id)?;
    if event.status != EventStatus::Pending {
        return Err(AppError::Conflict(format!(
            "event {} is {}, only pending events can be rejected",
            event_id,
            event.status.to_db_str()
        )));
    }

    let tx = conn.transaction()?;
    let reviewed_at = Utc::now().to_rfc3339();
    db::events::mark_event_reviewed(
        &tx,
        event_id,
        EventStatus::Rejected,
        ctx.worker_id,
        &reviewed_at,
    )?;

    let message = match reason {
        Some(r) => format!(
            "Manual {} on {} rejected: {}",
            event.kind.to_db_str(),
            event.date_str(),
            r
        ),
        None => format!(
            "Manual {} on {} rejected",
            event.kind.to_db_str(),
            event.date_str()
        ),
    };
    let _ = db::audit::ttlog(&tx, "reject_punch", &event.date_str(), &message);

    tx.commit()?;

    let event = db::events::get_event(conn, event_id)?;
    Ok(PunchOutcome { event, message })
}
