use super::{event_status::EventStatus, punch_kind::PunchKind};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// A single clock event (punch) for a worker.
///
/// Events are append-only: rejection flips the status but the row is kept
/// for audit. `justification_id` is set on events synthesized or corrected
/// by an approved justification.
#[derive(Debug, Clone, Serialize)]
pub struct ClockEvent {
    pub id: i64,
    pub worker_id: i64,
    pub date: NaiveDate, // ⇔ events.date (TEXT "YYYY-MM-DD")
    pub time: NaiveTime, // ⇔ events.time (TEXT "HH:MM")
    pub kind: PunchKind,
    pub status: EventStatus,
    pub note: String,
    pub attachment: Option<String>,
    pub justification_id: Option<i64>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<String>, // ISO 8601
    pub source: String,              // 'self' | 'manual' | 'justification'
    pub created_at: String,          // ISO 8601
}

impl ClockEvent {
    /// High-level constructor for freshly created punches.
    /// The id is assigned by the database on insert.
    pub fn new(
        worker_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        kind: PunchKind,
        status: EventStatus,
        note: &str,
        source: &str,
    ) -> Self {
        Self {
            id: 0,
            worker_id,
            date,
            time,
            kind,
            status,
            note: note.to_string(),
            attachment: None,
            justification_id: None,
            approved_by: None,
            approved_at: None,
            source: source.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}
