use chrono::NaiveDate;
use serde::Serialize;

/// Per-worker running hour bank: a signed balance in minutes.
///
/// `start_date` is the ledger-start marker stamped by a close operation;
/// a recompute never reaches further back than this date.
#[derive(Debug, Clone, Serialize)]
pub struct HourBank {
    pub worker_id: i64,
    pub balance_minutes: i64,
    pub updated_at: String, // ISO 8601
    pub start_date: Option<NaiveDate>,
}

impl HourBank {
    pub fn balance_hours(&self) -> f64 {
        self.balance_minutes as f64 / 60.0
    }
}
