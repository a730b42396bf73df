use chrono::NaiveDate;
use serde::Serialize;

/// Minimal worker row.
///
/// Full personnel management lives outside this engine; the ledger only
/// needs a stable id, the approval capability flag and the creation date
/// (the floor for hour-bank recomputes).
#[derive(Debug, Clone, Serialize)]
pub struct Worker {
    pub id: i64,
    pub name: String,
    pub approver: bool,
    pub created_at: NaiveDate,
}
