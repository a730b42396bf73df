use serde::Serialize;

/// Lifecycle status of a clock event.
///
/// Self-punches are born `Normal` and never change. Manual punches are born
/// `Pending` (or `Approved` when entered by an approver) and move to
/// `Approved`/`Rejected` exactly once. Rejected events stay in the table for
/// audit but never count towards a day again.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EventStatus {
    Normal,
    Pending,
    Approved,
    Rejected,
}

impl EventStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EventStatus::Normal => "normal",
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Rejected => "rejected",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(EventStatus::Normal),
            "pending" => Some(EventStatus::Pending),
            "approved" => Some(EventStatus::Approved),
            "rejected" => Some(EventStatus::Rejected),
            _ => None,
        }
    }

    /// Only normal and approved events feed the day aggregator.
    pub fn counts_for_aggregation(&self) -> bool {
        matches!(self, EventStatus::Normal | EventStatus::Approved)
    }
}
