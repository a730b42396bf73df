use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Classification of a work day against the expected schedule.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DayStatus {
    Normal,
    Divergent,
}

impl DayStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DayStatus::Normal => "normal",
            DayStatus::Divergent => "divergent",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(DayStatus::Normal),
            "divergent" => Some(DayStatus::Divergent),
            _ => None,
        }
    }
}

/// Derived daily summary, one row per (worker, date).
///
/// Never hand-edited: the aggregator upserts it and reads the previous row
/// just before each overwrite to compute the hour-bank delta. Hours are
/// stored with fixed 2-decimal precision.
#[derive(Debug, Clone, Serialize)]
pub struct DayRecord {
    pub worker_id: i64,
    pub date: NaiveDate,
    pub worked_hours: f64,
    pub extra_hours: f64,
    pub deficit_hours: f64,
    pub status: DayStatus,
    pub expected_in: Option<NaiveTime>,
    pub expected_out: Option<NaiveTime>,
    pub updated_at: String, // ISO 8601
}

impl DayRecord {
    /// Signed contribution of this day to the hour bank, in minutes.
    pub fn signed_minutes(&self) -> i64 {
        hours_to_minutes(self.extra_hours) - hours_to_minutes(self.deficit_hours)
    }
}

/// Convert 2-decimal hours to whole minutes.
pub fn hours_to_minutes(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

/// Round a fractional hour value to fixed 2-decimal precision.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_round_trip_to_minutes() {
        assert_eq!(hours_to_minutes(0.25), 15);
        assert_eq!(hours_to_minutes(8.0), 480);
        assert_eq!(hours_to_minutes(round_hours(8.0 + 8.0 / 60.0)), 481);
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round_hours(7.666_666), 7.67);
        assert_eq!(round_hours(0.5), 0.5);
    }
}
