use chrono::{NaiveTime, Weekday};
use serde::Serialize;

/// What the schedule expects of a worker on one day.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DayExpectation {
    pub expected_minutes: i64,
    pub entry: Option<NaiveTime>,
    pub exit: Option<NaiveTime>,
    pub min_break_minutes: i64,
}

impl DayExpectation {
    pub fn expected_hours(&self) -> f64 {
        self.expected_minutes as f64 / 60.0
    }
}

/// Per-worker weekly template: a fixed 7-slot array keyed by weekday.
/// A `None` slot means "no schedule assigned" for that weekday, which
/// disables divergence computation entirely.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WeekSchedule {
    slots: [Option<DayExpectation>; 7],
}

impl WeekSchedule {
    pub fn set(&mut self, weekday: Weekday, expectation: DayExpectation) {
        self.slots[weekday.num_days_from_monday() as usize] = Some(expectation);
    }

    pub fn get(&self, weekday: Weekday) -> Option<DayExpectation> {
        self.slots[weekday.num_days_from_monday() as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }
}
