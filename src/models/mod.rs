pub mod day_record;
pub mod event;
pub mod event_status;
pub mod hour_bank;
pub mod justification;
pub mod punch_kind;
pub mod schedule;
pub mod worker;
