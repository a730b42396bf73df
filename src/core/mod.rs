pub mod aggregator;
pub mod attachments;
pub mod justification;
pub mod ledger;
pub mod punch;
pub mod report;
pub mod schedule;
