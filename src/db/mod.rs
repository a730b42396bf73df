pub mod audit;
pub mod days;
pub mod events;
pub mod initialize;
pub mod justifications;
pub mod ledger;
pub mod migrate;
pub mod pool;
pub mod schedules;
pub mod workers;

pub use initialize::init_db;
pub use pool::DbPool;
