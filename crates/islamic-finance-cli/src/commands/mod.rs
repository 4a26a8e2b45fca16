pub mod compliance;
pub mod contracts;
pub mod distribution;
pub mod metrics;
pub mod schedules;
pub mod terms;
