pub mod aggregator;

pub use aggregator::{aggregate, aggregate_all_time, aggregate_latest_day, latest_date};
