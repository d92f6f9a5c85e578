pub mod join;

pub use join::{join_records, JoinOutcome};
