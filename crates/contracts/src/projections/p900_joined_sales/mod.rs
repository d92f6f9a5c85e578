pub mod dto;

pub use dto::{JoinStats, JoinedRecord};
