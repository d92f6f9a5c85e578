pub mod ranking;

pub use ranking::{rank, StoreRanking};
