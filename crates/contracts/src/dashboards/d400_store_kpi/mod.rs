pub mod dto;

pub use dto::{AverageTicket, MetricsWindow, StoreMetrics, StoreMetricsTable};
