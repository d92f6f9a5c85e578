pub mod dto;

pub use dto::{DeliveryRecord, DeliveryStatus, DeliverySummary};
