pub mod dto;

pub use dto::{ExecutiveReportPayload, ReportRecipient, StoreReportPayload};
