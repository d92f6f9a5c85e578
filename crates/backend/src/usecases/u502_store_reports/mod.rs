pub mod assembler;

pub use assembler::{build_executive_report, build_store_reports};
