pub mod u502_store_reports;
pub mod u503_deliver_reports;
