pub mod u500_sales_report;
pub mod u501_import_sales;
pub mod u502_store_reports;
pub mod u503_deliver_reports;
pub mod u504_export_rankings;
