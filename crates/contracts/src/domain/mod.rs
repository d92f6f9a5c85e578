pub mod a001_sales_transaction;
pub mod a002_store;
pub mod a003_store_manager;
