pub mod aggregate;

pub use aggregate::{StoreId, TransactionRecord};
