pub mod aggregate;

pub use aggregate::ManagerContact;
