pub mod csv_reader;

pub use csv_reader::{import_all, ImportError, ImportedRelations};
