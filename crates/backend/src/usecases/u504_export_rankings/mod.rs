pub mod writer;

pub use writer::{export_ranking, ranking_csv, ExportedRanking};
