pub mod d400_store_kpi;
pub mod d401_store_ranking;
