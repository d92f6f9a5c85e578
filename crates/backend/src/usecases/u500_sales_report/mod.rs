pub mod executor;

pub use executor::{execute, run_pipeline, PipelineOutput, RunSummary};
