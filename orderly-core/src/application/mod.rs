// orderly-core/src/application/mod.rs

pub mod clean;
pub mod mart;
pub mod pipeline;
pub mod quality;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use orderly_core::application::{run_pipeline, clean_project};`

pub use clean::clean_project;
pub use mart::{MartBuild, build_mart, write_mart_artifacts};
pub use pipeline::{RunMode, RunResult, run_pipeline, run_quality_check};
pub use quality::{QualityAnalysis, analyze_quality, write_quality_artifacts};
