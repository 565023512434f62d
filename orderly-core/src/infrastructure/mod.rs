// orderly-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fs;

pub use adapters::{CsvArtifactSink, CsvDatasetSource};
pub use error::InfrastructureError;
