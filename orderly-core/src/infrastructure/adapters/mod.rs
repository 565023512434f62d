// orderly-core/src/infrastructure/adapters/mod.rs

pub mod csv_sink;
pub mod csv_source;

pub use csv_sink::CsvArtifactSink;
pub use csv_source::CsvDatasetSource;
