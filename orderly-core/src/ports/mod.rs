// orderly-core/src/ports/mod.rs

pub mod sink;
pub mod source;

pub use sink::ArtifactSink;
pub use source::DatasetSource;
