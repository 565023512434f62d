// orderly-core/src/ports/sink.rs

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::domain::table::Table;
use crate::error::OrderlyError;

/// Destination of produced tables and reports.
///
/// Paths are relative to the sink's root; parent directories are created as needed.
pub trait ArtifactSink: Send + Sync {
    fn write_table(&self, relative: &Path, table: &Table) -> Result<PathBuf, OrderlyError>;

    fn write_json(&self, relative: &Path, value: &Value) -> Result<PathBuf, OrderlyError>;
}
