// orderly-core/src/infrastructure/adapters/csv_sink.rs

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::table::Table;
use crate::error::OrderlyError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, is_contained};
use crate::ports::ArtifactSink;

/// Writes tables as CSV and reports as JSON under a target directory.
#[derive(Debug, Clone)]
pub struct CsvArtifactSink {
    root: PathBuf,
}

impl CsvArtifactSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &Path) -> Result<PathBuf, OrderlyError> {
        if !is_contained(relative) {
            return Err(OrderlyError::UnsafePath(relative.display().to_string()));
        }
        Ok(self.root.join(relative))
    }
}

pub fn table_to_csv(table: &Table) -> Result<Vec<u8>, InfrastructureError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| InfrastructureError::Io(e.into_error()))
}

impl ArtifactSink for CsvArtifactSink {
    fn write_table(&self, relative: &Path, table: &Table) -> Result<PathBuf, OrderlyError> {
        let path = self.resolve(relative)?;
        atomic_write(&path, table_to_csv(table)?)?;
        debug!(table = %table.name, rows = table.len(), path = ?path, "Table written");
        Ok(path)
    }

    fn write_json(&self, relative: &Path, value: &Value) -> Result<PathBuf, OrderlyError> {
        let path = self.resolve(relative)?;
        let content = serde_json::to_vec_pretty(value).map_err(InfrastructureError::JsonError)?;
        atomic_write(&path, content)?;
        debug!(path = ?path, "Report written");
        Ok(path)
    }
}
