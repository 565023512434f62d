// orderly-core/src/infrastructure/discovery.rs

use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::infrastructure::error::InfrastructureError;

fn re_period() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{6})").unwrap_or_else(|_| {
            // Hardcoded pattern; the fallback never matches anything.
            Regex::new("$^").unwrap_or_else(|_| unreachable!())
        })
    })
}

/// Reporting period (`YYYYMM`) a file name starts with, if any.
pub fn reporting_period(file_name: &str) -> Option<&str> {
    re_period()
        .captures(file_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Resolves `input` to the ordered list of extracts to load.
///
/// A file is its own single source. In a directory, each reporting period
/// contributes its lexicographically greatest `*.csv` (re-extracts carry later
/// timestamps); files without a period prefix are all kept.
#[instrument(skip_all, fields(input = ?input))]
pub fn discover_sources(input: &Path) -> Result<Vec<PathBuf>, InfrastructureError> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(InfrastructureError::SourceNotFound(
            input.display().to_string(),
        ));
    }

    let mut by_period: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut unperiodized: Vec<PathBuf> = Vec::new();

    let walker = WalkDir::new(input).max_depth(1).sort_by_file_name();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || !path.extension().is_some_and(|ext| ext == "csv") {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        match reporting_period(&name) {
            Some(period) => {
                // Sorted walk: a later entry for the same period supersedes.
                if let Some(previous) = by_period.insert(period.to_string(), path.to_path_buf()) {
                    debug!(period, superseded = ?previous, "Older extract skipped");
                }
            }
            None => unperiodized.push(path.to_path_buf()),
        }
    }

    let mut selected: Vec<PathBuf> = by_period.into_values().collect();
    selected.extend(unperiodized);

    if selected.is_empty() {
        return Err(InfrastructureError::SourceNotFound(format!(
            "{} (no *.csv files)",
            input.display()
        )));
    }

    info!(files = selected.len(), "Order extracts selected");
    Ok(selected)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_reporting_period() {
        assert_eq!(reporting_period("202103_orders.csv"), Some("202103"));
        assert_eq!(reporting_period("orders_202103.csv"), None);
        assert_eq!(reporting_period("2021_orders.csv"), None);
    }

    #[test]
    fn test_latest_extract_per_period() -> Result<()> {
        let dir = tempdir()?;
        for name in [
            "202102_orders_20210301.csv",
            "202101_orders_20210201.csv",
            "202101_orders_20210215.csv",
            "manual_fixes.csv",
            "202101_notes.txt",
        ] {
            fs::write(dir.path().join(name), "Row ID\n")?;
        }

        let selected = discover_sources(dir.path())?;
        assert_eq!(
            names(&selected),
            vec![
                "202101_orders_20210215.csv",
                "202102_orders_20210301.csv",
                "manual_fixes.csv"
            ]
        );
        Ok(())
    }

    #[test]
    fn test_single_file_input() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("orders.csv");
        fs::write(&file, "Row ID\n")?;
        assert_eq!(discover_sources(&file)?, vec![file]);
        Ok(())
    }

    #[test]
    fn test_missing_or_empty_input() -> Result<()> {
        let dir = tempdir()?;
        assert!(matches!(
            discover_sources(&dir.path().join("nope")),
            Err(InfrastructureError::SourceNotFound(_))
        ));
        assert!(matches!(
            discover_sources(dir.path()),
            Err(InfrastructureError::SourceNotFound(_))
        ));
        Ok(())
    }
}
