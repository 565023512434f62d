// orderly-core/src/application/clean.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::error::OrderlyError;
use crate::infrastructure::config::project::load_project_config;
use crate::infrastructure::fs::is_contained;

/// Removes the configured clean targets and returns what was deleted.
///
/// Every target must resolve inside `project_dir`; the first one that does
/// not aborts the cleanup before anything is removed.
#[instrument(skip_all, fields(project_dir = ?project_dir))]
pub fn clean_project(project_dir: &Path) -> Result<Vec<PathBuf>, OrderlyError> {
    let config = load_project_config(project_dir)?;

    let targets = if config.clean_targets.is_empty() {
        vec![config.target_path.clone()]
    } else {
        config.clean_targets
    };

    if let Some(unsafe_target) = targets.iter().find(|t| !is_contained(Path::new(t))) {
        return Err(OrderlyError::UnsafePath(unsafe_target.clone()));
    }

    let mut removed = Vec::new();
    for target in targets {
        let full_path = project_dir.join(&target);
        if !full_path.exists() {
            continue;
        }
        if full_path.is_dir() {
            fs::remove_dir_all(&full_path)?;
        } else {
            fs::remove_file(&full_path)?;
        }
        info!(target = %target, "Artifact removed");
        removed.push(full_path);
    }

    Ok(removed)
}
