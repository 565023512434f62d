// orderly-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

/// Project file names, in lookup order.
pub const CONFIG_CANDIDATES: [&str; 2] = ["orderly.yaml", "orderly_project.yaml"];

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content)?;

    // ORDERLY_TARGET_PATH=/tmp/out orderly run
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config.validate().map_err(|errors| {
        InfrastructureError::ConfigError(format!(
            "Invalid configuration in {:?}: {}",
            config_path, errors
        ))
    })?;

    Ok(config)
}

pub fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

fn apply_env_overrides<F>(config: &mut ProjectConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("ORDERLY_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Some(val) = lookup("ORDERLY_INPUT") {
        info!(old = ?config.input, new = ?val, "Overriding input via ENV");
        config.input = val;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_loads_either_file_name() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("orderly_project.yaml"),
            "name: superstore\nversion: '1.0'\ninput: extracts\n",
        )?;

        let config = load_project_config(dir.path())?;
        assert_eq!(config.name, "superstore");
        assert_eq!(config.input, "extracts");

        fs::write(dir.path().join("orderly.yaml"), "name: preferred\nversion: '1.0'\n")?;
        assert_eq!(load_project_config(dir.path())?.name, "preferred");
        Ok(())
    }

    #[test]
    fn test_missing_config() -> Result<()> {
        let dir = tempdir()?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("orderly.yaml"),
            "name: x\nversion: '1'\nquality:\n  examples-per-rule: 500\n",
        )?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigError(_)));

        fs::write(dir.path().join("orderly.yaml"), "name: [unclosed\n")?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::YamlError(_)));
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let mut config: ProjectConfig = serde_yaml::from_str("name: x\nversion: '1'\n").unwrap();
        apply_env_overrides(&mut config, |key| match key {
            "ORDERLY_TARGET_PATH" => Some("/tmp/out".to_string()),
            _ => None,
        });
        assert_eq!(config.target_path, "/tmp/out");
        assert_eq!(config.input, "data");
    }
}
