// orderly-core/src/infrastructure/config/mod.rs

pub mod project;

pub use crate::domain::project::ProjectConfig;
pub use project::{CONFIG_CANDIDATES, find_main_config, load_project_config};
