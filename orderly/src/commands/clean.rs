// orderly/src/commands/clean.rs
//
// USE CASE: Clean build artifacts.

use std::path::PathBuf;

use orderly_core::application::clean_project;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    println!("🧹 Cleaning build artifacts...");
    let removed = clean_project(&project_dir)?;

    if removed.is_empty() {
        println!("   Nothing to remove.");
    }
    for path in removed {
        println!("   🗑️  Artifact removed: {}", path.display());
    }
    Ok(())
}
