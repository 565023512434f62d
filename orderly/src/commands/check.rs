// orderly/src/commands/check.rs
//
// USE CASE: Quality analysis without building the data mart.

use std::path::PathBuf;

use orderly_core::application::run_quality_check;

use super::{Workspace, print_quality_summary};

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let workspace = Workspace::open(&project_dir)?;

    println!("🩺 Checking data quality...");
    let result = run_quality_check(&workspace.source, &workspace.sink, &workspace.config)?;
    print_quality_summary(&result);

    println!(
        "\n📄 Quality artifacts written to {}",
        workspace.sink.root().join("quality").display()
    );
    Ok(())
}
