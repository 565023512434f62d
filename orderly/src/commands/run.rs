// orderly/src/commands/run.rs
//
// USE CASE: Run the full pipeline.

use std::path::PathBuf;
use std::time::Instant;

use orderly_core::application::run_pipeline;

use super::{Workspace, print_quality_summary, styled_table};

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let start = Instant::now();
    let workspace = Workspace::open(&project_dir)?;

    println!("🚀 Running pipeline...");
    let result = run_pipeline(&workspace.source, &workspace.sink, &workspace.config)?;

    print_quality_summary(&result);

    if let (Some(excluded), Some(clean)) = (result.excluded_rows, result.clean_rows) {
        println!(
            "\n🧱 Data mart: {} row(s) excluded, {} row(s) loaded",
            excluded, clean
        );
    }
    let mut audit = styled_table();
    audit.set_header(vec![
        "Table",
        "Rows",
        "Distinct Primary Key",
        "Distinct Row ID",
    ]);
    for entry in &result.mart {
        audit.add_row(vec![
            entry.table.clone(),
            entry.rows.to_string(),
            entry.distinct_primary_key.to_string(),
            entry
                .distinct_row_id
                .map(|c| c.to_string())
                .unwrap_or_default(),
        ]);
    }
    println!("{audit}");

    println!(
        "\n✨ SUCCESS! Pipeline finished in {:.2?} (artifacts in {})",
        start.elapsed(),
        workspace.sink.root().display()
    );
    Ok(())
}
