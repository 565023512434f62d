// orderly/src/commands/inspect.rs
//
// USE CASE: Print a produced table (header + sample rows).

use anyhow::{Context, bail};
use std::path::{Path, PathBuf};

use orderly_core::infrastructure::config::load_project_config;

use super::styled_table;

/// Where tables live under the target path, in lookup order.
const TABLE_DIRS: [&str; 3] = ["marts", "quality", "quality/issues"];

pub fn execute(project_dir: PathBuf, table: String, limit: usize) -> anyhow::Result<()> {
    let config = load_project_config(&project_dir)?;
    let target_dir = project_dir.join(&config.target_path);

    let path = locate(&target_dir, &table)?;
    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut output = styled_table();
    output.set_header(reader.headers()?.iter().collect::<Vec<_>>());

    let mut total = 0usize;
    for record in reader.records() {
        let record = record?;
        if total < limit {
            output.add_row(record.iter().collect::<Vec<_>>());
        }
        total += 1;
    }

    println!("\n🔍 Inspecting Table: '{}' ({})", table, path.display());
    println!("{output}");
    println!("   Showing {} of {} row(s)", total.min(limit), total);
    Ok(())
}

fn locate(target_dir: &Path, table: &str) -> anyhow::Result<PathBuf> {
    if table.is_empty() || table.contains(['/', '\\']) || table.contains("..") {
        bail!("Invalid table name '{}'", table);
    }

    let file = format!("{}.csv", table.trim_end_matches(".csv"));
    TABLE_DIRS
        .iter()
        .map(|dir| target_dir.join(dir).join(&file))
        .find(|p| p.is_file())
        .with_context(|| {
            format!(
                "Table '{}' not found under {}\n👉 Have you run 'orderly run'?",
                table,
                target_dir.display()
            )
        })
}
