// orderly/src/commands/mod.rs

pub mod check;
pub mod clean;
pub mod inspect;
pub mod run;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::{Path, PathBuf};

use anyhow::Context;
use orderly_core::application::RunResult;
use orderly_core::domain::project::ProjectConfig;
use orderly_core::infrastructure::adapters::{CsvArtifactSink, CsvDatasetSource};
use orderly_core::infrastructure::config::load_project_config;

/// Everything a pipeline command needs, wired from the project directory.
pub(crate) struct Workspace {
    pub config: ProjectConfig,
    pub source: CsvDatasetSource,
    pub sink: CsvArtifactSink,
}

impl Workspace {
    pub fn open(project_dir: &Path) -> anyhow::Result<Self> {
        println!("⚙️  Loading configuration...");
        let config = load_project_config(project_dir).with_context(|| {
            format!(
                "Failed to load project configuration from {:?}",
                project_dir
            )
        })?;
        println!("   Project: {} (v{})", config.name, config.version);

        let source = CsvDatasetSource::from_config(project_dir, &config)?;
        println!("📥 {} extract(s) selected", source.files().len());
        for file in source.files() {
            println!("   ➜ {}", display_relative(file, project_dir));
        }

        let sink = CsvArtifactSink::new(project_dir.join(&config.target_path));
        Ok(Self {
            config,
            source,
            sink,
        })
    }
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .map(PathBuf::from)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

pub(crate) fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Rule counts of a run, non-empty rules only.
pub(crate) fn print_quality_summary(result: &RunResult) {
    println!(
        "\n🩺 Quality: {} row(s) analysed, {} flagged, {} parse failure(s)",
        result.total_rows, result.flagged_rows, result.parse_failures
    );

    let mut table = styled_table();
    table.set_header(vec!["Rule", "Flagged"]);
    for (rule, count) in result.flagged.iter().filter(|(_, c)| **c > 0) {
        table.add_row(vec![rule.clone(), count.to_string()]);
    }
    if table.row_count() > 0 {
        println!("{table}");
    }

    if result.requires_review {
        println!("   ⚠️  Findings routed to SME review: see quality/quality_report.csv");
    } else {
        println!("   ✅ Nothing requires SME review.");
    }
}
