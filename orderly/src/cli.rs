// orderly/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "orderly")]
#[command(about = "Data quality rules and star-schema marts for order extracts", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the full pipeline (Extracts -> Quality -> Data Mart)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🩺 Runs the quality analysis only (no data mart)
    Check {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔍 Prints a produced table (mart, quality report or issue listing)
    Inspect {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Table name (ex: "DimGeography", "summary", "negative_quantity")
        #[arg(long, short)]
        table: String,

        /// Number of rows to display
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// 🧹 Cleans build artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}
