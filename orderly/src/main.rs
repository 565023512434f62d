// orderly/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use orderly_core::OrderlyError;

fn main() -> ExitCode {
    // RUST_LOG=debug orderly run ... to see every stage
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run { project_dir } => commands::run::execute(project_dir),
        Commands::Check { project_dir } => commands::check::execute(project_dir),
        Commands::Inspect {
            project_dir,
            table,
            limit,
        } => commands::inspect::execute(project_dir, table, limit),
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(e);
            ExitCode::FAILURE
        }
    }
}

/// Domain and infrastructure errors carry diagnostic codes; render them with miette.
fn report(error: anyhow::Error) {
    tracing::error!(error = %error, "Command failed");
    match error.downcast::<OrderlyError>() {
        Ok(OrderlyError::Domain(e)) => eprintln!("\n💥 {:?}", miette::Report::new(e)),
        Ok(OrderlyError::Infrastructure(e)) => eprintln!("\n💥 {:?}", miette::Report::new(e)),
        Ok(other) => eprintln!("\n💥 {}", other),
        Err(e) => {
            eprintln!("\n💥 {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("   caused by: {}", cause);
            }
        }
    }
}
