// orderly-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(orderly::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CSV ---
    #[error("CSV Error: {0}")]
    #[diagnostic(
        code(orderly::infra::csv),
        help("Check the delimiter and that every record has as many fields as the header.")
    )]
    Csv(#[from] csv::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(orderly::infra::yaml),
        help("Check your YAML syntax (indentation, types, rule names).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(orderly::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(orderly::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(orderly::infra::config_missing))]
    ConfigNotFound(String),

    // --- SOURCES ---
    #[error("No order extract found at '{0}'")]
    #[diagnostic(
        code(orderly::infra::source_missing),
        help("Point `input` at a CSV file or at a directory containing *.csv extracts.")
    )]
    SourceNotFound(String),
}
