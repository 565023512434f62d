// orderly-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Schema Error on column '{column}': {reason}")]
    #[diagnostic(
        code(orderly::domain::schema),
        help("The input extract must carry every column of the order schema.")
    )]
    SchemaError { column: String, reason: String },

    #[error(
        "Integrity violation: {count} row(s) of '{table}' do not resolve to '{dimension}' (positions: {positions:?})",
        count = .positions.len()
    )]
    #[diagnostic(
        code(orderly::domain::integrity),
        help("Fact and dimension tables must be built from the same clean dataset.")
    )]
    IntegrityViolation {
        table: String,
        dimension: String,
        positions: Vec<usize>,
    },

    #[error("Dimension '{dimension}' holds the same attribute tuple under several keys: {surrogate_keys:?}")]
    #[diagnostic(
        code(orderly::domain::fan_out),
        help("Joining on this dimension would duplicate fact rows.")
    )]
    AmbiguousDimensionKey {
        dimension: String,
        surrogate_keys: Vec<u32>,
    },

    #[error("Dimension '{0}' carries no surrogate key and cannot be joined on one")]
    #[diagnostic(code(orderly::domain::surrogate_key))]
    SurrogateKeyMissing(String),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(orderly::domain::configuration))]
    ConfigurationError(String),
}
