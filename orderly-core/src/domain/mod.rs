pub mod dataset;
pub mod error;
pub mod mart;
pub mod project;
pub mod quality;
pub mod schema;
pub mod table;

#[cfg(test)]
pub(crate) mod fixtures;

// Handy re-exports to simplify imports elsewhere
pub use dataset::{Dataset, Field, ParseFailure, Row, RowParser};
pub use error::DomainError;
pub use schema::{Column, ColumnKind, RowSchema};
pub use table::{Table, TabularRecord};
