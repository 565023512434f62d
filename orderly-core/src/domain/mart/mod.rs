// orderly-core/src/domain/mart/mod.rs

pub mod audit;
pub mod dimension;
pub mod fact;
pub mod star;

// Re-exports
pub use audit::{AuditEntry, MartAuditor};
pub use dimension::{Dimension, DimensionBuilder, DimensionRecord, DimensionRow, SurrogateKey};
pub use fact::{Fact, FactBuilder, FactRecord};
pub use star::{CustomerRecord, DataMart, FactOrder, GeographyRecord, ProductRecord};
