// orderly-core/src/domain/quality/mod.rs

pub mod catalog;
pub mod classifier;
pub mod engine;
pub mod exclusion;
pub mod report;

// Re-exports
pub use catalog::{Disposition, Rule, RuleScope};
pub use classifier::{Classification, IssueClassifier, SummaryEntry, TaggedRow};
pub use engine::RuleEngine;
pub use exclusion::{Exclusion, ExclusionFilter};
pub use report::{IssueReport, MixedTypeColumn};
