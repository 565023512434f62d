// orderly-core/src/domain/quality/exclusion.rs

use std::collections::BTreeSet;
use tracing::info;

use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::quality::catalog::{Rule, RuleScope};
use crate::domain::quality::report::IssueReport;

/// The clean dataset plus what was taken out of it.
#[derive(Debug, Clone)]
pub struct Exclusion {
    pub clean: Dataset,
    pub excluded: BTreeSet<usize>,
    pub rules: Vec<Rule>,
}

impl Exclusion {
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }
}

/// Removes every row flagged by a configured subset of row-level rules.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    rules: Vec<Rule>,
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self {
            rules: Rule::MART_EXCLUSION.to_vec(),
        }
    }
}

impl ExclusionFilter {
    /// Column-scoped rules flag no rows and are rejected.
    pub fn new(rules: Vec<Rule>) -> Result<Self, DomainError> {
        if let Some(rule) = rules.iter().find(|r| r.scope() == RuleScope::Column) {
            return Err(DomainError::ConfigurationError(format!(
                "Rule '{}' flags columns and cannot exclude rows",
                rule
            )));
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// `report` must come from evaluating `dataset`.
    pub fn exclude(&self, dataset: &Dataset, report: &IssueReport) -> Exclusion {
        let excluded = report.union(&self.rules);
        let clean = dataset.without_positions(&excluded);
        info!(
            excluded = excluded.len(),
            remaining = clean.len(),
            "Excluded flagged rows"
        );
        Exclusion {
            clean,
            excluded,
            rules: self.rules.clone(),
        }
    }
}
