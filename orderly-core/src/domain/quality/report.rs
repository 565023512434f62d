// orderly-core/src/domain/quality/report.rs

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::quality::catalog::{Rule, RuleScope};
use crate::domain::schema::Column;

/// A column whose non-null values resolve to more than one runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MixedTypeColumn {
    pub column: Column,
    /// Type names in first-seen order.
    pub types: Vec<&'static str>,
}

/// Outcome of one rule-engine pass: the row positions flagged by each rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueReport {
    total_rows: usize,
    flagged: BTreeMap<Rule, BTreeSet<usize>>,
    mixed_types: Vec<MixedTypeColumn>,
}

impl IssueReport {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            flagged: BTreeMap::new(),
            mixed_types: Vec::new(),
        }
    }

    pub fn flag(&mut self, rule: Rule, position: usize) {
        self.flagged.entry(rule).or_default().insert(position);
    }

    pub fn flag_all(&mut self, rule: Rule, positions: impl IntoIterator<Item = usize>) {
        self.flagged.entry(rule).or_default().extend(positions);
    }

    pub fn set_mixed_types(&mut self, columns: Vec<MixedTypeColumn>) {
        self.mixed_types = columns;
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Positions flagged by a row-level rule, in dataset order.
    pub fn flagged_rows(&self, rule: Rule) -> impl Iterator<Item = usize> + '_ {
        self.flagged.get(&rule).into_iter().flatten().copied()
    }

    pub fn is_flagged(&self, rule: Rule, position: usize) -> bool {
        self.flagged
            .get(&rule)
            .is_some_and(|rows| rows.contains(&position))
    }

    pub fn mixed_types(&self) -> &[MixedTypeColumn] {
        &self.mixed_types
    }

    /// Flagged rows, or flagged columns for `mixed_data_types`.
    pub fn count(&self, rule: Rule) -> usize {
        match rule.scope() {
            RuleScope::Column => self.mixed_types.len(),
            _ => self.flagged.get(&rule).map_or(0, BTreeSet::len),
        }
    }

    pub fn is_empty_for(&self, rule: Rule) -> bool {
        self.count(rule) == 0
    }

    /// Union of the rows flagged by any of `rules`.
    pub fn union(&self, rules: &[Rule]) -> BTreeSet<usize> {
        rules
            .iter()
            .filter_map(|r| self.flagged.get(r))
            .flatten()
            .copied()
            .collect()
    }

    /// Rows flagged by at least one rule.
    pub fn flagged_row_count(&self) -> usize {
        self.union(&Rule::CATALOG).len()
    }

    pub fn counts(&self) -> BTreeMap<Rule, usize> {
        Rule::CATALOG.iter().map(|r| (*r, self.count(*r))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_counts() {
        let mut report = IssueReport::new(10);
        report.flag_all(Rule::NegativeQuantity, [1, 4]);
        report.flag_all(Rule::MissingValues, [4, 7]);
        report.set_mixed_types(vec![MixedTypeColumn {
            column: Column::Sales,
            types: vec!["float", "str"],
        }]);

        let union = report.union(&[Rule::NegativeQuantity, Rule::MissingValues]);
        assert_eq!(union.into_iter().collect::<Vec<_>>(), vec![1, 4, 7]);
        assert_eq!(report.count(Rule::MixedDataTypes), 1);
        assert_eq!(report.count(Rule::NegativeSales), 0);
        assert_eq!(report.flagged_row_count(), 3);
        assert!(report.is_flagged(Rule::MissingValues, 7));
        assert!(!report.is_flagged(Rule::NegativeQuantity, 7));
    }
}
