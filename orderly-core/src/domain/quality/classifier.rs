// orderly-core/src/domain/quality/classifier.rs

use serde::Serialize;

use crate::domain::dataset::{Dataset, Row};
use crate::domain::quality::catalog::{Disposition, Rule, RuleScope};
use crate::domain::quality::report::{IssueReport, MixedTypeColumn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub rule: Rule,
    pub inconsistency_type: String,
    pub description: &'static str,
    pub suggestion: &'static str,
    pub flagged_count: usize,
}

/// A sample row tagged with the rule that flagged it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedRow {
    pub rule: Rule,
    pub row: Row,
}

/// Human-facing view of an issue report.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// One entry per non-empty rule, catalog order.
    pub summary: Vec<SummaryEntry>,
    /// Up to N sample rows per non-empty row-level rule.
    pub examples: Vec<TaggedRow>,
    /// Rules routed to SME review.
    pub sme_rules: Vec<Rule>,
    /// Every row flagged by an SME rule, once per rule.
    pub quality_report: Vec<TaggedRow>,
    /// Column-level findings, present when `mixed_data_types` is SME-reviewed.
    pub sme_mixed_types: Vec<MixedTypeColumn>,
}

impl Classification {
    pub fn requires_review(&self) -> bool {
        !self.quality_report.is_empty() || !self.sme_mixed_types.is_empty()
    }
}

pub struct IssueClassifier {
    sme_rules: Vec<Rule>,
    examples_per_rule: usize,
}

/// Routes every rule whose disposition is SME review, two examples per rule.
impl Default for IssueClassifier {
    fn default() -> Self {
        let sme_rules = Rule::CATALOG
            .into_iter()
            .filter(|r| r.disposition() == Disposition::SmeReview)
            .collect();
        Self::new(sme_rules, 2)
    }
}

impl IssueClassifier {
    pub fn new(sme_rules: Vec<Rule>, examples_per_rule: usize) -> Self {
        Self {
            sme_rules,
            examples_per_rule,
        }
    }

    /// `dataset` must be the dataset the report was evaluated on.
    pub fn classify(&self, report: &IssueReport, dataset: &Dataset) -> Classification {
        let summary = Rule::CATALOG
            .into_iter()
            .filter(|r| !report.is_empty_for(*r))
            .map(|rule| SummaryEntry {
                rule,
                inconsistency_type: rule.title(),
                description: rule.description(),
                suggestion: rule.suggestion(),
                flagged_count: report.count(rule),
            })
            .collect();

        let examples = Rule::CATALOG
            .into_iter()
            .filter(|r| r.scope() != RuleScope::Column)
            .flat_map(|rule| {
                tagged_rows(report, dataset, rule)
                    .take(self.examples_per_rule)
                    .collect::<Vec<_>>()
            })
            .collect();

        let quality_report = self
            .sme_rules
            .iter()
            .filter(|r| r.scope() != RuleScope::Column)
            .flat_map(|rule| tagged_rows(report, dataset, *rule).collect::<Vec<_>>())
            .collect();

        let sme_mixed_types = if self.sme_rules.contains(&Rule::MixedDataTypes) {
            report.mixed_types().to_vec()
        } else {
            Vec::new()
        };

        Classification {
            summary,
            examples,
            sme_rules: self.sme_rules.clone(),
            quality_report,
            sme_mixed_types,
        }
    }
}

fn tagged_rows<'a>(
    report: &'a IssueReport,
    dataset: &'a Dataset,
    rule: Rule,
) -> impl Iterator<Item = TaggedRow> + 'a {
    report
        .flagged_rows(rule)
        .filter_map(move |position| dataset.row_at(position))
        .map(move |row| TaggedRow {
            rule,
            row: row.clone(),
        })
}
