// orderly-core/src/domain/quality/engine.rs

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use tracing::{debug, instrument};

use crate::domain::dataset::{Dataset, Row};
use crate::domain::quality::catalog::Rule;
use crate::domain::quality::report::{IssueReport, MixedTypeColumn};
use crate::domain::schema::Column;

/// Evaluates the rule catalog over a dataset.
///
/// Every rule runs independently over the full dataset; a row can be
/// flagged by several rules.
pub struct RuleEngine;

impl RuleEngine {
    #[instrument(skip_all, fields(rows = dataset.len()))]
    pub fn evaluate(dataset: &Dataset) -> IssueReport {
        let mut report = IssueReport::new(dataset.len());

        for row in dataset.rows() {
            for rule in [
                Rule::NegativeQuantity,
                Rule::NegativeSales,
                Rule::NegativeProfit,
                Rule::InvalidDiscount,
                Rule::InvalidDates,
                Rule::MissingValues,
            ] {
                if Self::row_violates(rule, row) {
                    report.flag(rule, row.position);
                }
            }
        }

        report.flag_all(
            Rule::ExactDuplicates,
            duplicate_groups(dataset, |row| row.fingerprint()),
        );
        report.flag_all(
            Rule::DuplicateOrderLines,
            duplicate_groups(dataset, |row| (&row.order_id, &row.product_id)),
        );
        report.set_mixed_types(mixed_type_columns(dataset));

        for rule in Rule::CATALOG {
            debug!(rule = rule.name(), flagged = report.count(rule), "Rule evaluated");
        }
        report
    }

    /// Row-scoped predicates. Dataset- and column-scoped rules never match here.
    pub fn row_violates(rule: Rule, row: &Row) -> bool {
        match rule {
            Rule::NegativeQuantity => row.quantity.value().is_some_and(|q| *q < 0),
            Rule::NegativeSales => row.sales.value().is_some_and(|s| *s < 0.0),
            Rule::NegativeProfit => row.profit.value().is_some_and(|p| *p < 0.0),
            Rule::InvalidDiscount => row
                .discount
                .value()
                .is_some_and(|d| *d < 0.0 || *d > 1.0),
            // Unparseable dates are non-comparable, not violations
            Rule::InvalidDates => match (row.order_date.value(), row.ship_date.value()) {
                (Some(ordered), Some(shipped)) => shipped < ordered,
                _ => false,
            },
            Rule::MissingValues => row.has_missing(),
            Rule::ExactDuplicates | Rule::DuplicateOrderLines | Rule::MixedDataTypes => false,
        }
    }
}

/// Positions of every row whose key is shared by at least one other row.
/// All members of a group are returned, never just the extras.
fn duplicate_groups<'a, K, F>(dataset: &'a Dataset, key: F) -> BTreeSet<usize>
where
    K: Hash + Eq,
    F: Fn(&'a Row) -> K,
{
    let mut groups: HashMap<K, Vec<usize>> = HashMap::new();
    for row in dataset.rows() {
        groups.entry(key(row)).or_default().push(row.position);
    }
    groups
        .into_values()
        .filter(|members| members.len() > 1)
        .flatten()
        .collect()
}

fn mixed_type_columns(dataset: &Dataset) -> Vec<MixedTypeColumn> {
    Column::ALL
        .into_iter()
        .filter_map(|column| {
            let mut types: Vec<&'static str> = Vec::new();
            for row in dataset.rows() {
                if let Some(name) = row.cell(column).type_name()
                    && !types.contains(&name)
                {
                    types.push(name);
                }
            }
            (types.len() > 1).then_some(MixedTypeColumn { column, types })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::fixtures::dataset;

    fn flagged(report: &IssueReport, rule: Rule) -> Vec<usize> {
        report.flagged_rows(rule).collect()
    }

    #[test]
    fn test_clean_rows_are_unflagged() {
        let ds = dataset(&[
            &[(Column::RowId, "1"), (Column::ProductId, "P1")],
            &[(Column::RowId, "2"), (Column::ProductId, "P2")],
        ]);
        let report = RuleEngine::evaluate(&ds);
        assert_eq!(report.flagged_row_count(), 0);
        assert!(report.mixed_types().is_empty());
    }

    #[test]
    fn test_numeric_rules() {
        let ds = dataset(&[
            &[(Column::RowId, "1"), (Column::Quantity, "-5")],
            &[(Column::RowId, "2"), (Column::Sales, "-1.5"), (Column::ProductId, "P2")],
            &[(Column::RowId, "3"), (Column::Profit, "-0.01"), (Column::ProductId, "P3")],
            &[(Column::RowId, "4"), (Column::Discount, "1.2"), (Column::ProductId, "P4")],
            &[(Column::RowId, "5"), (Column::Discount, "-0.1"), (Column::ProductId, "P5")],
            &[(Column::RowId, "6"), (Column::Discount, "1"), (Column::ProductId, "P6")],
        ]);
        let report = RuleEngine::evaluate(&ds);
        assert_eq!(flagged(&report, Rule::NegativeQuantity), vec![0]);
        assert_eq!(flagged(&report, Rule::NegativeSales), vec![1]);
        assert_eq!(flagged(&report, Rule::NegativeProfit), vec![2]);
        assert_eq!(flagged(&report, Rule::InvalidDiscount), vec![3, 4]);
    }

    #[test]
    fn test_invalid_dates_skip_unparseable_values() {
        let ds = dataset(&[
            &[
                (Column::RowId, "1"),
                (Column::OrderDate, "2021-03-10"),
                (Column::ShipDate, "2021-03-01"),
            ],
            &[
                (Column::RowId, "2"),
                (Column::ProductId, "P2"),
                (Column::ShipDate, "not a date"),
            ],
            &[(Column::RowId, "3"), (Column::ProductId, "P3"), (Column::ShipDate, "")],
        ]);
        let report = RuleEngine::evaluate(&ds);
        assert_eq!(flagged(&report, Rule::InvalidDates), vec![0]);
        // an unparseable date is null
        assert_eq!(flagged(&report, Rule::MissingValues), vec![1, 2]);
    }

    #[test]
    fn test_exact_duplicates_flag_every_member() {
        let ds = dataset(&[&[], &[(Column::RowId, "2"), (Column::ProductId, "P2")], &[], &[]]);
        let report = RuleEngine::evaluate(&ds);
        assert_eq!(flagged(&report, Rule::ExactDuplicates), vec![0, 2, 3]);
    }

    #[test]
    fn test_duplicate_order_lines_flag_both_members() {
        let ds = dataset(&[
            &[
                (Column::RowId, "1"),
                (Column::OrderId, "A1"),
                (Column::ProductId, "P1"),
                (Column::Sales, "10"),
            ],
            &[
                (Column::RowId, "2"),
                (Column::OrderId, "A1"),
                (Column::ProductId, "P2"),
            ],
            &[
                (Column::RowId, "3"),
                (Column::OrderId, "a1"),
                (Column::ProductId, "P1"),
                (Column::Sales, "99"),
            ],
        ]);
        let report = RuleEngine::evaluate(&ds);
        assert_eq!(flagged(&report, Rule::DuplicateOrderLines), vec![0, 2]);
        assert!(flagged(&report, Rule::ExactDuplicates).is_empty());
    }

    #[test]
    fn test_no_duplicate_group_contributes_a_single_row() {
        let ds = dataset(&[
            &[(Column::RowId, "1"), (Column::OrderId, "A"), (Column::ProductId, "P1")],
            &[(Column::RowId, "2"), (Column::OrderId, "A"), (Column::ProductId, "P1")],
            &[(Column::RowId, "3"), (Column::OrderId, "B"), (Column::ProductId, "P1")],
            &[(Column::RowId, "4"), (Column::OrderId, "C"), (Column::ProductId, "P9")],
            &[(Column::RowId, "5"), (Column::OrderId, "C"), (Column::ProductId, "P9")],
            &[(Column::RowId, "6"), (Column::OrderId, "C"), (Column::ProductId, "P9")],
        ]);
        let report = RuleEngine::evaluate(&ds);
        assert_eq!(flagged(&report, Rule::DuplicateOrderLines), vec![0, 1, 3, 4, 5]);
    }

    #[test]
    fn test_missing_values_iff_any_field_missing() {
        let ds = dataset(&[
            &[(Column::RowId, "1"), (Column::Region, "")],
            &[(Column::RowId, "2"), (Column::ProductId, "P2")],
            &[(Column::RowId, ""), (Column::ProductId, "P3")],
            &[(Column::RowId, "4"), (Column::ProductId, "P4"), (Column::Sales, "abc")],
        ]);
        let report = RuleEngine::evaluate(&ds);
        for row in ds.rows() {
            assert_eq!(
                report.is_flagged(Rule::MissingValues, row.position),
                row.has_missing()
            );
        }
        assert_eq!(flagged(&report, Rule::MissingValues), vec![0, 2]);
    }

    #[test]
    fn test_mixed_data_types_flag_columns() {
        let ds = dataset(&[
            &[(Column::RowId, "1"), (Column::Sales, "12 EUR")],
            &[(Column::RowId, "2"), (Column::ProductId, "P2")],
        ]);
        let report = RuleEngine::evaluate(&ds);
        assert_eq!(
            report.mixed_types(),
            &[MixedTypeColumn {
                column: Column::Sales,
                types: vec!["str", "float"],
            }]
        );
        assert_eq!(report.count(Rule::MixedDataTypes), 1);
        assert_eq!(report.flagged_rows(Rule::MixedDataTypes).count(), 0);
    }

    #[test]
    fn test_row_can_violate_several_rules() {
        let ds = dataset(&[&[(Column::Quantity, "-1"), (Column::Profit, "-3"), (Column::City, "")]]);
        let report = RuleEngine::evaluate(&ds);
        assert!(report.is_flagged(Rule::NegativeQuantity, 0));
        assert!(report.is_flagged(Rule::NegativeProfit, 0));
        assert!(report.is_flagged(Rule::MissingValues, 0));
        assert_eq!(report.flagged_row_count(), 1);
    }
}
