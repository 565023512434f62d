// orderly-core/src/domain/quality/catalog.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// The closed catalog of data-quality rules.
///
/// Declaration order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    NegativeQuantity,
    NegativeSales,
    NegativeProfit,
    InvalidDiscount,
    InvalidDates,
    ExactDuplicates,
    DuplicateOrderLines,
    MissingValues,
    MixedDataTypes,
}

/// What a rule evaluates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Predicate over a single row.
    Row,
    /// Predicate over a row in the context of the whole dataset.
    Dataset,
    /// Flags columns, not rows.
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Resolution needs a subject-matter expert.
    SmeReview,
    /// Handling is mechanical.
    AutoExclude,
}

impl Rule {
    pub const CATALOG: [Rule; 9] = [
        Rule::NegativeQuantity,
        Rule::NegativeSales,
        Rule::NegativeProfit,
        Rule::InvalidDiscount,
        Rule::InvalidDates,
        Rule::ExactDuplicates,
        Rule::DuplicateOrderLines,
        Rule::MissingValues,
        Rule::MixedDataTypes,
    ];

    pub const SME_REVIEW: [Rule; 7] = [
        Rule::NegativeQuantity,
        Rule::NegativeSales,
        Rule::NegativeProfit,
        Rule::InvalidDates,
        Rule::DuplicateOrderLines,
        Rule::MixedDataTypes,
        Rule::MissingValues,
    ];

    /// Rows flagged by these rules never reach the data mart.
    pub const MART_EXCLUSION: [Rule; 4] = [
        Rule::NegativeQuantity,
        Rule::NegativeProfit,
        Rule::DuplicateOrderLines,
        Rule::MissingValues,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rule::NegativeQuantity => "negative_quantity",
            Rule::NegativeSales => "negative_sales",
            Rule::NegativeProfit => "negative_profit",
            Rule::InvalidDiscount => "invalid_discount",
            Rule::InvalidDates => "invalid_dates",
            Rule::ExactDuplicates => "exact_duplicates",
            Rule::DuplicateOrderLines => "duplicate_order_lines",
            Rule::MissingValues => "missing_values",
            Rule::MixedDataTypes => "mixed_data_types",
        }
    }

    /// "negative_quantity" -> "Negative Quantity"
    pub fn title(self) -> String {
        self.name()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn description(self) -> &'static str {
        match self {
            Rule::NegativeQuantity => "Quantity is less than 0, which is invalid for an order",
            Rule::NegativeSales => {
                "Sales values are negative, which may indicate refunds or incorrect data"
            }
            Rule::NegativeProfit => {
                "Profit values are negative, which may be real losses or data errors"
            }
            Rule::InvalidDiscount => "Discount values are outside the range 0-1",
            Rule::InvalidDates => "Ship Date occurs before Order Date",
            Rule::ExactDuplicates => "Entire row is duplicated",
            Rule::DuplicateOrderLines => "Same Order ID and Product ID are repeated",
            Rule::MissingValues => "One or more required fields are empty",
            Rule::MixedDataTypes => "A column contains mixed data types (e.g., numbers and text)",
        }
    }

    pub fn suggestion(self) -> &'static str {
        match self {
            Rule::NegativeQuantity => "Needs SME review; could be data entry issue",
            Rule::NegativeSales => "Needs SME clarification (refund vs. error)",
            Rule::NegativeProfit => "Keep if true losses, else SME review",
            Rule::InvalidDiscount => "Clamp values between 0 and 1",
            Rule::InvalidDates => "Flag rows; SME clarification required",
            Rule::ExactDuplicates => "Remove exact duplicate rows",
            Rule::DuplicateOrderLines => "Needs SME review (could be legit multiple lines)",
            Rule::MissingValues => "Impute if possible, otherwise flag",
            Rule::MixedDataTypes => "Normalize to consistent type",
        }
    }

    pub fn scope(self) -> RuleScope {
        match self {
            Rule::ExactDuplicates | Rule::DuplicateOrderLines => RuleScope::Dataset,
            Rule::MixedDataTypes => RuleScope::Column,
            _ => RuleScope::Row,
        }
    }

    pub fn disposition(self) -> Disposition {
        if Rule::SME_REVIEW.contains(&self) {
            Disposition::SmeReview
        } else {
            Disposition::AutoExclude
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Rule::CATALOG
            .into_iter()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| DomainError::ConfigurationError(format!("Unknown rule '{}'", s)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert_eq!(Rule::NegativeQuantity.title(), "Negative Quantity");
        assert_eq!(Rule::DuplicateOrderLines.title(), "Duplicate Order Lines");
        assert_eq!(Rule::MixedDataTypes.title(), "Mixed Data Types");
    }

    #[test]
    fn test_dispositions() {
        assert_eq!(Rule::ExactDuplicates.disposition(), Disposition::AutoExclude);
        assert_eq!(Rule::InvalidDiscount.disposition(), Disposition::AutoExclude);
        let sme: Vec<Rule> = Rule::CATALOG
            .into_iter()
            .filter(|r| r.disposition() == Disposition::SmeReview)
            .collect();
        assert_eq!(sme.len(), 7);
    }

    #[test]
    fn test_mart_exclusion_is_narrower_than_sme_review() {
        assert!(
            Rule::MART_EXCLUSION
                .iter()
                .all(|r| Rule::SME_REVIEW.contains(r))
        );
        assert!(!Rule::MART_EXCLUSION.contains(&Rule::InvalidDates));
        assert!(!Rule::MART_EXCLUSION.contains(&Rule::MixedDataTypes));
    }

    #[test]
    fn test_parse_rule_names() {
        assert_eq!(
            "duplicate_order_lines".parse::<Rule>().unwrap(),
            Rule::DuplicateOrderLines
        );
        assert!("negative_discount".parse::<Rule>().is_err());
        let parsed: Rule = serde_yaml::from_str("missing_values").unwrap();
        assert_eq!(parsed, Rule::MissingValues);
    }
}
