// orderly-core/src/domain/project/configuration.rs

use chrono::format::{Item, StrftimeItems};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::domain::dataset::RowParser;
use crate::domain::error::DomainError;
use crate::domain::quality::{ExclusionFilter, IssueClassifier, Rule, RuleScope};

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,
    pub version: String,

    /// CSV file, or directory of monthly extracts.
    #[serde(default = "default_input")]
    pub input: String,

    #[validate(custom(function = "validate_delimiter"))]
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Character encoding of the extracts, as a WHATWG label (`utf-8`, `latin1`, ...).
    #[validate(custom(function = "validate_encoding"))]
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Tried in order for every date cell.
    #[validate(custom(function = "validate_date_formats"))]
    #[serde(rename = "date-formats", default = "default_date_formats")]
    pub date_formats: Vec<String>,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    #[validate(nested)]
    #[serde(default)]
    pub quality: QualityConfig,

    #[validate(nested)]
    #[serde(default)]
    pub mart: MartConfig,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct QualityConfig {
    #[serde(rename = "sme-rules", default = "default_sme_rules")]
    pub sme_rules: Vec<Rule>,

    #[validate(range(min = 1, max = 100, message = "examples-per-rule must be within 1..=100"))]
    #[serde(rename = "examples-per-rule", default = "default_examples_per_rule")]
    pub examples_per_rule: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            sme_rules: default_sme_rules(),
            examples_per_rule: default_examples_per_rule(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct MartConfig {
    #[validate(custom(function = "validate_exclusion_rules"))]
    #[serde(rename = "exclusion-rules", default = "default_exclusion_rules")]
    pub exclusion_rules: Vec<Rule>,
}

impl Default for MartConfig {
    fn default() -> Self {
        Self {
            exclusion_rules: default_exclusion_rules(),
        }
    }
}

impl ProjectConfig {
    pub fn row_parser(&self) -> RowParser {
        RowParser::new(self.date_formats.clone())
    }

    pub fn classifier(&self) -> IssueClassifier {
        IssueClassifier::new(self.quality.sme_rules.clone(), self.quality.examples_per_rule)
    }

    pub fn exclusion_filter(&self) -> Result<ExclusionFilter, DomainError> {
        ExclusionFilter::new(self.mart.exclusion_rules.clone())
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, DomainError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                DomainError::ConfigurationError(format!(
                    "Delimiter '{}' is not a single ASCII character",
                    self.delimiter
                ))
            })
    }

    pub fn source_encoding(&self) -> Result<&'static Encoding, DomainError> {
        Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            DomainError::ConfigurationError(format!("Unknown encoding '{}'", self.encoding))
        })
    }
}

fn validate_delimiter(delimiter: &char) -> Result<(), ValidationError> {
    if delimiter.is_ascii()
        && !delimiter.is_ascii_alphanumeric()
        && !matches!(delimiter, '"' | '\n' | '\r')
    {
        return Ok(());
    }
    Err(ValidationError::new("delimiter")
        .with_message(Cow::Owned(format!("'{}' cannot be used as a delimiter", delimiter))))
}

fn validate_encoding(label: &str) -> Result<(), ValidationError> {
    if Encoding::for_label(label.trim().as_bytes()).is_some() {
        return Ok(());
    }
    Err(ValidationError::new("encoding")
        .with_message(Cow::Owned(format!("Unknown encoding '{}'", label))))
}

fn validate_date_formats(formats: &[String]) -> Result<(), ValidationError> {
    if formats.is_empty() {
        return Err(ValidationError::new("date_formats")
            .with_message(Cow::Borrowed("At least one date format is required")));
    }
    for format in formats {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(ValidationError::new("date_formats")
                .with_message(Cow::Owned(format!("Invalid date format '{}'", format))));
        }
    }
    Ok(())
}

fn validate_exclusion_rules(rules: &[Rule]) -> Result<(), ValidationError> {
    match rules.iter().find(|r| r.scope() == RuleScope::Column) {
        Some(rule) => Err(ValidationError::new("exclusion_rules").with_message(Cow::Owned(
            format!("'{}' flags columns and cannot exclude rows", rule),
        ))),
        None => Ok(()),
    }
}

fn default_input() -> String {
    "data".to_string()
}
fn default_delimiter() -> char {
    ','
}
fn default_encoding() -> String {
    "utf-8".to_string()
}
fn default_date_formats() -> Vec<String> {
    vec!["%Y-%m-%d".to_string()]
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string()]
}
fn default_sme_rules() -> Vec<Rule> {
    Rule::SME_REVIEW.to_vec()
}
fn default_examples_per_rule() -> usize {
    2
}
fn default_exclusion_rules() -> Vec<Rule> {
    Rule::MART_EXCLUSION.to_vec()
}
