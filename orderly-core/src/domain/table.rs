// orderly-core/src/domain/table.rs

use serde::Serialize;

use crate::domain::dataset::{ParseFailure, Row};
use crate::domain::quality::{MixedTypeColumn, SummaryEntry, TaggedRow};
use crate::domain::schema::Column;

/// A record that renders as one line of a named table.
pub trait TabularRecord {
    fn headers() -> Vec<String>;
    fn cells(&self) -> Vec<String>;
}

/// Rendered table handed to an artifact sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_records<'a, R>(name: impl Into<String>, records: impl IntoIterator<Item = &'a R>) -> Self
    where
        R: TabularRecord + 'a,
    {
        Self {
            name: name.into(),
            headers: R::headers(),
            rows: records.into_iter().map(|r| r.cells()).collect(),
        }
    }

    /// Rows prefixed with the title of the rule that flagged them.
    pub fn tagged(name: impl Into<String>, tag_header: &str, rows: &[TaggedRow]) -> Self {
        let mut headers = vec![tag_header.to_string()];
        headers.extend(Row::headers());
        Self {
            name: name.into(),
            headers,
            rows: rows
                .iter()
                .map(|tagged| {
                    let mut cells = vec![tagged.rule.title()];
                    cells.extend(tagged.row.cells());
                    cells
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, by header.
    pub fn column(&self, header: &str) -> Option<Vec<&str>> {
        let idx = self.headers.iter().position(|h| h == header)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.get(idx).map_or("", String::as_str))
                .collect(),
        )
    }
}

impl TabularRecord for Row {
    fn headers() -> Vec<String> {
        Column::ALL.iter().map(|c| c.name().to_string()).collect()
    }

    fn cells(&self) -> Vec<String> {
        Column::ALL.iter().map(|c| self.render(*c)).collect()
    }
}

impl TabularRecord for SummaryEntry {
    fn headers() -> Vec<String> {
        [
            "Inconsistency Type",
            "Description",
            "Suggestion to Handle",
            "Distinct Count of Row ID",
        ]
        .map(String::from)
        .to_vec()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.inconsistency_type.clone(),
            self.description.to_string(),
            self.suggestion.to_string(),
            self.flagged_count.to_string(),
        ]
    }
}

impl TabularRecord for MixedTypeColumn {
    fn headers() -> Vec<String> {
        vec!["Column".to_string(), "Types".to_string()]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.column.name().to_string(), self.types.join(", ")]
    }
}

impl TabularRecord for ParseFailure {
    fn headers() -> Vec<String> {
        ["Position", "Column", "Expected Type", "Raw Value"]
            .map(String::from)
            .to_vec()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.position.to_string(),
            self.column.name().to_string(),
            self.expected.type_name().to_string(),
            self.raw.clone(),
        ]
    }
}
