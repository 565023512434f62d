// orderly-core/src/domain/schema.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

/// One column of the order extract.
///
/// Declaration order is the canonical column order of the extract and of
/// every rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    RowId,
    OrderId,
    OrderDate,
    ShipDate,
    ShipMode,
    CustomerId,
    CustomerName,
    Segment,
    ProductId,
    Category,
    SubCategory,
    ProductName,
    Sales,
    Quantity,
    Discount,
    Profit,
    Country,
    City,
    State,
    PostalCode,
    Region,
}

impl Column {
    pub const ALL: [Column; 21] = [
        Column::RowId,
        Column::OrderId,
        Column::OrderDate,
        Column::ShipDate,
        Column::ShipMode,
        Column::CustomerId,
        Column::CustomerName,
        Column::Segment,
        Column::ProductId,
        Column::Category,
        Column::SubCategory,
        Column::ProductName,
        Column::Sales,
        Column::Quantity,
        Column::Discount,
        Column::Profit,
        Column::Country,
        Column::City,
        Column::State,
        Column::PostalCode,
        Column::Region,
    ];

    /// Header name as it appears in the extract.
    pub fn name(self) -> &'static str {
        match self {
            Column::RowId => "Row ID",
            Column::OrderId => "Order ID",
            Column::OrderDate => "Order Date",
            Column::ShipDate => "Ship Date",
            Column::ShipMode => "Ship Mode",
            Column::CustomerId => "Customer ID",
            Column::CustomerName => "Customer Name",
            Column::Segment => "Segment",
            Column::ProductId => "Product ID",
            Column::Category => "Category",
            Column::SubCategory => "Sub-Category",
            Column::ProductName => "Product Name",
            Column::Sales => "Sales",
            Column::Quantity => "Quantity",
            Column::Discount => "Discount",
            Column::Profit => "Profit",
            Column::Country => "Country",
            Column::City => "City",
            Column::State => "State",
            Column::PostalCode => "Postal Code",
            Column::Region => "Region",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::RowId | Column::Quantity => ColumnKind::Integer,
            Column::Sales | Column::Discount | Column::Profit => ColumnKind::Float,
            Column::OrderDate | Column::ShipDate => ColumnKind::Date,
            _ => ColumnKind::Text,
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        let cleaned = normalize_header(header);
        Column::ALL.into_iter().find(|c| c.name() == cleaned)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared runtime type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Date,
    Text,
}

impl ColumnKind {
    /// Short type name used in mixed-type reports.
    pub fn type_name(self) -> &'static str {
        match self {
            ColumnKind::Integer => "int",
            ColumnKind::Float => "float",
            ColumnKind::Date => "date",
            ColumnKind::Text => "str",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub column: Column,
    pub kind: ColumnKind,
}

/// The column contract of the order extract. Every column is required
/// and none is nullable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSchema {
    columns: Vec<ColumnSpec>,
}

impl Default for RowSchema {
    fn default() -> Self {
        Self::orders()
    }
}

impl RowSchema {
    /// Canonical schema in column order.
    pub fn orders() -> Self {
        Self {
            columns: Column::ALL
                .into_iter()
                .map(|column| ColumnSpec {
                    column,
                    kind: column.kind(),
                })
                .collect(),
        }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Maps a raw header row onto the schema.
    ///
    /// Headers are trimmed and stripped of a UTF-8 BOM before matching.
    /// Unknown headers are kept aside in `HeaderMap::ignored`.
    pub fn resolve_headers<S: AsRef<str>>(&self, headers: &[S]) -> Result<HeaderMap, DomainError> {
        let cleaned: Vec<&str> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();

        let mut indices = Vec::with_capacity(self.columns.len());
        for spec in &self.columns {
            let mut hits = cleaned
                .iter()
                .enumerate()
                .filter(|(_, h)| **h == spec.column.name());

            let Some((idx, _)) = hits.next() else {
                return Err(DomainError::SchemaError {
                    column: spec.column.name().to_string(),
                    reason: "required column absent from header".to_string(),
                });
            };
            if hits.next().is_some() {
                return Err(DomainError::SchemaError {
                    column: spec.column.name().to_string(),
                    reason: "column appears more than once in header".to_string(),
                });
            }
            indices.push((spec.column, idx));
        }

        let ignored = cleaned
            .iter()
            .filter(|h| Column::from_header(h).is_none())
            .map(|h| h.to_string())
            .collect();

        Ok(HeaderMap { indices, ignored })
    }
}

/// Position of each schema column inside a physical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    indices: Vec<(Column, usize)>,
    pub ignored: Vec<String>,
}

impl HeaderMap {
    pub fn index_of(&self, column: Column) -> Option<usize> {
        self.indices
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, idx)| *idx)
    }
}

fn normalize_header(raw: &str) -> &str {
    raw.trim().trim_start_matches('\u{feff}').trim()
}
