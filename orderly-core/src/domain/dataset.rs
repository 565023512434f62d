// orderly-core/src/domain/dataset.rs

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::error::DomainError;
use crate::domain::schema::{Column, ColumnKind, RowSchema};

/// Cell texts read as null, whatever the column type.
pub const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A typed field of a row.
///
/// `Malformed` keeps the raw text of a numeric value that is present but
/// does not coerce to the declared type of its column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Field<T> {
    Missing,
    Value(T),
    Malformed(String),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Field::Malformed(_))
    }
}

impl<T: fmt::Display> Field<T> {
    /// Text rendering for tabular output. Missing renders empty.
    pub fn render(&self) -> String {
        match self {
            Field::Missing => String::new(),
            Field::Value(v) => v.to_string(),
            Field::Malformed(raw) => raw.clone(),
        }
    }
}

/// Borrowed, type-erased view of one field.
#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    Missing,
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(&'a str),
    Malformed(&'a str),
}

impl Cell<'_> {
    /// Runtime type of the observed value, `None` when missing.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Cell::Missing => None,
            Cell::Int(_) => Some(ColumnKind::Integer.type_name()),
            Cell::Float(_) => Some(ColumnKind::Float.type_name()),
            Cell::Date(_) => Some(ColumnKind::Date.type_name()),
            Cell::Text(_) | Cell::Malformed(_) => Some(ColumnKind::Text.type_name()),
        }
    }
}

// Floats compare bitwise so that a row fingerprint is byte-exact.
impl PartialEq for Cell<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Missing, Cell::Missing) => true,
            (Cell::Int(a), Cell::Int(b)) => a == b,
            (Cell::Float(a), Cell::Float(b)) => a.to_bits() == b.to_bits(),
            (Cell::Date(a), Cell::Date(b)) => a == b,
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Malformed(a), Cell::Malformed(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell<'_> {}

impl Hash for Cell<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Missing => {}
            Cell::Int(v) => v.hash(state),
            Cell::Float(v) => v.to_bits().hash(state),
            Cell::Date(v) => v.hash(state),
            Cell::Text(v) | Cell::Malformed(v) => v.hash(state),
        }
    }
}

macro_rules! cell {
    ($field:expr, $variant:ident) => {
        match &$field {
            Field::Missing => Cell::Missing,
            Field::Value(v) => Cell::$variant(*v),
            Field::Malformed(raw) => Cell::Malformed(raw.as_str()),
        }
    };
    ($field:expr) => {
        match &$field {
            Field::Missing => Cell::Missing,
            Field::Value(v) => Cell::Text(v.as_str()),
            Field::Malformed(raw) => Cell::Malformed(raw.as_str()),
        }
    };
}

/// One line of the order extract.
///
/// `position` is the 0-based index of the row in the ingested dataset. It
/// identifies the row for rule flagging and survives filtering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub position: usize,
    pub row_id: Field<i64>,
    pub order_id: Field<String>,
    pub order_date: Field<NaiveDate>,
    pub ship_date: Field<NaiveDate>,
    pub ship_mode: Field<String>,
    pub customer_id: Field<String>,
    pub customer_name: Field<String>,
    pub segment: Field<String>,
    pub product_id: Field<String>,
    pub category: Field<String>,
    pub sub_category: Field<String>,
    pub product_name: Field<String>,
    pub sales: Field<f64>,
    pub quantity: Field<i64>,
    pub discount: Field<f64>,
    pub profit: Field<f64>,
    pub country: Field<String>,
    pub city: Field<String>,
    pub state: Field<String>,
    pub postal_code: Field<String>,
    pub region: Field<String>,
}

impl Row {
    pub fn cell(&self, column: Column) -> Cell<'_> {
        match column {
            Column::RowId => cell!(self.row_id, Int),
            Column::OrderId => cell!(self.order_id),
            Column::OrderDate => cell!(self.order_date, Date),
            Column::ShipDate => cell!(self.ship_date, Date),
            Column::ShipMode => cell!(self.ship_mode),
            Column::CustomerId => cell!(self.customer_id),
            Column::CustomerName => cell!(self.customer_name),
            Column::Segment => cell!(self.segment),
            Column::ProductId => cell!(self.product_id),
            Column::Category => cell!(self.category),
            Column::SubCategory => cell!(self.sub_category),
            Column::ProductName => cell!(self.product_name),
            Column::Sales => cell!(self.sales, Float),
            Column::Quantity => cell!(self.quantity, Int),
            Column::Discount => cell!(self.discount, Float),
            Column::Profit => cell!(self.profit, Float),
            Column::Country => cell!(self.country),
            Column::City => cell!(self.city),
            Column::State => cell!(self.state),
            Column::PostalCode => cell!(self.postal_code),
            Column::Region => cell!(self.region),
        }
    }

    /// Full field tuple, position excluded. Two rows with equal fingerprints
    /// are exact duplicates.
    pub fn fingerprint(&self) -> Vec<Cell<'_>> {
        Column::ALL.iter().map(|c| self.cell(*c)).collect()
    }

    pub fn has_missing(&self) -> bool {
        Column::ALL
            .iter()
            .any(|c| matches!(self.cell(*c), Cell::Missing))
    }

    pub fn render(&self, column: Column) -> String {
        match self.cell(column) {
            Cell::Missing => String::new(),
            Cell::Int(v) => v.to_string(),
            Cell::Float(v) => v.to_string(),
            Cell::Date(v) => v.to_string(),
            Cell::Text(v) | Cell::Malformed(v) => v.to_string(),
        }
    }
}

/// A field that was present but did not coerce to its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub position: usize,
    pub column: Column,
    pub expected: ColumnKind,
    pub raw: String,
}

/// Coerces raw text cells into typed rows.
#[derive(Debug, Clone)]
pub struct RowParser {
    date_formats: Vec<String>,
}

impl Default for RowParser {
    fn default() -> Self {
        Self {
            date_formats: vec!["%Y-%m-%d".to_string()],
        }
    }
}

impl RowParser {
    pub fn new(date_formats: Vec<String>) -> Self {
        if date_formats.is_empty() {
            return Self::default();
        }
        Self { date_formats }
    }

    /// Builds a row from raw cells. `raw` returns `None` for an absent cell.
    ///
    /// Never fails. Blank cells and NA tokens are `Field::Missing`. A value
    /// that does not coerce is reported in the returned failures and kept as
    /// `Field::Malformed`, except dates, which are coerced to `Field::Missing`.
    pub fn parse_row<'a, F>(&self, position: usize, raw: F) -> (Row, Vec<ParseFailure>)
    where
        F: Fn(Column) -> Option<&'a str>,
    {
        let mut failures = Vec::new();
        let text = |c: Column| -> Field<String> {
            match present(raw(c)) {
                None => Field::Missing,
                Some(v) => Field::Value(v.to_string()),
            }
        };

        let order_id = match text(Column::OrderId) {
            Field::Value(v) => Field::Value(v.to_uppercase()),
            other => other,
        };

        let mut row = Row {
            position,
            order_id,
            ship_mode: text(Column::ShipMode),
            customer_id: text(Column::CustomerId),
            customer_name: text(Column::CustomerName),
            segment: text(Column::Segment),
            product_id: text(Column::ProductId),
            category: text(Column::Category),
            sub_category: text(Column::SubCategory),
            product_name: text(Column::ProductName),
            country: text(Column::Country),
            city: text(Column::City),
            state: text(Column::State),
            postal_code: text(Column::PostalCode),
            region: text(Column::Region),
            ..Row::default()
        };

        row.row_id = self.typed(position, Column::RowId, raw(Column::RowId), parse_int, &mut failures);
        row.quantity =
            self.typed(position, Column::Quantity, raw(Column::Quantity), parse_int, &mut failures);
        row.sales = self.typed(position, Column::Sales, raw(Column::Sales), parse_float, &mut failures);
        row.discount =
            self.typed(position, Column::Discount, raw(Column::Discount), parse_float, &mut failures);
        row.profit =
            self.typed(position, Column::Profit, raw(Column::Profit), parse_float, &mut failures);

        let date = |v: &str| self.parse_date(v);
        row.order_date = null_if_malformed(self.typed(
            position,
            Column::OrderDate,
            raw(Column::OrderDate),
            date,
            &mut failures,
        ));
        row.ship_date = null_if_malformed(self.typed(
            position,
            Column::ShipDate,
            raw(Column::ShipDate),
            date,
            &mut failures,
        ));

        (row, failures)
    }

    fn typed<T>(
        &self,
        position: usize,
        column: Column,
        raw: Option<&str>,
        parse: impl Fn(&str) -> Option<T>,
        failures: &mut Vec<ParseFailure>,
    ) -> Field<T> {
        let Some(value) = present(raw) else {
            return Field::Missing;
        };
        match parse(value) {
            Some(parsed) => Field::Value(parsed),
            None => {
                failures.push(ParseFailure {
                    position,
                    column,
                    expected: column.kind(),
                    raw: value.to_string(),
                });
                Field::Malformed(value.to_string())
            }
        }
    }

    fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        self.date_formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    }
}

/// Trimmed cell text, `None` for an absent, blank or NA cell.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !NA_TOKENS.contains(v))
}

fn null_if_malformed<T>(field: Field<T>) -> Field<T> {
    match field {
        Field::Malformed(_) => Field::Missing,
        other => other,
    }
}

fn parse_int(value: &str) -> Option<i64> {
    if let Ok(v) = value.parse::<i64>() {
        return Some(v);
    }
    // "3.0" is an integer written by a float-typed exporter
    let float = value.parse::<f64>().ok()?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

fn parse_float(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// An ordered, immutable sequence of rows sharing the order schema.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<Row>,
    parse_failures: Vec<ParseFailure>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>, parse_failures: Vec<ParseFailure>) -> Self {
        Self {
            rows,
            parse_failures,
        }
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::new(rows, Vec::new())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn parse_failures(&self) -> &[ParseFailure] {
        &self.parse_failures
    }

    /// Row by its position, not by its index in this dataset.
    pub fn row_at(&self, position: usize) -> Option<&Row> {
        self.rows
            .binary_search_by_key(&position, |r| r.position)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// Stable filter: returns a new dataset without the given positions.
    pub fn without_positions(&self, excluded: &BTreeSet<usize>) -> Dataset {
        let rows = self
            .rows
            .iter()
            .filter(|r| !excluded.contains(&r.position))
            .cloned()
            .collect();
        let parse_failures = self
            .parse_failures
            .iter()
            .filter(|f| !excluded.contains(&f.position))
            .cloned()
            .collect();
        Dataset::new(rows, parse_failures)
    }

    /// Fails when a typed column holds values but none of them coerce to
    /// the declared type: the column itself has the wrong type.
    ///
    /// Counts recorded parse failures, since failed dates are already null.
    pub fn verify_types(&self, schema: &RowSchema) -> Result<(), DomainError> {
        for spec in schema.columns() {
            if spec.kind == ColumnKind::Text {
                continue;
            }
            let failed = self
                .parse_failures
                .iter()
                .filter(|f| f.column == spec.column)
                .count();
            let typed = self
                .rows
                .iter()
                .filter(|r| !matches!(r.cell(spec.column), Cell::Missing | Cell::Malformed(_)))
                .count();
            if failed > 0 && typed == 0 {
                return Err(DomainError::SchemaError {
                    column: spec.column.name().to_string(),
                    reason: format!(
                        "none of {} value(s) parse as {}",
                        failed,
                        spec.kind.type_name()
                    ),
                });
            }
        }
        Ok(())
    }
}
