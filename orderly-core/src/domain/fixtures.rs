// orderly-core/src/domain/fixtures.rs
//
// Test-only builders for order rows.

use std::collections::HashMap;

use crate::domain::dataset::{Dataset, Row, RowParser};
use crate::domain::schema::Column;

fn default_cell(column: Column) -> &'static str {
    match column {
        Column::RowId => "1",
        Column::OrderId => "CA-2021-100001",
        Column::OrderDate => "2021-03-01",
        Column::ShipDate => "2021-03-04",
        Column::ShipMode => "Second Class",
        Column::CustomerId => "CG-12520",
        Column::CustomerName => "Claire Gute",
        Column::Segment => "Consumer",
        Column::ProductId => "FUR-BO-10001798",
        Column::Category => "Furniture",
        Column::SubCategory => "Bookcases",
        Column::ProductName => "Bush Somerset Collection Bookcase",
        Column::Sales => "261.96",
        Column::Quantity => "2",
        Column::Discount => "0.2",
        Column::Profit => "41.91",
        Column::Country => "United States",
        Column::City => "Henderson",
        Column::State => "Kentucky",
        Column::PostalCode => "42420",
        Column::Region => "South",
    }
}

/// Raw cells of a valid order line, with some cells replaced.
pub fn raw_cells(overrides: &[(Column, &str)]) -> HashMap<Column, String> {
    let mut cells: HashMap<Column, String> = Column::ALL
        .iter()
        .map(|c| (*c, default_cell(*c).to_string()))
        .collect();
    for (column, value) in overrides {
        cells.insert(*column, value.to_string());
    }
    cells
}

pub fn order_row(position: usize, overrides: &[(Column, &str)]) -> Row {
    let cells = raw_cells(overrides);
    let (row, _) = RowParser::default().parse_row(position, |c| cells.get(&c).map(String::as_str));
    row
}

/// Dataset whose row positions follow the slice order. Parse failures are kept.
pub fn dataset(rows: &[&[(Column, &str)]]) -> Dataset {
    let parser = RowParser::default();
    let mut parsed = Vec::with_capacity(rows.len());
    let mut failures = Vec::new();
    for (position, overrides) in rows.iter().enumerate() {
        let cells = raw_cells(overrides);
        let (row, row_failures) = parser.parse_row(position, |c| cells.get(&c).map(String::as_str));
        parsed.push(row);
        failures.extend(row_failures);
    }
    Dataset::new(parsed, failures)
}
