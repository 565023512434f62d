// orderly-core/src/domain/mart/audit.rs

use serde::Serialize;
use std::collections::HashSet;
use std::hash::Hash;

use crate::domain::mart::star::DataMart;
use crate::domain::table::TabularRecord;

/// Row and key counts of one produced table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub table: String,
    pub row_count: usize,
    pub distinct_primary_key: usize,
    /// Only the fact table carries a row-level degenerate key.
    pub distinct_row_id: Option<usize>,
}

impl AuditEntry {
    pub fn is_key_unique(&self) -> bool {
        self.row_count == self.distinct_primary_key
    }
}

impl TabularRecord for AuditEntry {
    fn headers() -> Vec<String> {
        [
            "Data Mart System Name",
            "Count Rows",
            "Count Distinct Primary Key",
            "Count Distinct Row ID",
        ]
        .map(String::from)
        .to_vec()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.table.clone(),
            self.row_count.to_string(),
            self.distinct_primary_key.to_string(),
            self.distinct_row_id.map(|c| c.to_string()).unwrap_or_default(),
        ]
    }
}

pub struct MartAuditor;

impl MartAuditor {
    /// Customer by Customer ID, Product by Product ID, Geography by
    /// GeographyID, orders by Order ID and by Row ID. Missing keys are not
    /// counted as a distinct value.
    pub fn audit(mart: &DataMart) -> Vec<AuditEntry> {
        let orders = mart.orders.rows();
        vec![
            AuditEntry {
                table: mart.customers.name().to_string(),
                row_count: mart.customers.len(),
                distinct_primary_key: distinct(
                    mart.customers.rows().iter().filter_map(|r| r.record.customer_id.value()),
                ),
                distinct_row_id: None,
            },
            AuditEntry {
                table: mart.products.name().to_string(),
                row_count: mart.products.len(),
                distinct_primary_key: distinct(
                    mart.products.rows().iter().filter_map(|r| r.record.product_id.value()),
                ),
                distinct_row_id: None,
            },
            AuditEntry {
                table: mart.geography.name().to_string(),
                row_count: mart.geography.len(),
                distinct_primary_key: mart.geography.distinct_primary_keys(),
                distinct_row_id: None,
            },
            AuditEntry {
                table: mart.orders.name().to_string(),
                row_count: orders.len(),
                distinct_primary_key: distinct(orders.iter().filter_map(|f| f.order_id.value())),
                distinct_row_id: Some(distinct(orders.iter().filter_map(|f| f.row_id.value()))),
            },
        ]
    }
}

fn distinct<T: Hash + Eq>(values: impl Iterator<Item = T>) -> usize {
    values.collect::<HashSet<_>>().len()
}
