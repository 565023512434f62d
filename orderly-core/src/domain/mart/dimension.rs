// orderly-core/src/domain/mart/dimension.rs

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::{debug, warn};

use crate::domain::dataset::{Dataset, Row};
use crate::domain::error::DomainError;
use crate::domain::schema::Column;
use crate::domain::table::Table;

/// Integer key assigned in first-seen order, starting at 1.
pub type SurrogateKey = u32;

/// A typed projection of a row into a dimension's attributes.
///
/// The column constants describe the projection; `project` performs it.
pub trait DimensionRecord: Clone + Eq + Hash {
    type NaturalKey: Eq + Hash;

    const TABLE: &'static str;
    const NATURAL_KEY: &'static [Column];
    const DESCRIPTIVE: &'static [Column];
    /// Name of the surrogate key column, when no natural column suffices.
    const SURROGATE_KEY: Option<&'static str>;

    fn project(row: &Row) -> Self;
    fn natural_key(&self) -> Self::NaturalKey;
    /// Attribute values, natural key first, then descriptive columns.
    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionRow<R> {
    pub surrogate_key: Option<SurrogateKey>,
    pub record: R,
}

/// Deduplicated attribute tuples of one dimension, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension<R> {
    surrogate_key: Option<&'static str>,
    rows: Vec<DimensionRow<R>>,
}

impl<R: DimensionRecord> Dimension<R> {
    pub fn from_rows(surrogate_key: Option<&'static str>, rows: Vec<DimensionRow<R>>) -> Self {
        Self {
            surrogate_key,
            rows,
        }
    }

    pub fn name(&self) -> &'static str {
        R::TABLE
    }

    pub fn rows(&self) -> &[DimensionRow<R>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record -> surrogate key map used to resolve fact foreign keys.
    ///
    /// Fails when the dimension has no surrogate key, or when one attribute
    /// tuple maps to several keys (a join would fan out).
    pub fn lookup(&self) -> Result<HashMap<&R, SurrogateKey>, DomainError> {
        if self.surrogate_key.is_none() {
            return Err(DomainError::SurrogateKeyMissing(R::TABLE.to_string()));
        }

        let mut lookup = HashMap::with_capacity(self.rows.len());
        for row in &self.rows {
            let Some(key) = row.surrogate_key else {
                return Err(DomainError::SurrogateKeyMissing(R::TABLE.to_string()));
            };
            if let Some(previous) = lookup.insert(&row.record, key) {
                return Err(DomainError::AmbiguousDimensionKey {
                    dimension: R::TABLE.to_string(),
                    surrogate_keys: vec![previous, key],
                });
            }
        }
        Ok(lookup)
    }

    pub fn distinct_natural_keys(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.record.natural_key())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Distinct surrogate keys when the dimension has them, natural keys otherwise.
    pub fn distinct_primary_keys(&self) -> usize {
        if self.surrogate_key.is_some() {
            self.rows
                .iter()
                .filter_map(|r| r.surrogate_key)
                .collect::<HashSet<_>>()
                .len()
        } else {
            self.distinct_natural_keys()
        }
    }

    pub fn to_table(&self) -> Table {
        let mut headers: Vec<String> = R::NATURAL_KEY
            .iter()
            .chain(R::DESCRIPTIVE)
            .map(|c| c.name().to_string())
            .collect();
        if let Some(column) = self.surrogate_key {
            headers.push(column.to_string());
        }

        let mut table = Table::new(R::TABLE, headers);
        table.rows = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = row.record.cells();
                if let Some(key) = row.surrogate_key {
                    cells.push(key.to_string());
                }
                cells
            })
            .collect();
        table
    }
}

pub struct DimensionBuilder;

impl DimensionBuilder {
    /// Builds the dimension with the surrogate key its record type declares.
    pub fn build<R: DimensionRecord>(dataset: &Dataset) -> Dimension<R> {
        Self::build_with(dataset, R::SURROGATE_KEY)
    }

    /// Projects every row, keeps the first occurrence of each attribute tuple
    /// and, when `surrogate_key` names a column, numbers the tuples 1..=n in
    /// that order. Identical input yields identical keys.
    pub fn build_with<R: DimensionRecord>(
        dataset: &Dataset,
        surrogate_key: Option<&'static str>,
    ) -> Dimension<R> {
        let mut seen: HashSet<R> = HashSet::new();
        let mut rows: Vec<DimensionRow<R>> = Vec::new();

        for row in dataset.rows() {
            let record = R::project(row);
            if seen.contains(&record) {
                continue;
            }
            seen.insert(record.clone());
            let surrogate = surrogate_key.map(|_| rows.len() as SurrogateKey + 1);
            rows.push(DimensionRow {
                surrogate_key: surrogate,
                record,
            });
        }

        let dimension = Dimension::from_rows(surrogate_key, rows);
        let natural = dimension.distinct_natural_keys();
        if natural != dimension.len() {
            warn!(
                dimension = R::TABLE,
                rows = dimension.len(),
                distinct_keys = natural,
                "Natural key maps to several attribute tuples"
            );
        }
        debug!(dimension = R::TABLE, rows = dimension.len(), "Dimension built");
        dimension
    }
}
