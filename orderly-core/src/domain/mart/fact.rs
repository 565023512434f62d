// orderly-core/src/domain/mart/fact.rs

use tracing::{debug, error};

use crate::domain::dataset::{Dataset, Row};
use crate::domain::error::DomainError;
use crate::domain::mart::dimension::{Dimension, DimensionRecord, SurrogateKey};
use crate::domain::table::{Table, TabularRecord};

pub trait FactRecord: TabularRecord {
    const TABLE: &'static str;
}

/// Fact rows in the order of the dataset they were projected from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact<F> {
    rows: Vec<F>,
}

impl<F: FactRecord> Fact<F> {
    pub fn name(&self) -> &'static str {
        F::TABLE
    }

    pub fn rows(&self) -> &[F] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_table(&self) -> Table {
        Table::from_records(F::TABLE, &self.rows)
    }
}

pub struct FactBuilder;

impl FactBuilder {
    /// Projects each row through `project`, resolving the dimension's
    /// surrogate key by joining on the dimension's own attribute tuple.
    ///
    /// The join is lossless: the fact has exactly one row per dataset row.
    /// Rows whose tuple is absent from the dimension abort the build with an
    /// `IntegrityViolation` listing their positions.
    pub fn build<R, F, P>(
        dataset: &Dataset,
        dimension: &Dimension<R>,
        project: P,
    ) -> Result<Fact<F>, DomainError>
    where
        R: DimensionRecord,
        F: FactRecord,
        P: Fn(&Row, SurrogateKey) -> F,
    {
        let lookup = dimension.lookup()?;

        let mut rows = Vec::with_capacity(dataset.len());
        let mut orphans = Vec::new();
        for row in dataset.rows() {
            match lookup.get(&R::project(row)) {
                Some(key) => rows.push(project(row, *key)),
                None => orphans.push(row.position),
            }
        }

        if !orphans.is_empty() {
            error!(
                fact = F::TABLE,
                dimension = R::TABLE,
                orphans = orphans.len(),
                "Foreign key resolution failed"
            );
            return Err(DomainError::IntegrityViolation {
                table: F::TABLE.to_string(),
                dimension: R::TABLE.to_string(),
                positions: orphans,
            });
        }

        debug!(fact = F::TABLE, rows = rows.len(), "Fact built");
        Ok(Fact { rows })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::fixtures::dataset;
    use crate::domain::mart::dimension::DimensionBuilder;
    use crate::domain::mart::star::{FactOrder, GeographyRecord};
    use crate::domain::schema::Column;

    fn orders() -> Dataset {
        dataset(&[
            &[(Column::RowId, "1"), (Column::City, "NY"), (Column::PostalCode, "10001")],
            &[(Column::RowId, "2"), (Column::City, "LA"), (Column::PostalCode, "90001")],
            &[(Column::RowId, "3"), (Column::City, "NY"), (Column::PostalCode, "10001")],
        ])
    }

    #[test]
    fn test_fact_preserves_row_count_and_resolves_keys() {
        let ds = orders();
        let geography = DimensionBuilder::build::<GeographyRecord>(&ds);
        let fact = FactBuilder::build(&ds, &geography, FactOrder::from_row).unwrap();

        assert_eq!(fact.len(), ds.len());
        let keys: Vec<SurrogateKey> = fact.rows().iter().map(|f| f.geography_id).collect();
        assert_eq!(keys, vec![1, 2, 1]);
    }

    #[test]
    fn test_fact_table_drops_natural_join_columns() {
        let ds = orders();
        let geography = DimensionBuilder::build::<GeographyRecord>(&ds);
        let table = FactBuilder::build(&ds, &geography, FactOrder::from_row)
            .unwrap()
            .to_table();
        assert!(table.column("City").is_none());
        assert!(table.column("Postal Code").is_none());
        assert_eq!(table.column("GeographyID").unwrap(), vec!["1", "2", "1"]);
    }

    #[test]
    fn test_orphan_rows_are_surfaced() {
        let ds = orders();
        let partial = dataset(&[&[(Column::City, "NY"), (Column::PostalCode, "10001")]]);
        let geography = DimensionBuilder::build::<GeographyRecord>(&partial);

        let err = FactBuilder::build(&ds, &geography, FactOrder::from_row).unwrap_err();
        match err {
            DomainError::IntegrityViolation {
                table,
                dimension,
                positions,
            } => {
                assert_eq!(table, "FactOrders");
                assert_eq!(dimension, "DimGeography");
                assert_eq!(positions, vec![1]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
