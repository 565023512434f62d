// orderly-core/src/application/mart.rs

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::mart::{AuditEntry, DataMart, MartAuditor};
use crate::domain::quality::{Exclusion, ExclusionFilter, IssueReport};
use crate::domain::table::Table;
use crate::error::OrderlyError;
use crate::ports::ArtifactSink;

pub const MART_DIR: &str = "marts";

#[derive(Debug, Clone)]
pub struct MartBuild {
    pub exclusion: Exclusion,
    pub mart: DataMart,
    pub audit: Vec<AuditEntry>,
}

/// Excludes flagged rows, builds the star schema from what remains and audits it.
#[instrument(skip_all, fields(rows = dataset.len()))]
pub fn build_mart(
    dataset: &Dataset,
    report: &IssueReport,
    filter: &ExclusionFilter,
) -> Result<MartBuild, DomainError> {
    let exclusion = filter.exclude(dataset, report);
    let mart = DataMart::build(&exclusion.clean)?;
    let audit = MartAuditor::audit(&mart);

    for entry in audit.iter().filter(|e| !e.is_key_unique()) {
        // Expected for the fact table (one order spans several lines).
        if entry.distinct_row_id.is_none() {
            warn!(
                table = %entry.table,
                rows = entry.row_count,
                distinct_keys = entry.distinct_primary_key,
                "Dimension key is not unique"
            );
        }
    }
    info!(
        excluded = exclusion.excluded_count(),
        facts = mart.orders.len(),
        "Data mart ready"
    );

    Ok(MartBuild {
        exclusion,
        mart,
        audit,
    })
}

pub fn write_mart_artifacts<S>(sink: &S, build: &MartBuild) -> Result<Vec<PathBuf>, OrderlyError>
where
    S: ArtifactSink + ?Sized,
{
    let dir = Path::new(MART_DIR);
    let mut written = Vec::new();

    for table in build.mart.tables() {
        written.push(sink.write_table(&dir.join(format!("{}.csv", table.name)), &table)?);
    }
    let audit = Table::from_records("audit", &build.audit);
    written.push(sink.write_table(&dir.join("audit.csv"), &audit)?);

    info!(files = written.len(), "Mart artifacts written");
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::fixtures::dataset;
    use crate::domain::quality::RuleEngine;
    use crate::domain::schema::Column;
    use crate::infrastructure::adapters::CsvArtifactSink;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> Dataset {
        dataset(&[
            &[(Column::RowId, "1"), (Column::Profit, "-3"), (Column::ProductId, "P1")],
            &[(Column::RowId, "2"), (Column::ProductId, "P2"), (Column::City, "Dover")],
            &[(Column::RowId, "3"), (Column::ProductId, "P3"), (Column::Segment, "")],
            &[(Column::RowId, "4"), (Column::ProductId, "P4")],
        ])
    }

    #[test]
    fn test_build_excludes_then_audits() {
        let ds = sample();
        let report = RuleEngine::evaluate(&ds);
        let build = build_mart(&ds, &report, &ExclusionFilter::default()).unwrap();

        assert_eq!(build.exclusion.excluded.iter().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(build.mart.orders.len(), 2);
        let fact = build.audit.iter().find(|e| e.table == "FactOrders").unwrap();
        assert_eq!(fact.row_count, 2);
        assert_eq!(fact.distinct_row_id, Some(2));
    }

    #[test]
    fn test_mart_files() -> Result<()> {
        let ds = sample();
        let report = RuleEngine::evaluate(&ds);
        let build = build_mart(&ds, &report, &ExclusionFilter::default())?;
        let dir = tempdir()?;
        write_mart_artifacts(&CsvArtifactSink::new(dir.path()), &build)?;

        let marts = dir.path().join("marts");
        let geography = fs::read_to_string(marts.join("DimGeography.csv"))?;
        assert_eq!(
            geography,
            "Country,City,State,Postal Code,Region,GeographyID\n\
             United States,Dover,Kentucky,42420,South,1\n\
             United States,Henderson,Kentucky,42420,South,2\n"
        );
        let audit = fs::read_to_string(marts.join("audit.csv"))?;
        assert!(audit.contains("FactOrders,2,1,2"));
        Ok(())
    }
}
