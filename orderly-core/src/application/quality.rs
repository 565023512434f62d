// orderly-core/src/application/quality.rs

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::domain::dataset::Dataset;
use crate::domain::quality::{
    Classification, IssueClassifier, IssueReport, Rule, RuleEngine, RuleScope,
};
use crate::domain::table::Table;
use crate::error::OrderlyError;
use crate::ports::ArtifactSink;

/// Quality artifacts live under this directory of the target path.
pub const QUALITY_DIR: &str = "quality";

#[derive(Debug, Clone)]
pub struct QualityAnalysis {
    pub report: IssueReport,
    pub classification: Classification,
}

#[instrument(skip_all, fields(rows = dataset.len()))]
pub fn analyze_quality(dataset: &Dataset, classifier: &IssueClassifier) -> QualityAnalysis {
    let start = Instant::now();
    let report = RuleEngine::evaluate(dataset);
    let classification = classifier.classify(&report, dataset);

    if classification.requires_review() {
        warn!(
            rows = classification.quality_report.len(),
            columns = classification.sme_mixed_types.len(),
            "Findings routed to SME review"
        );
    }
    info!(
        flagged_rows = report.flagged_row_count(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Quality analysis complete"
    );

    QualityAnalysis {
        report,
        classification,
    }
}

/// Writes summary, examples, SME report, mixed types, parse failures and one
/// listing per non-empty row-level rule. Returns the written paths.
pub fn write_quality_artifacts<S>(
    sink: &S,
    analysis: &QualityAnalysis,
    dataset: &Dataset,
) -> Result<Vec<PathBuf>, OrderlyError>
where
    S: ArtifactSink + ?Sized,
{
    let dir = Path::new(QUALITY_DIR);
    let classification = &analysis.classification;
    let mut written = Vec::new();

    let tables = [
        Table::from_records("summary", &classification.summary),
        Table::tagged("examples", "Issue Type", &classification.examples),
        Table::tagged("quality_report", "Issue Type", &classification.quality_report),
        Table::from_records("mixed_data_types", analysis.report.mixed_types()),
        Table::from_records("parse_failures", dataset.parse_failures()),
    ];
    for table in &tables {
        written.push(sink.write_table(&dir.join(format!("{}.csv", table.name)), table)?);
    }

    for rule in Rule::CATALOG {
        if rule.scope() == RuleScope::Column || analysis.report.is_empty_for(rule) {
            continue;
        }
        let listing = Table::from_records(
            rule.name(),
            analysis
                .report
                .flagged_rows(rule)
                .filter_map(|position| dataset.row_at(position)),
        );
        let path = dir.join("issues").join(format!("{}.csv", rule.name()));
        written.push(sink.write_table(&path, &listing)?);
    }

    info!(files = written.len(), "Quality artifacts written");
    Ok(written)
}
