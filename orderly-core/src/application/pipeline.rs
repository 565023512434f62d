// orderly-core/src/application/pipeline.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, instrument};

use crate::application::mart::{build_mart, write_mart_artifacts};
use crate::application::quality::{analyze_quality, write_quality_artifacts};
use crate::domain::mart::AuditEntry;
use crate::domain::project::ProjectConfig;
use crate::error::OrderlyError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::{ArtifactSink, DatasetSource};

pub const RUN_RESULT_FILE: &str = "run_result.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Quality analysis and data mart.
    Run,
    /// Quality analysis only.
    Check,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub project: String,
    pub mode: RunMode,
    pub success: bool,
    pub sources: String,
    pub total_rows: usize,
    pub parse_failures: usize,
    /// Rule name -> flagged rows (flagged columns for `mixed_data_types`).
    pub flagged: BTreeMap<String, usize>,
    pub flagged_rows: usize,
    pub requires_review: bool,
    pub excluded_rows: Option<usize>,
    pub clean_rows: Option<usize>,
    #[serde(default)]
    pub mart: Vec<MartSummary>,
    pub artifacts: Vec<PathBuf>,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

/// Audit line as recorded in the run result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MartSummary {
    pub table: String,
    pub rows: usize,
    pub distinct_primary_key: usize,
    pub distinct_row_id: Option<usize>,
}

impl From<&AuditEntry> for MartSummary {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            table: entry.table.clone(),
            rows: entry.row_count,
            distinct_primary_key: entry.distinct_primary_key,
            distinct_row_id: entry.distinct_row_id,
        }
    }
}

/// Full pipeline: load, analyze, write quality artifacts, build and write the mart.
///
/// When the mart cannot be built the run result is still written, with
/// `success: false`, before the error is returned.
#[instrument(skip_all, fields(project = %config.name))]
pub fn run_pipeline<D, S>(source: &D, sink: &S, config: &ProjectConfig) -> Result<RunResult, OrderlyError>
where
    D: DatasetSource + ?Sized,
    S: ArtifactSink + ?Sized,
{
    execute(source, sink, config, RunMode::Run)
}

/// Quality analysis only; no mart is built.
#[instrument(skip_all, fields(project = %config.name))]
pub fn run_quality_check<D, S>(
    source: &D,
    sink: &S,
    config: &ProjectConfig,
) -> Result<RunResult, OrderlyError>
where
    D: DatasetSource + ?Sized,
    S: ArtifactSink + ?Sized,
{
    execute(source, sink, config, RunMode::Check)
}

fn execute<D, S>(
    source: &D,
    sink: &S,
    config: &ProjectConfig,
    mode: RunMode,
) -> Result<RunResult, OrderlyError>
where
    D: DatasetSource + ?Sized,
    S: ArtifactSink + ?Sized,
{
    let start = Instant::now();
    let classifier = config.classifier();
    let filter = config.exclusion_filter()?;

    // 1. INGESTION
    let dataset = source.load()?;

    // 2. QUALITY
    let analysis = analyze_quality(&dataset, &classifier);
    let mut artifacts = write_quality_artifacts(sink, &analysis, &dataset)?;

    let mut result = RunResult {
        project: config.name.clone(),
        mode,
        success: true,
        sources: source.describe(),
        total_rows: analysis.report.total_rows(),
        parse_failures: dataset.parse_failures().len(),
        flagged: analysis
            .report
            .counts()
            .into_iter()
            .map(|(rule, count)| (rule.name().to_string(), count))
            .collect(),
        flagged_rows: analysis.report.flagged_row_count(),
        requires_review: analysis.classification.requires_review(),
        excluded_rows: None,
        clean_rows: None,
        mart: Vec::new(),
        artifacts: Vec::new(),
        errors: Vec::new(),
        duration_ms: 0,
    };

    // 3. MART
    let mut failure = None;
    if mode == RunMode::Run {
        match build_mart(&dataset, &analysis.report, &filter) {
            Ok(build) => {
                artifacts.extend(write_mart_artifacts(sink, &build)?);
                result.excluded_rows = Some(build.exclusion.excluded_count());
                result.clean_rows = Some(build.exclusion.clean.len());
                result.mart = build.audit.iter().map(MartSummary::from).collect();
            }
            Err(e) => {
                error!(error = %e, "Data mart build failed");
                result.success = false;
                result.errors.push(e.to_string());
                failure = Some(e);
            }
        }
    }

    // 4. RUN RESULT
    result.duration_ms = start.elapsed().as_millis() as u64;
    result.artifacts = artifacts;
    save_run_result(sink, &result)?;

    if let Some(e) = failure {
        return Err(e.into());
    }
    info!(
        rows = result.total_rows,
        flagged_rows = result.flagged_rows,
        duration_ms = result.duration_ms,
        "Pipeline finished"
    );
    Ok(result)
}

fn save_run_result<S: ArtifactSink + ?Sized>(sink: &S, result: &RunResult) -> Result<PathBuf, OrderlyError> {
    let value = serde_json::to_value(result).map_err(InfrastructureError::JsonError)?;
    sink.write_json(Path::new(RUN_RESULT_FILE), &value)
}
