// orderly-core/src/infrastructure/adapters/csv_source.rs

use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::domain::dataset::{Dataset, ParseFailure, Row, RowParser};
use crate::domain::error::DomainError;
use crate::domain::project::ProjectConfig;
use crate::domain::schema::RowSchema;
use crate::error::OrderlyError;
use crate::infrastructure::discovery::discover_sources;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::DatasetSource;

/// Parse failures logged one by one before switching to a summary.
const LOGGED_FAILURES: usize = 20;

/// Reads one or more CSV extracts into a single dataset.
#[derive(Debug, Clone)]
pub struct CsvDatasetSource {
    files: Vec<PathBuf>,
    delimiter: u8,
    parser: RowParser,
    schema: RowSchema,
    encoding: &'static Encoding,
}

impl CsvDatasetSource {
    pub fn new(files: Vec<PathBuf>, delimiter: u8, parser: RowParser) -> Self {
        Self {
            files,
            delimiter,
            parser,
            schema: RowSchema::orders(),
            encoding: UTF_8,
        }
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Resolves the configured `input` (relative to `project_dir`) and selects
    /// the extracts to read.
    pub fn from_config(project_dir: &Path, config: &ProjectConfig) -> Result<Self, OrderlyError> {
        let input = project_dir.join(&config.input);
        let files = discover_sources(&input)?;
        Ok(Self::new(files, config.delimiter_byte()?, config.row_parser())
            .with_encoding(config.source_encoding()?))
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Appends the records of one file, numbering them from `first_position`.
    fn read_file(
        &self,
        path: &Path,
        first_position: usize,
        rows: &mut Vec<Row>,
        failures: &mut Vec<ParseFailure>,
    ) -> Result<(), OrderlyError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let mut undecodable = Undecodable::default();
        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| undecodable.check(1, self.encoding.decode_without_bom_handling(h)).into_owned())
            .collect();
        let header_map = self.schema.resolve_headers(&headers).map_err(|e| match e {
            DomainError::SchemaError { column, reason } => DomainError::SchemaError {
                column,
                reason: format!("{} in {}", reason, path.display()),
            },
            other => other,
        })?;
        if !header_map.ignored.is_empty() {
            warn!(file = ?path, columns = ?header_map.ignored, "Ignoring columns outside the order schema");
        }

        let mut position = first_position;
        for record in reader.byte_records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let cells: Vec<Cow<'_, str>> = record
                .iter()
                .map(|cell| undecodable.check(line, self.encoding.decode_without_bom_handling(cell)))
                .collect();
            let (row, row_failures) = self.parser.parse_row(position, |column| {
                header_map
                    .index_of(column)
                    .and_then(|idx| cells.get(idx))
                    .map(|cell| cell.as_ref())
            });
            rows.push(row);
            failures.extend(row_failures);
            position += 1;
        }

        if undecodable.cells > 0 {
            warn!(
                file = ?path,
                encoding = self.encoding.name(),
                cells = undecodable.cells,
                first_line = undecodable.first_line,
                "Bytes invalid for the configured encoding were replaced with U+FFFD"
            );
        }

        debug!(file = ?path, rows = position - first_position, "Extract read");
        Ok(())
    }
}

/// Tally of cells that did not decode cleanly in one file.
#[derive(Debug, Default)]
struct Undecodable {
    cells: usize,
    first_line: u64,
}

impl Undecodable {
    fn check<'a>(&mut self, line: u64, (text, had_errors): (Cow<'a, str>, bool)) -> Cow<'a, str> {
        if had_errors {
            if self.cells == 0 {
                self.first_line = line;
            }
            self.cells += 1;
        }
        text
    }
}

impl DatasetSource for CsvDatasetSource {
    #[instrument(skip_all, fields(files = self.files.len()))]
    fn load(&self) -> Result<Dataset, OrderlyError> {
        if self.files.is_empty() {
            return Err(InfrastructureError::SourceNotFound("no input files".to_string()).into());
        }

        let mut rows = Vec::new();
        let mut failures = Vec::new();
        for path in &self.files {
            self.read_file(path, rows.len(), &mut rows, &mut failures)?;
        }

        for failure in failures.iter().take(LOGGED_FAILURES) {
            warn!(
                position = failure.position,
                column = %failure.column,
                expected = failure.expected.type_name(),
                raw = %failure.raw,
                "Value does not match the declared column type"
            );
        }
        if failures.len() > LOGGED_FAILURES {
            warn!(
                total = failures.len(),
                "Further parse failures omitted from the log"
            );
        }

        let dataset = Dataset::new(rows, failures);
        dataset.verify_types(&self.schema)?;

        info!(
            rows = dataset.len(),
            parse_failures = dataset.parse_failures().len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    fn describe(&self) -> String {
        self.files
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
