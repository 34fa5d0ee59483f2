//! Core grade export reader implementation
//!
//! This module provides the directory scan orchestration and the per-file
//! parsing, with graceful degradation: a broken file loses that file, a
//! broken row loses that row, and everything else keeps flowing.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use super::labels::quiz_label_for;
use super::stats::{FileParse, GradeScan};
use crate::app::models::{Score, ScorePolicy, normalize_email};
use crate::app::services::columns::{ColumnMap, get_required_field};
use crate::app::services::discovery::discover_tabular_files;
use crate::config::GradeColumns;
use crate::{Error, Result};

/// Reader for the per-quiz grade export files
///
/// The reader resolves the configured email and score columns against each
/// file's header before ingesting rows. Files whose header lacks either
/// column are skipped whole, and their label never reaches the report.
#[derive(Debug)]
pub struct GradeReader {
    columns: GradeColumns,
    policy: ScorePolicy,
}

impl GradeReader {
    /// Create a new reader with the configured column names and score policy
    pub fn new(columns: GradeColumns, policy: ScorePolicy) -> Self {
        Self { columns, policy }
    }

    /// Scan a grades directory and ingest every quiz export, in name order.
    ///
    /// Discovery, file, schema, and row failures are all recovered: they are
    /// logged, counted, and the scan continues. The worst case is an empty
    /// grade table, never an abort.
    pub fn read_directory(&self, dir: &Path, show_progress: bool) -> GradeScan {
        info!("Reading quiz exports from: {}", dir.display());

        let files = discover_tabular_files(dir);
        let mut scan = GradeScan::new();
        scan.stats.files_found = files.len();

        // Set up progress reporting
        let progress_bar = if show_progress && !files.is_empty() {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    )
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb.set_message("Reading quiz exports...");
            Some(pb)
        } else {
            None
        };

        for (file_index, file_path) in files.iter().enumerate() {
            if let Some(pb) = &progress_bar {
                pb.set_position(file_index as u64);
                pb.set_message(format!(
                    "Reading {}",
                    file_path.file_name().unwrap_or_default().to_string_lossy()
                ));
            }

            match self.parse_file(file_path) {
                Ok(parse) => {
                    for (email, score) in parse.scores {
                        scan.table.record(email, &parse.label, score);
                        scan.stats.scores_recorded += 1;
                    }
                    scan.labels.push(parse.label);
                    scan.stats.files_processed += 1;
                    scan.stats.total_rows += parse.total_rows;
                    scan.stats.rows_skipped += parse.rows_skipped;
                    scan.stats.errors.extend(parse.row_errors);
                }
                Err(e) => {
                    scan.stats.files_skipped += 1;
                    scan.stats.errors.push(format!("{}: {}", file_path.display(), e));
                    warn!("Skipping quiz export {}: {}", file_path.display(), e);
                }
            }
        }

        if let Some(pb) = progress_bar {
            pb.finish_with_message(format!(
                "Read {} quiz export(s)",
                scan.stats.files_processed
            ));
        }

        info!(
            "Grade scan complete: {} file(s) processed, {} skipped, {} score(s) recorded ({:.1}% of rows)",
            scan.stats.files_processed,
            scan.stats.files_skipped,
            scan.stats.scores_recorded,
            scan.stats.success_rate()
        );

        scan
    }

    /// Parse a single quiz export and return its label and scores.
    ///
    /// Row order is preserved, so a student listed twice in one file ends up
    /// with the later row's score once the pairs are recorded.
    pub fn parse_file(&self, file_path: &Path) -> Result<FileParse> {
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());
        let label = quiz_label_for(&file_name);
        debug!("Parsing quiz export '{}' (label '{}')", file_name, label);

        let content = std::fs::read_to_string(file_path).map_err(|e| {
            Error::io(format!("Failed to read file {}", file_path.display()), e)
        })?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_bytes());

        let headers = match csv_reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                return Err(Error::csv_parsing(
                    &file_name,
                    "Failed to read CSV headers",
                    Some(e),
                ));
            }
        };
        let column_map = ColumnMap::analyze(&headers);

        let missing = column_map.missing_columns(&[
            self.columns.correo.as_str(),
            self.columns.calificacion.as_str(),
        ]);
        if !missing.is_empty() {
            return Err(Error::schema_mismatch(
                &file_name,
                format!("missing required column(s): {}", missing.join(", ")),
            ));
        }

        let mut parse = FileParse::new(label);
        for result in csv_reader.records() {
            parse.total_rows += 1;

            match result {
                Ok(record) => match self.parse_row(&record, &column_map) {
                    Ok(pair) => parse.scores.push(pair),
                    Err(e) => {
                        parse.rows_skipped += 1;
                        parse
                            .row_errors
                            .push(format!("{} row {}: {}", file_name, parse.total_rows, e));
                        debug!("Skipped row {} in '{}': {}", parse.total_rows, file_name, e);
                    }
                },
                Err(e) => {
                    parse.rows_skipped += 1;
                    parse.row_errors.push(format!(
                        "{} row {}: CSV parse error: {}",
                        file_name, parse.total_rows, e
                    ));
                    debug!(
                        "CSV parse error at row {} in '{}': {}",
                        parse.total_rows, file_name, e
                    );
                }
            }
        }

        info!(
            "Parsed '{}': {} score(s) from {} row(s)",
            file_name,
            parse.scores.len(),
            parse.total_rows
        );

        Ok(parse)
    }

    /// Extract the (normalized email, evaluated score) pair from one row
    fn parse_row(
        &self,
        record: &csv::StringRecord,
        column_map: &ColumnMap,
    ) -> Result<(String, Score)> {
        let raw_email = get_required_field(record, column_map, &self.columns.correo)?;
        let raw_score = get_required_field(record, column_map, &self.columns.calificacion)?;

        Ok((
            normalize_email(raw_email),
            Score::evaluate(raw_score, self.policy),
        ))
    }
}
