//! Student roster reader
//!
//! The roster directory holds whatever the course administration exported;
//! only the first tabular file in name order is read. Rows become ordered
//! [`StudentRecord`]s keyed by normalized email, with the regional pulled out
//! of the group-membership cell.
//!
//! A roster whose header does not carry the configured columns yields an
//! EMPTY roster rather than an error: the pipeline still runs and writes a
//! report with no data rows, which is the visible signal that the export
//! layout changed.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::app::models::{Roster, StudentRecord};
use crate::app::services::columns::{ColumnMap, get_required_field};
use crate::app::services::discovery::first_tabular_file;
use crate::config::RosterColumns;
use crate::constants::SECTION_CODE_PATTERN;
use crate::{Error, Result};

static SECTION_CODE_RE: OnceLock<Regex> = OnceLock::new();

fn section_code_re() -> &'static Regex {
    SECTION_CODE_RE.get_or_init(|| {
        Regex::new(SECTION_CODE_PATTERN).expect("section code pattern is a valid regex")
    })
}

/// Extract the regional from a roster group cell.
///
/// The cell lists comma-separated group memberships mixing section codes
/// (`M2023-01`) with a regional name. The first entry that is not a section
/// code wins; when every entry is a section code, the last entry is used.
pub fn extract_regional(group_cell: &str) -> String {
    let entries: Vec<&str> = group_cell.split(',').map(str::trim).collect();
    entries
        .iter()
        .find(|entry| !section_code_re().is_match(entry))
        .or_else(|| entries.last())
        .map(|entry| entry.to_string())
        .unwrap_or_default()
}

/// Load statistics for a roster read
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RosterStats {
    /// Total data rows encountered
    pub total_rows: usize,

    /// Distinct students loaded (after duplicate-email replacement)
    pub students_loaded: usize,

    /// Rows skipped due to row-level errors
    pub rows_skipped: usize,

    /// Error descriptions accumulated during the read
    pub errors: Vec<String>,
}

impl RosterStats {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reader for the student roster export
#[derive(Debug)]
pub struct RosterReader {
    columns: RosterColumns,
}

impl RosterReader {
    /// Create a new reader with the configured column names
    pub fn new(columns: RosterColumns) -> Self {
        Self { columns }
    }

    /// Load the roster from the first tabular file in a directory.
    ///
    /// Every failure mode short of a bug is recovered here: no file, an
    /// unreadable file, or a header mismatch all produce an empty roster
    /// with the problem logged and counted.
    pub fn load_directory(&self, dir: &Path) -> (Roster, RosterStats) {
        info!("Loading student roster from: {}", dir.display());

        let mut stats = RosterStats::new();
        let Some(file_path) = first_tabular_file(dir) else {
            warn!("No tabular roster file found in '{}'", dir.display());
            return (Roster::new(), stats);
        };

        match self.parse_file(&file_path, &mut stats) {
            Ok(roster) => {
                info!(
                    "Roster loaded: {} student(s) from {}",
                    roster.len(),
                    file_path.display()
                );
                (roster, stats)
            }
            Err(e) => {
                warn!("Roster file {} unusable: {}", file_path.display(), e);
                stats.errors.push(format!("{}: {}", file_path.display(), e));
                (Roster::new(), stats)
            }
        }
    }

    /// Parse a roster file into an ordered registry.
    ///
    /// A UTF-8 BOM is stripped before parsing; the export tool prepends one.
    /// Duplicate emails replace the earlier record in place, keeping the
    /// first-seen roster position.
    pub fn parse_file(&self, file_path: &Path, stats: &mut RosterStats) -> Result<Roster> {
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());

        let content = std::fs::read_to_string(file_path).map_err(|e| {
            Error::io(format!("Failed to read file {}", file_path.display()), e)
        })?;
        let text = content.strip_prefix('\u{feff}').unwrap_or(&content);

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

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

        let mut required = vec![
            self.columns.correo.as_str(),
            self.columns.nombre.as_str(),
            self.columns.apellido.as_str(),
        ];
        if let Some(grupos) = &self.columns.grupos {
            required.push(grupos.as_str());
        }
        let missing = column_map.missing_columns(&required);
        if !missing.is_empty() {
            return Err(Error::schema_mismatch(
                &file_name,
                format!("missing required column(s): {}", missing.join(", ")),
            ));
        }

        let mut roster = Roster::new();
        for result in csv_reader.records() {
            stats.total_rows += 1;

            match result {
                Ok(record) => match self.parse_row(&record, &column_map) {
                    Ok(student) => {
                        if roster.get(&student.email).is_some() {
                            debug!("Replacing earlier roster entry for '{}'", student.email);
                        }
                        roster.insert(student);
                    }
                    Err(e) => {
                        stats.rows_skipped += 1;
                        stats
                            .errors
                            .push(format!("{} row {}: {}", file_name, stats.total_rows, e));
                        debug!("Skipped row {} in '{}': {}", stats.total_rows, file_name, e);
                    }
                },
                Err(e) => {
                    stats.rows_skipped += 1;
                    stats.errors.push(format!(
                        "{} row {}: CSV parse error: {}",
                        file_name, stats.total_rows, e
                    ));
                    debug!(
                        "CSV parse error at row {} in '{}': {}",
                        stats.total_rows, file_name, e
                    );
                }
            }
        }

        stats.students_loaded = roster.len();
        Ok(roster)
    }

    /// Build one student record from a roster row
    fn parse_row(
        &self,
        record: &csv::StringRecord,
        column_map: &ColumnMap,
    ) -> Result<StudentRecord> {
        let raw_email = get_required_field(record, column_map, &self.columns.correo)?;
        let raw_first_name = get_required_field(record, column_map, &self.columns.nombre)?;
        let raw_surname = get_required_field(record, column_map, &self.columns.apellido)?;

        let regional = match &self.columns.grupos {
            Some(grupos) => Some(extract_regional(get_required_field(
                record, column_map, grupos,
            )?)),
            None => None,
        };

        Ok(StudentRecord::new(
            raw_email,
            raw_first_name,
            raw_surname,
            regional,
        ))
    }
}
