//! Consolidated report writer
//!
//! The report is roster-driven: one row per roster student in roster order,
//! identity columns first, then one column per quiz label in discovery order.
//! Grade entries whose email never appears in the roster are dropped, and a
//! student without a score for a label gets the missing marker.

use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::app::models::{GradeTable, Roster};
use crate::constants::{MISSING_SCORE_MARKER, report_columns};
use crate::{Error, Result};

/// Statistics for a report write
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct WriteStats {
    /// Data rows written (one per roster student)
    pub rows_written: usize,

    /// Total columns in the report, identity columns included
    pub columns: usize,

    /// Score cells filled from the grade table
    pub cells_filled: usize,

    /// Size of the written report in bytes
    pub bytes_written: u64,
}

/// Write the consolidated report CSV.
///
/// `include_regional` mirrors whether a group column is configured: the
/// `Regional` column is emitted even when the roster came back empty, so a
/// schema mismatch upstream still yields a well-formed (if row-less) report.
pub fn write_report(
    output_path: &Path,
    roster: &Roster,
    grades: &GradeTable,
    labels: &[String],
    include_regional: bool,
) -> Result<WriteStats> {
    info!("Writing consolidated report to: {}", output_path.display());

    let mut writer = WriterBuilder::new().from_path(output_path).map_err(|e| {
        Error::report_writing(
            output_path.display().to_string(),
            "Failed to create output file",
            Some(Box::new(e)),
        )
    })?;

    let mut header: Vec<&str> = Vec::with_capacity(labels.len() + 4);
    if include_regional {
        header.push(report_columns::REGIONAL);
    }
    header.push(report_columns::FIRST_NAME);
    header.push(report_columns::SURNAME);
    header.push(report_columns::EMAIL);
    header.extend(labels.iter().map(String::as_str));

    let mut stats = WriteStats {
        columns: header.len(),
        ..Default::default()
    };

    writer
        .write_record(&header)
        .map_err(|e| record_error(output_path, e))?;

    for student in roster.students() {
        let mut row: Vec<String> = Vec::with_capacity(header.len());
        if include_regional {
            row.push(student.regional.clone().unwrap_or_default());
        }
        row.push(student.first_name.clone());
        row.push(student.surname.clone());
        row.push(student.email.clone());

        for label in labels {
            match grades.score_for(&student.email, label) {
                Some(score) if !score.is_missing() => {
                    row.push(score.to_string());
                    stats.cells_filled += 1;
                }
                _ => row.push(MISSING_SCORE_MARKER.to_string()),
            }
        }

        writer
            .write_record(&row)
            .map_err(|e| record_error(output_path, e))?;
        stats.rows_written += 1;
    }

    writer.flush().map_err(|e| {
        Error::report_writing(
            output_path.display().to_string(),
            "Failed to flush output file",
            Some(Box::new(e)),
        )
    })?;

    stats.bytes_written = std::fs::metadata(output_path)
        .map(|meta| meta.len())
        .unwrap_or(0);

    info!(
        "Report written: {} row(s), {} column(s), {} bytes",
        stats.rows_written, stats.columns, stats.bytes_written
    );

    Ok(stats)
}

fn record_error(path: &Path, e: csv::Error) -> Error {
    Error::report_writing(
        path.display().to_string(),
        "Failed to write record",
        Some(Box::new(e)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{Score, StudentRecord};
    use std::fs;
    use tempfile::TempDir;

    fn roster_with(students: &[(&str, &str, &str, Option<&str>)]) -> Roster {
        let mut roster = Roster::new();
        for (email, first_name, surname, regional) in students {
            roster.insert(StudentRecord::new(
                email,
                first_name,
                surname,
                regional.map(str::to_string),
            ));
        }
        roster
    }

    #[test]
    fn test_report_layout_and_rendering() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("reporte.csv");

        let roster = roster_with(&[("a@x.com", "ana", "ruiz", Some("Medellin"))]);
        let mut grades = GradeTable::new();
        grades.record("a@x.com".to_string(), "Quiz1", Score::Points(8));

        let labels = vec!["Quiz1".to_string()];
        let stats = write_report(&output, &roster, &grades, &labels, true).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content, "Regional,Nombre,Apellido,Correo,Quiz1\nMedellin,Ana,Ruiz,a@x.com,8\n");
        assert_eq!(stats.rows_written, 1);
        assert_eq!(stats.columns, 5);
        assert_eq!(stats.cells_filled, 1);
        assert_eq!(stats.bytes_written, content.len() as u64);
    }

    #[test]
    fn test_missing_scores_render_marker() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("reporte.csv");

        let roster = roster_with(&[
            ("a@x.com", "Ana", "Ruiz", Some("Medellin")),
            ("b@x.com", "Bea", "Soto", Some("Cali")),
        ]);
        let mut grades = GradeTable::new();
        grades.record("a@x.com".to_string(), "Quiz1", Score::Points(9));

        let labels = vec!["Quiz1".to_string(), "Quiz2".to_string()];
        let stats = write_report(&output, &roster, &grades, &labels, true).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "Medellin,Ana,Ruiz,a@x.com,9,-");
        assert_eq!(lines[2], "Cali,Bea,Soto,b@x.com,-,-");
        assert_eq!(stats.cells_filled, 1);
    }

    #[test]
    fn test_non_roster_grades_are_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("reporte.csv");

        let roster = roster_with(&[("a@x.com", "Ana", "Ruiz", None)]);
        let mut grades = GradeTable::new();
        grades.record("a@x.com".to_string(), "Quiz1", Score::Points(8));
        grades.record("fantasma@x.com".to_string(), "Quiz1", Score::Points(10));

        let labels = vec!["Quiz1".to_string()];
        let stats = write_report(&output, &roster, &grades, &labels, false).unwrap();

        assert_eq!(stats.rows_written, 1);
        let content = fs::read_to_string(&output).unwrap();
        assert!(!content.contains("fantasma@x.com"));
        assert_eq!(content.lines().next().unwrap(), "Nombre,Apellido,Correo,Quiz1");
    }

    #[test]
    fn test_duplicate_labels_repeat_column() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("reporte.csv");

        let roster = roster_with(&[("a@x.com", "Ana", "Ruiz", None)]);
        let mut grades = GradeTable::new();
        grades.record("a@x.com".to_string(), "X", Score::Points(5));

        let labels = vec!["X".to_string(), "X".to_string()];
        write_report(&output, &roster, &grades, &labels, false).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Nombre,Apellido,Correo,X,X");
        assert_eq!(lines[1], "Ana,Ruiz,a@x.com,5,5");
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("reporte.csv");

        let roster = roster_with(&[
            ("a@x.com", "Ana", "Ruiz", Some("Medellin")),
            ("b@x.com", "Bea", "Soto", Some("Cali")),
        ]);
        let mut grades = GradeTable::new();
        grades.record("a@x.com".to_string(), "Quiz1", Score::Points(8));

        let labels = vec!["Quiz1".to_string()];
        write_report(&output, &roster, &grades, &labels, true).unwrap();
        let first = fs::read(&output).unwrap();
        write_report(&output, &roster, &grades, &labels, true).unwrap();
        let second = fs::read(&output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        // A directory in place of the output file
        let output = temp_dir.path().join("reporte.csv");
        fs::create_dir(&output).unwrap();

        let roster = roster_with(&[("a@x.com", "Ana", "Ruiz", None)]);
        let grades = GradeTable::new();

        let result = write_report(&output, &roster, &grades, &[], false);
        assert!(matches!(result, Err(Error::ReportWriting { .. })));
    }
}
