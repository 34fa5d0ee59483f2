//! Tests for the grade export reader

use super::*;
use crate::Error;
use crate::app::models::{Score, ScorePolicy};
use crate::app::services::grade_reader::GradeReader;
use tempfile::TempDir;

fn reader(policy: ScorePolicy) -> GradeReader {
    GradeReader::new(test_columns(), policy)
}

#[test]
fn test_parse_file_scores_and_label() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_export(
        temp_dir.path(),
        "Cuestionario Quiz1 - final.csv",
        &[(" A@X.COM ", "7,6"), ("b@x.com", "-"), ("c@x.com", "abc")],
    );

    let parse = reader(ScorePolicy::Numeric).parse_file(&path).unwrap();

    assert_eq!(parse.label, "Quiz1");
    assert_eq!(parse.total_rows, 3);
    assert_eq!(parse.rows_skipped, 0);
    assert_eq!(
        parse.scores,
        vec![
            ("a@x.com".to_string(), Score::Points(8)),
            ("b@x.com".to_string(), Score::Missing),
            ("c@x.com".to_string(), Score::Missing),
        ]
    );
}

#[test]
fn test_parse_file_raw_policy() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_export(
        temp_dir.path(),
        "Cuestionario Quiz1 - final.csv",
        &[("a@x.com", "8,5"), ("b@x.com", "-")],
    );

    let parse = reader(ScorePolicy::Raw).parse_file(&path).unwrap();

    assert_eq!(
        parse.scores,
        vec![
            ("a@x.com".to_string(), Score::Raw("8,5".to_string())),
            ("b@x.com".to_string(), Score::Missing),
        ]
    );
}

#[test]
fn test_parse_file_header_mismatch() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_raw(
        temp_dir.path(),
        "Cuestionario Quiz1 - final.csv",
        "Nombre,Correo electronico,Nota\nAlguien,a@x.com,8\n",
    );

    let result = reader(ScorePolicy::Numeric).parse_file(&path);
    assert!(matches!(result, Err(Error::SchemaMismatch { .. })));
}

#[test]
fn test_parse_file_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no_existe.csv");

    let result = reader(ScorePolicy::Numeric).parse_file(&path);
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_ragged_row_skipped_rest_kept() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_raw(
        temp_dir.path(),
        "Cuestionario Quiz1 - final.csv",
        "Nombre,Dirección de correo,\"Calificación/10,00\"\n\
         Alguien,a@x.com,8\n\
         truncada\n\
         Alguien,b@x.com,9\n",
    );

    let parse = reader(ScorePolicy::Numeric).parse_file(&path).unwrap();

    assert_eq!(parse.total_rows, 3);
    assert_eq!(parse.rows_skipped, 1);
    assert_eq!(parse.row_errors.len(), 1);
    assert_eq!(
        parse.scores,
        vec![
            ("a@x.com".to_string(), Score::Points(8)),
            ("b@x.com".to_string(), Score::Points(9)),
        ]
    );
}

#[test]
fn test_empty_email_cell_is_kept_as_is() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_export(
        temp_dir.path(),
        "Cuestionario Quiz1 - final.csv",
        &[("", "7")],
    );

    let parse = reader(ScorePolicy::Numeric).parse_file(&path).unwrap();

    // An empty email is stored as-is; it simply never joins a roster entry
    assert_eq!(parse.scores, vec![("".to_string(), Score::Points(7))]);
}

#[test]
fn test_read_directory_skips_bad_files() {
    let temp_dir = TempDir::new().unwrap();
    write_export(
        temp_dir.path(),
        "Cuestionario A - g1.csv",
        &[("a@x.com", "8")],
    );
    write_raw(
        temp_dir.path(),
        "Cuestionario B - g1.csv",
        "Nombre,Otra columna\nAlguien,valor\n",
    );
    write_raw(temp_dir.path(), "LEEME.txt", "no soy un export");

    let scan = reader(ScorePolicy::Numeric).read_directory(temp_dir.path(), false);

    // Only the file that passed the header check contributes a label
    assert_eq!(scan.labels, vec!["A"]);
    assert_eq!(scan.stats.files_found, 2);
    assert_eq!(scan.stats.files_processed, 1);
    assert_eq!(scan.stats.files_skipped, 1);
    assert_eq!(scan.stats.scores_recorded, 1);
    assert_eq!(scan.stats.errors.len(), 1);
    assert_eq!(scan.table.score_for("a@x.com", "A"), Some(&Score::Points(8)));
}

#[test]
fn test_read_directory_duplicate_labels_last_file_wins() {
    let temp_dir = TempDir::new().unwrap();
    write_export(
        temp_dir.path(),
        "Cuestionario X - a.csv",
        &[("a@x.com", "9")],
    );
    write_export(
        temp_dir.path(),
        "Cuestionario X - b.csv",
        &[("a@x.com", "5")],
    );

    let scan = reader(ScorePolicy::Numeric).read_directory(temp_dir.path(), false);

    // Both files keep their label slot, the later file's score wins
    assert_eq!(scan.labels, vec!["X", "X"]);
    assert_eq!(scan.table.score_for("a@x.com", "X"), Some(&Score::Points(5)));
    assert_eq!(scan.table.score_count(), 1);
}

#[test]
fn test_read_directory_missing_dir_is_empty_scan() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("no_existe");

    let scan = reader(ScorePolicy::Numeric).read_directory(&missing, false);

    assert!(scan.labels.is_empty());
    assert!(scan.table.is_empty());
    assert_eq!(scan.stats.files_found, 0);
}
