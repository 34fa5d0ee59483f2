//! Tests for quiz label derivation from export file names

use crate::app::services::grade_reader::quiz_label_for;

#[test]
fn test_label_with_de_prefix() {
    assert_eq!(
        quiz_label_for("Cuestionario de Matematicas - grupo1.csv"),
        "Matematicas"
    );
}

#[test]
fn test_label_without_de_prefix() {
    assert_eq!(quiz_label_for("Cuestionario Quiz1 - final.csv"), "Quiz1");
}

#[test]
fn test_label_stops_at_first_dash() {
    assert_eq!(
        quiz_label_for("Cuestionario de Historia del Arte - M2023 - 01.csv"),
        "Historia del Arte"
    );
}

#[test]
fn test_unmatched_name_kept_whole() {
    assert_eq!(quiz_label_for("Reporte.csv"), "Reporte.csv");
    assert_eq!(quiz_label_for("Notas - final.csv"), "Notas - final.csv");
}

#[test]
fn test_multi_word_label() {
    assert_eq!(
        quiz_label_for("Cuestionario Algebra Lineal - seccion2.csv"),
        "Algebra Lineal"
    );
}
