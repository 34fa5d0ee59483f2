//! Tests for grade scan statistics

use crate::app::services::grade_reader::GradeStats;

#[test]
fn test_success_rate_no_rows_is_zero() {
    let stats = GradeStats::new();
    assert_eq!(stats.success_rate(), 0.0);
}

#[test]
fn test_success_rate_partial() {
    let stats = GradeStats {
        total_rows: 4,
        scores_recorded: 3,
        rows_skipped: 1,
        ..Default::default()
    };
    assert_eq!(stats.success_rate(), 75.0);
}

#[test]
fn test_success_rate_all_rows_recorded() {
    let stats = GradeStats {
        total_rows: 10,
        scores_recorded: 10,
        ..Default::default()
    };
    assert_eq!(stats.success_rate(), 100.0);
}
