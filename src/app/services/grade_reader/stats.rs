//! Scan statistics and result structures for grade ingestion
//!
//! This module provides the per-file parse result and the aggregate scan
//! result handed to the join stage and the run summary.

use crate::app::models::{GradeTable, Score};

/// Result of scanning a whole grades directory
#[derive(Debug, Clone, Default)]
pub struct GradeScan {
    /// All ingested scores, keyed by normalized email then quiz label
    pub table: GradeTable,

    /// Quiz labels in discovery order, one per file that passed the header
    /// check (duplicates kept)
    pub labels: Vec<String>,

    /// Aggregate statistics for the scan
    pub stats: GradeStats,
}

impl GradeScan {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Result of parsing a single quiz export file
#[derive(Debug, Clone)]
pub struct FileParse {
    /// Label derived from the file name
    pub label: String,

    /// Successfully parsed (normalized email, score) pairs in row order
    pub scores: Vec<(String, Score)>,

    /// Total number of data rows encountered
    pub total_rows: usize,

    /// Number of rows skipped due to errors
    pub rows_skipped: usize,

    /// Row-level error descriptions for diagnostics
    pub row_errors: Vec<String>,
}

impl FileParse {
    pub fn new(label: String) -> Self {
        Self {
            label,
            scores: Vec::new(),
            total_rows: 0,
            rows_skipped: 0,
            row_errors: Vec::new(),
        }
    }
}

/// Aggregate statistics for a grades-directory scan
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct GradeStats {
    /// Tabular files discovered in the directory
    pub files_found: usize,

    /// Files fully ingested (header check passed)
    pub files_processed: usize,

    /// Files skipped due to file-level or schema errors
    pub files_skipped: usize,

    /// Total data rows encountered across processed files
    pub total_rows: usize,

    /// Scores recorded into the grade table
    pub scores_recorded: usize,

    /// Rows skipped due to row-level errors
    pub rows_skipped: usize,

    /// Error descriptions accumulated across the scan
    pub errors: Vec<String>,
}

impl GradeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate row-level success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.scores_recorded as f64 / self.total_rows as f64) * 100.0
        }
    }
}
