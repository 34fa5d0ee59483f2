//! Reader for the per-quiz grade export files
//!
//! Each file in the grades directory is one quiz export: a CSV with a header
//! record and one row per student attempt. This module derives a quiz label
//! from each file name, checks the configured columns against the header, and
//! ingests (email, score) pairs into the grade table with per-row and
//! per-file error recovery.
//!
//! ## Architecture
//!
//! - [`reader`] - Directory scan orchestration and per-file parsing
//! - [`labels`] - Quiz label derivation from export file names
//! - [`stats`] - Scan statistics and result structures

pub mod labels;
pub mod reader;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use labels::quiz_label_for;
pub use reader::GradeReader;
pub use stats::{FileParse, GradeScan, GradeStats};
