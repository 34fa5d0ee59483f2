//! Application constants for the grade report pipeline
//!
//! This module contains the default values and patterns used throughout the
//! application: input/output locations, the column headers Moodle exports use,
//! and the filename/group patterns the readers match against.

use std::path::Path;

// =============================================================================
// Directory and File Defaults
// =============================================================================

/// Default directory holding the per-quiz grade export files
pub const DEFAULT_GRADES_DIR: &str = "Calificaciones";

/// Default directory holding the student roster export
pub const DEFAULT_ROSTER_DIR: &str = "Lista de estudiantes";

/// Default consolidated report filename
pub const DEFAULT_OUTPUT_FILENAME: &str = "reporte_final.csv";

/// Configuration filename looked up in the working directory
pub const CONFIG_FILENAME: &str = "config.json";

/// Per-user configuration directory name (under the platform config dir)
pub const CONFIG_DIR_NAME: &str = "grade-report";

/// Recognized tabular file extension (case-sensitive, matching the exports)
pub const TABULAR_EXTENSION: &str = "csv";

// =============================================================================
// Filename and Group Patterns
// =============================================================================

/// Pattern extracting the quiz label from an export filename.
///
/// Moodle names quiz exports `Cuestionario <name> - <suffix>.csv` (sometimes
/// `Cuestionario de <name> - <suffix>.csv`); capture group 1 is the label.
/// Filenames that do not match keep their full name as the label.
pub const QUIZ_LABEL_PATTERN: &str = r"Cuestionario(?: de)? (.*?) -";

/// Pattern matching a section code entry in the roster's group cell.
///
/// Section codes look like `M2023-01`; the regional is the first group entry
/// that is NOT a section code.
pub const SECTION_CODE_PATTERN: &str = r"^M\d{4}-\d{2}";

// =============================================================================
// Column Name Defaults
// =============================================================================

/// Default column headers in the quiz grade exports
pub mod grade_columns {
    pub const EMAIL: &str = "Dirección de correo";
    pub const SCORE: &str = "Calificación/10,00";
}

/// Default column headers in the student roster export
pub mod roster_columns {
    pub const EMAIL: &str = "Dirección de correo";
    pub const FIRST_NAME: &str = "Nombre";
    pub const SURNAME: &str = "Apellido(s)";
    pub const GROUPS: &str = "Grupos";
}

/// Column headers of the consolidated report
pub mod report_columns {
    pub const REGIONAL: &str = "Regional";
    pub const FIRST_NAME: &str = "Nombre";
    pub const SURNAME: &str = "Apellido";
    pub const EMAIL: &str = "Correo";
}

// =============================================================================
// Score Rendering
// =============================================================================

/// Marker for a missing or unparsable score, in both input and output
pub const MISSING_SCORE_MARKER: &str = "-";

// =============================================================================
// Helper Functions
// =============================================================================

/// Check whether a path carries the recognized tabular extension
pub fn is_tabular_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == TABULAR_EXTENSION)
        .unwrap_or(false)
}
