//! Data models for the grade report pipeline
//!
//! This module contains the core data structures for representing quiz scores,
//! roster students, and the grade table the report is built from, together
//! with the normalization rules applied to emails, names, and score cells.

use crate::constants;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Normalization Helpers
// =============================================================================

/// Normalize an email address for use as a join key.
///
/// Both the grade exports and the roster spell emails inconsistently
/// (stray whitespace, mixed case); trimming and lowercasing makes rows
/// from either source land on the same key.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Title-case a name the way the roster export expects it rendered.
///
/// Every letter that follows a non-letter is uppercased, the rest are
/// lowercased, so `"ana maría"` becomes `"Ana María"` and `"o'neill"`
/// becomes `"O'Neill"`.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_boundary = true;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if at_boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_boundary = false;
        } else {
            out.push(ch);
            at_boundary = true;
        }
    }
    out
}

// =============================================================================
// Score and Score Policy
// =============================================================================

/// A single quiz score cell after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Score {
    /// Numeric score rounded to whole points
    Points(i64),

    /// Score cell carried through unmodified (raw policy)
    Raw(String),

    /// No usable score; rendered as the missing marker
    Missing,
}

impl Score {
    /// Evaluate a raw score cell under the given policy.
    ///
    /// An exact missing marker stays missing under either policy. The numeric
    /// policy tolerates decimal commas and rounds half away from zero
    /// (`"8,5"` → 9); anything unparsable becomes [`Score::Missing`]. The raw
    /// policy keeps the cell text as-is.
    pub fn evaluate(cell: &str, policy: ScorePolicy) -> Self {
        if cell == constants::MISSING_SCORE_MARKER {
            return Score::Missing;
        }
        match policy {
            ScorePolicy::Numeric => match cell.replace(',', ".").trim().parse::<f64>() {
                // "inf"/"nan" parse as floats but are not scores
                Ok(value) if value.is_finite() => Score::Points(value.round() as i64),
                _ => Score::Missing,
            },
            ScorePolicy::Raw => Score::Raw(cell.to_string()),
        }
    }

    /// Check whether this score renders as the missing marker
    pub fn is_missing(&self) -> bool {
        matches!(self, Score::Missing)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Points(points) => write!(f, "{}", points),
            Score::Raw(text) => write!(f, "{}", text),
            Score::Missing => write!(f, "{}", constants::MISSING_SCORE_MARKER),
        }
    }
}

/// How score cells from the grade exports are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScorePolicy {
    /// Coerce to whole points: decimal-comma tolerant float parse + rounding
    #[default]
    #[serde(rename = "numerica", alias = "numeric")]
    Numeric,

    /// Carry the cell text through unmodified
    #[serde(rename = "cruda", alias = "raw")]
    Raw,
}

impl FromStr for ScorePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "numerica" | "numeric" => Ok(ScorePolicy::Numeric),
            "cruda" | "raw" => Ok(ScorePolicy::Raw),
            _ => Err(Error::configuration(format!(
                "Invalid score policy '{}': must be 'numerica' or 'cruda'",
                s
            ))),
        }
    }
}

impl fmt::Display for ScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorePolicy::Numeric => write!(f, "numerica"),
            ScorePolicy::Raw => write!(f, "cruda"),
        }
    }
}

// =============================================================================
// Student Record
// =============================================================================

/// One roster student with normalized identity fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    /// Normalized email - primary key for the grade join
    pub email: String,

    /// Title-cased first name
    pub first_name: String,

    /// Title-cased surname
    pub surname: String,

    /// Regional extracted from the group cell; `None` when the roster
    /// carries no group column
    pub regional: Option<String>,
}

impl StudentRecord {
    /// Create a record from raw roster cells, applying the normalization
    /// rules (email trimmed + lowercased, names title-cased)
    pub fn new(
        raw_email: &str,
        raw_first_name: &str,
        raw_surname: &str,
        regional: Option<String>,
    ) -> Self {
        Self {
            email: normalize_email(raw_email),
            first_name: title_case(raw_first_name),
            surname: title_case(raw_surname),
            regional,
        }
    }
}

// =============================================================================
// Roster
// =============================================================================

/// The ordered student registry keyed by normalized email.
///
/// Iteration order is roster-file order; re-inserting an existing email
/// replaces the record in place, so the first-seen position is kept while
/// the last data wins.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: IndexMap<String, StudentRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self {
            students: IndexMap::new(),
        }
    }

    /// Insert a student, keyed by their normalized email
    pub fn insert(&mut self, record: StudentRecord) {
        self.students.insert(record.email.clone(), record);
    }

    /// Look up a student by normalized email
    pub fn get(&self, email: &str) -> Option<&StudentRecord> {
        self.students.get(email)
    }

    /// Iterate students in roster-file order
    pub fn students(&self) -> impl Iterator<Item = &StudentRecord> {
        self.students.values()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

// =============================================================================
// Grade Table
// =============================================================================

/// All scores read from the grade exports: email → (quiz label → score).
///
/// Recording a score for an (email, label) pair that already exists
/// overwrites it - last file processed wins.
#[derive(Debug, Clone, Default)]
pub struct GradeTable {
    scores: HashMap<String, HashMap<String, Score>>,
}

impl GradeTable {
    pub fn new() -> Self {
        Self {
            scores: HashMap::new(),
        }
    }

    /// Record a score for a student under a quiz label (last write wins)
    pub fn record(&mut self, email: String, label: &str, score: Score) {
        self.scores
            .entry(email)
            .or_default()
            .insert(label.to_string(), score);
    }

    /// Look up a student's score for a quiz label
    pub fn score_for(&self, email: &str, label: &str) -> Option<&Score> {
        self.scores.get(email).and_then(|per_quiz| per_quiz.get(label))
    }

    /// Number of distinct students with at least one score
    pub fn student_count(&self) -> usize {
        self.scores.len()
    }

    /// Total number of stored (student, quiz) scores
    pub fn score_count(&self) -> usize {
        self.scores.values().map(|per_quiz| per_quiz.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
