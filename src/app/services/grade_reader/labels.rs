//! Quiz label derivation from export file names
//!
//! Moodle names its quiz exports `Cuestionario <name> - <suffix>.csv` (with
//! an optional `de` after `Cuestionario`). The label is what sits between the
//! prefix and the ` -`; a file name that does not follow the convention keeps
//! its full name, extension included, so it still gets a report column.

use crate::constants::QUIZ_LABEL_PATTERN;
use regex::Regex;
use std::sync::OnceLock;

static QUIZ_LABEL_RE: OnceLock<Regex> = OnceLock::new();

fn quiz_label_re() -> &'static Regex {
    QUIZ_LABEL_RE.get_or_init(|| {
        Regex::new(QUIZ_LABEL_PATTERN).expect("quiz label pattern is a valid regex")
    })
}

/// Derive the quiz label for an export file name
pub fn quiz_label_for(file_name: &str) -> String {
    quiz_label_re()
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|label| label.as_str().to_string())
        .unwrap_or_else(|| file_name.to_string())
}
