//! Grade Report Library
//!
//! A Rust library for consolidating per-quiz grade exports from a learning
//! management system, together with a student roster, into a single CSV
//! report keyed by student email.
//!
//! This library provides tools for:
//! - Discovering quiz export files and deriving a quiz label per file
//! - Parsing grade files with configurable column mappings
//! - Loading an ordered student roster with regional group extraction
//! - Normalizing scores under selectable policies
//! - Joining grades onto the roster by normalized email
//! - Writing the consolidated delimited report
//! - Error recovery that skips bad files and rows instead of aborting

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod columns;
        pub mod discovery;
        pub mod grade_reader;
        pub mod report_writer;
        pub mod roster_reader;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Roster, Score, ScorePolicy, StudentRecord};
pub use config::Config;

/// Result type alias for grade report operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for grade report operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Required columns missing from a file's header
    #[error("Schema mismatch in file '{file}': {message}")]
    SchemaMismatch { file: String, message: String },

    /// Report writing error
    #[error("Report writing error for '{path}': {message}")]
    ReportWriting {
        path: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a report writing error
    pub fn report_writing(
        path: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ReportWriting {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

// The only JSON this crate reads is the configuration file
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Configuration {
            message: format!("invalid configuration JSON: {error}"),
        }
    }
}
