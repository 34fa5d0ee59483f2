//! Command-line argument definitions for the grade report tool
//!
//! This module defines the complete CLI interface using clap derive API.
//! Every flag that overlaps a config-file key overrides the file value.

use crate::app::models::ScorePolicy;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the grade report generator
///
/// Consolidates per-quiz grade exports from a learning management system
/// and a student roster into a single CSV report keyed by student email.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "grade-report",
    version,
    about = "Consolidate LMS quiz grade exports and a student roster into one CSV report",
    long_about = "Reads a directory of per-quiz grade export files and a student roster export, \
                  joins them by normalized email address, and writes a single consolidated CSV \
                  report with one row per roster student and one column per quiz. Scores are \
                  normalized under a configurable policy and missing values are marked with '-'."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the grade report tool
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Generate the consolidated report (default command)
    Process(ProcessArgs),
    /// Report per-file labels and column resolution without writing anything
    Inspect(InspectArgs),
}

/// Arguments for the process command (report generation)
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Path to configuration file
    ///
    /// JSON configuration file with the input/output paths and column
    /// mappings. If not specified, looks for ./config.json and then the
    /// per-user config directory.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Directory holding the per-quiz grade export files
    ///
    /// Overrides `ruta_calificaciones` from the config file.
    #[arg(
        short = 'g',
        long = "grades-dir",
        value_name = "PATH",
        help = "Directory holding the per-quiz grade exports"
    )]
    pub grades_dir: Option<PathBuf>,

    /// Directory holding the student roster export
    ///
    /// Only the first tabular file (in name order) is read. Overrides
    /// `ruta_estudiantes` from the config file.
    #[arg(
        short = 'r',
        long = "roster-dir",
        value_name = "PATH",
        help = "Directory holding the student roster export"
    )]
    pub roster_dir: Option<PathBuf>,

    /// Output path for the consolidated report
    ///
    /// Overwritten if it exists. Overrides `archivo_salida` from the
    /// config file.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output path for the consolidated report"
    )]
    pub output: Option<PathBuf>,

    /// Score interpretation policy
    ///
    /// `numerica` coerces scores to whole points (decimal-comma tolerant,
    /// unparsable values become '-'); `cruda` carries the score text through
    /// unmodified. Overrides `politica_calificaciones` from the config file.
    #[arg(
        long = "score-policy",
        value_name = "POLICY",
        help = "Score interpretation policy: numerica or cruda"
    )]
    pub score_policy: Option<ScorePolicy>,

    /// Replace non-ASCII bytes in console log output
    ///
    /// For consoles that cannot render the exports' accented characters.
    /// Overrides `consola_ascii` from the config file.
    #[arg(
        long = "ascii-console",
        help = "Replace non-ASCII bytes in console log output with '?'"
    )]
    pub ascii_console: bool,

    /// Perform a dry run without reading row data or writing output
    ///
    /// Shows which files would be processed and which report columns they
    /// would produce. Useful for previewing operations and validating
    /// configuration.
    #[arg(
        long = "dry-run",
        help = "Show what would be processed without writing the report"
    )]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the run summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the run summary"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the inspect command (input diagnostics)
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Path to configuration file
    ///
    /// Same resolution order as the process command.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Directory holding the per-quiz grade export files
    #[arg(
        short = 'g',
        long = "grades-dir",
        value_name = "PATH",
        help = "Directory holding the per-quiz grade exports"
    )]
    pub grades_dir: Option<PathBuf>,

    /// Directory holding the student roster export
    #[arg(
        short = 'r',
        long = "roster-dir",
        value_name = "PATH",
        help = "Directory holding the student roster export"
    )]
    pub roster_dir: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options for the run summary
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(grades_dir) = &self.grades_dir {
            validate_directory(grades_dir, "Grades directory")?;
        }
        if let Some(roster_dir) = &self.roster_dir {
            validate_directory(roster_dir, "Roster directory")?;
        }

        // Validate config file exists if specified
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl InspectArgs {
    /// Validate the inspect command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(grades_dir) = &self.grades_dir {
            validate_directory(grades_dir, "Grades directory")?;
        }
        if let Some(roster_dir) = &self.roster_dir {
            validate_directory(roster_dir, "Roster directory")?;
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Check that an explicitly provided path is an existing directory
fn validate_directory(path: &PathBuf, label: &str) -> Result<()> {
    if !path.exists() {
        return Err(Error::configuration(format!(
            "{} does not exist: {}",
            label,
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(Error::configuration(format!(
            "{} is not a directory: {}",
            label,
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn process_args() -> ProcessArgs {
        ProcessArgs {
            config_file: None,
            grades_dir: None,
            roster_dir: None,
            output: None,
            score_policy: None,
            ascii_console: false,
            dry_run: false,
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }

    #[test]
    fn test_default_args_validate() {
        assert!(process_args().validate().is_ok());
    }

    #[test]
    fn test_missing_grades_dir_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let args = ProcessArgs {
            grades_dir: Some(temp_dir.path().join("no_existe")),
            ..process_args()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_file_as_roster_dir_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("lista.csv");
        std::fs::write(&file, "contenido").unwrap();

        let args = ProcessArgs {
            roster_dir: Some(file),
            ..process_args()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_missing_config_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let args = ProcessArgs {
            config_file: Some(temp_dir.path().join("no_existe.json")),
            ..process_args()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level_mapping() {
        let mut args = process_args();
        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");
        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");
        args.verbose = 5;
        assert_eq!(args.get_log_level(), "trace");

        args.verbose = 0;
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }

    #[test]
    fn test_score_policy_flag_parses() {
        let args =
            Args::parse_from(["grade-report", "process", "--score-policy", "cruda"]);
        match args.get_command() {
            Commands::Process(process) => {
                assert_eq!(process.score_policy, Some(ScorePolicy::Raw));
            }
            _ => panic!("expected process command"),
        }
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let args = Args::parse_from(["grade-report"]);
        assert!(args.command.is_none());
    }
}
