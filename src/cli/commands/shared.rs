//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! the CLI command implementations: logging setup (including the ASCII
//! console sink), configuration layering, and run statistics.

use crate::cli::args::ProcessArgs;
use crate::config::Config;
use crate::{Error, Result};
use std::io::Write;
use tracing::{debug, info};
use tracing_subscriber::fmt::MakeWriter;

/// Pipeline statistics for reporting across the run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Grade export files discovered
    pub grade_files_found: usize,
    /// Grade export files fully ingested
    pub grade_files_processed: usize,
    /// Grade export files skipped due to errors
    pub grade_files_skipped: usize,
    /// Scores recorded into the grade table
    pub scores_recorded: usize,
    /// Students loaded from the roster
    pub students_loaded: usize,
    /// Data rows written to the report
    pub rows_written: usize,
    /// Number of errors encountered (files, rows, output)
    pub errors_encountered: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
    /// Report path and size in bytes, once written
    pub output: Option<(String, u64)>,
}

impl PipelineStats {
    /// Format a byte count in human-readable form
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// Stderr sink that replaces non-ASCII bytes with `?`.
///
/// Some consoles the tool runs on cannot render the accented characters the
/// exports are full of; with this sink enabled the log stream degrades to
/// plain ASCII instead of garbling or failing.
#[derive(Debug, Clone, Default)]
pub struct AsciiStderr;

/// Writer produced by [`AsciiStderr`] for each log line
pub struct AsciiWriter<W: Write> {
    inner: W,
}

impl<W: Write> Write for AsciiWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let replaced: Vec<u8> = buf
            .iter()
            .map(|&byte| if byte.is_ascii() { byte } else { b'?' })
            .collect();
        self.inner.write_all(&replaced)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl<'a> MakeWriter<'a> for AsciiStderr {
    type Writer = AsciiWriter<std::io::Stderr>;

    fn make_writer(&'a self) -> Self::Writer {
        AsciiWriter {
            inner: std::io::stderr(),
        }
    }
}

/// Set up structured logging for a command.
///
/// The filter honours `RUST_LOG` when set, otherwise derives the level from
/// the verbosity flags. With `ascii_console` the stderr sink is wrapped so
/// non-ASCII bytes never reach the terminal.
pub fn setup_logging(log_level: &str, ascii_console: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("grade_report={}", log_level)));

    if ascii_console {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(AsciiStderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (file -> args)
pub fn load_configuration(args: &ProcessArgs) -> Result<Config> {
    info!("Loading configuration");

    let mut config = Config::load(args.config_file.as_deref())?;

    // Apply CLI argument overrides
    apply_cli_overrides(&mut config, args);

    // Final validation
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &ProcessArgs) {
    if let Some(grades_dir) = &args.grades_dir {
        config.grades_dir = grades_dir.clone();
    }
    if let Some(roster_dir) = &args.roster_dir {
        config.roster_dir = roster_dir.clone();
    }
    if let Some(output) = &args.output {
        config.output_file = output.clone();
    }
    if let Some(policy) = args.score_policy {
        config.score_policy = policy;
    }
    if args.ascii_console {
        config.ascii_console = true;
    }
}

/// Check if an error is critical enough to stop processing
pub fn is_critical_error(error: &Error) -> bool {
    matches!(error, Error::Configuration { .. })
}
