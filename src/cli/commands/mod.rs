//! Command implementations for the grade report CLI
//!
//! This module contains the main command execution logic, progress reporting,
//! and error handling for the CLI interface. Each command is implemented in
//! its own module:
//! - `process`: full pipeline run producing the consolidated report
//! - `inspect`: read-only per-file label and column diagnostics

pub mod inspect;
pub mod process;
pub mod shared;

// Re-export the main types and functions for convenient access
pub use shared::PipelineStats;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner for the grade report tool
///
/// Dispatches to the appropriate subcommand handler based on CLI args.
pub fn run(args: Args) -> Result<PipelineStats> {
    match args.get_command() {
        Commands::Process(process_args) => process::run_process(process_args),
        Commands::Inspect(inspect_args) => inspect::run_inspect(inspect_args),
    }
}
