//! Process command implementation for the grade report CLI
//!
//! This module contains the complete report generation workflow including
//! configuration loading, grade and roster ingestion, the roster-driven
//! join, and run summary generation.

use super::shared::{PipelineStats, is_critical_error, load_configuration, setup_logging};
use crate::app::services::discovery::{discover_tabular_files, first_tabular_file};
use crate::app::services::grade_reader::{GradeReader, quiz_label_for};
use crate::app::services::report_writer::write_report;
use crate::app::services::roster_reader::RosterReader;
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::config::Config;
use crate::Result;
use colored::Colorize;
use indicatif::HumanDuration;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Process command runner for the grade report tool
///
/// This function orchestrates the entire pipeline:
/// 1. Load and validate configuration, set up logging
/// 2. Ingest the quiz grade exports and the student roster
/// 3. Join them roster-first and write the consolidated report
/// 4. Generate summary statistics
pub fn run_process(args: ProcessArgs) -> Result<PipelineStats> {
    let start_time = Instant::now();

    // Validate arguments
    args.validate()?;

    // Configuration comes first: the console sink choice lives in it
    let config = load_configuration(&args)?;
    setup_logging(args.get_log_level(), config.ascii_console)?;

    info!("Starting grade report generation");
    debug!("Command line arguments: {:?}", args);
    debug!("Effective configuration: {:?}", config);

    if args.dry_run {
        return run_dry_run(&config);
    }

    let mut stats = execute_pipeline(&config, args.show_progress())?;
    stats.processing_time = start_time.elapsed();

    // Generate final report
    generate_final_report(&args, &stats)?;

    if !args.quiet && matches!(args.output_format, OutputFormat::Human) {
        match &stats.output {
            Some((path, _)) => println!(
                "{}",
                format!("✅ Reporte generado: {}", path).green().bold()
            ),
            None => println!(
                "{}",
                format!(
                    "⚠️  No se pudo escribir el reporte en: {}",
                    config.output_file.display()
                )
                .red()
                .bold()
            ),
        }
    }

    Ok(stats)
}

/// Run the ingest, join, and write stages against a resolved configuration.
///
/// A report write failure is recoverable like every other I/O failure in the
/// pipeline: it is logged, counted in the stats, and leaves `stats.output`
/// empty; the run still completes normally. Only critical errors propagate.
fn execute_pipeline(config: &Config, show_progress: bool) -> Result<PipelineStats> {
    let mut stats = PipelineStats::default();

    // Ingest the quiz exports
    let reader = GradeReader::new(config.grade_columns.clone(), config.score_policy);
    let scan = reader.read_directory(&config.grades_dir, show_progress);
    stats.grade_files_found = scan.stats.files_found;
    stats.grade_files_processed = scan.stats.files_processed;
    stats.grade_files_skipped = scan.stats.files_skipped;
    stats.scores_recorded = scan.stats.scores_recorded;
    stats.errors_encountered += scan.stats.errors.len();

    // Load the roster
    let roster_reader = RosterReader::new(config.roster_columns.clone());
    let (roster, roster_stats) = roster_reader.load_directory(&config.roster_dir);
    stats.students_loaded = roster.len();
    stats.errors_encountered += roster_stats.errors.len();

    if roster.is_empty() {
        warn!("Roster is empty; the report will have headers but no data rows");
    }

    // Join and write the report
    let include_regional = config.roster_columns.grupos.is_some();
    match write_report(
        &config.output_file,
        &roster,
        &scan.table,
        &scan.labels,
        include_regional,
    ) {
        Ok(write_stats) => {
            stats.rows_written = write_stats.rows_written;
            stats.output = Some((
                config.output_file.display().to_string(),
                write_stats.bytes_written,
            ));
        }
        Err(e) if !is_critical_error(&e) => {
            error!("Failed to write report: {}", e);
            stats.errors_encountered += 1;
        }
        Err(e) => return Err(e),
    }

    Ok(stats)
}

/// Perform a dry run showing what would be processed
fn run_dry_run(config: &Config) -> Result<PipelineStats> {
    info!("Performing dry run - no files will be read row by row or written");

    let mut stats = PipelineStats::default();

    let grade_files = discover_tabular_files(&config.grades_dir);
    stats.grade_files_found = grade_files.len();

    println!("Dry run: {} quiz export(s) found", grade_files.len());
    for file in &grade_files {
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        println!(
            "  would process '{}' as column '{}'",
            file_name,
            quiz_label_for(&file_name)
        );
    }

    match first_tabular_file(&config.roster_dir) {
        Some(roster_file) => {
            println!("  would read roster from '{}'", roster_file.display());
        }
        None => {
            warn!(
                "No roster file found in '{}'",
                config.roster_dir.display()
            );
            println!(
                "  no roster file in '{}' - report would be empty",
                config.roster_dir.display()
            );
        }
    }

    println!("  would write report to '{}'", config.output_file.display());

    info!(
        "Dry run complete: {} quiz export(s) would be processed",
        stats.grade_files_found
    );

    Ok(stats)
}

/// Generate the final run summary in the requested format
fn generate_final_report(args: &ProcessArgs, stats: &PipelineStats) -> Result<()> {
    info!("Generating final report");

    match args.output_format {
        OutputFormat::Human => {
            if !args.quiet {
                generate_human_report(stats)?;
            }
            Ok(())
        }
        OutputFormat::Json => generate_json_report(stats),
    }
}

/// Generate human-readable report
fn generate_human_report(stats: &PipelineStats) -> Result<()> {
    let duration = HumanDuration(stats.processing_time);

    println!("\n🎓 Grade Report Complete!");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📊 Processing Summary:");
    println!(
        "   • Quiz exports processed: {} of {}",
        stats.grade_files_processed, stats.grade_files_found
    );
    if stats.grade_files_skipped > 0 {
        println!("   • Quiz exports skipped: {}", stats.grade_files_skipped);
    }
    println!("   • Scores recorded: {}", stats.scores_recorded);
    println!("   • Students in roster: {}", stats.students_loaded);
    println!("   • Report rows written: {}", stats.rows_written);
    println!("   • Processing time: {}", duration);

    if let Some((path, size)) = &stats.output {
        println!(
            "   • Report file: {} ({})",
            path,
            PipelineStats::format_size(*size)
        );
    }

    if stats.errors_encountered > 0 {
        println!("⚠️  Errors encountered: {}", stats.errors_encountered);
    }

    println!();
    Ok(())
}

/// Generate JSON report for machine consumption
fn generate_json_report(stats: &PipelineStats) -> Result<()> {
    let json_stats = serde_json::json!({
        "grade_files_found": stats.grade_files_found,
        "grade_files_processed": stats.grade_files_processed,
        "grade_files_skipped": stats.grade_files_skipped,
        "scores_recorded": stats.scores_recorded,
        "students_loaded": stats.students_loaded,
        "rows_written": stats.rows_written,
        "errors_encountered": stats.errors_encountered,
        "processing_time_seconds": stats.processing_time.as_secs_f64(),
        "output_file": stats.output.as_ref().map(|(path, _)| path.clone()),
        "output_size_bytes": stats.output.as_ref().map(|(_, size)| *size),
    });

    println!("{}", serde_json::to_string_pretty(&json_stats).unwrap());
    Ok(())
}
