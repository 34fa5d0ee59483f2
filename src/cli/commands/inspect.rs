//! Inspect command implementation for the grade report CLI
//!
//! Read-only diagnostics over the configured input directories: which quiz
//! exports are visible, the report column each would produce, and whether
//! the configured headers resolve against each file. Nothing is written.

use super::shared::{PipelineStats, setup_logging};
use crate::app::services::columns::ColumnMap;
use crate::app::services::discovery::{discover_tabular_files, first_tabular_file};
use crate::app::services::grade_reader::quiz_label_for;
use crate::cli::args::InspectArgs;
use crate::config::Config;
use crate::{Error, Result};
use std::path::Path;
use tracing::info;

/// Inspect command runner
pub fn run_inspect(args: InspectArgs) -> Result<PipelineStats> {
    args.validate()?;

    let mut config = Config::load(args.config_file.as_deref())?;
    if let Some(grades_dir) = &args.grades_dir {
        config.grades_dir = grades_dir.clone();
    }
    if let Some(roster_dir) = &args.roster_dir {
        config.roster_dir = roster_dir.clone();
    }
    config.validate()?;

    setup_logging(args.get_log_level(), config.ascii_console)?;
    info!("Inspecting input directories");

    inspect_grades(&config);
    inspect_roster(&config);

    Ok(PipelineStats::default())
}

/// Report each quiz export's derived label and column resolution
fn inspect_grades(config: &Config) {
    let files = discover_tabular_files(&config.grades_dir);
    println!(
        "Quiz exports in '{}': {}",
        config.grades_dir.display(),
        files.len()
    );

    for file in &files {
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        println!("\n  {}", file_name);
        println!("    label: {}", quiz_label_for(&file_name));

        match read_header(file) {
            Ok(column_map) => {
                report_column(&column_map, "email", &config.grade_columns.correo);
                report_column(&column_map, "score", &config.grade_columns.calificacion);
            }
            Err(e) => println!("    unreadable: {}", e),
        }
    }
}

/// Report which roster file would be used and its column resolution
fn inspect_roster(config: &Config) {
    println!("\nRoster directory: {}", config.roster_dir.display());

    let Some(roster_file) = first_tabular_file(&config.roster_dir) else {
        println!("  no tabular roster file found");
        return;
    };
    println!("  selected file: {}", roster_file.display());

    match read_header(&roster_file) {
        Ok(column_map) => {
            report_column(&column_map, "email", &config.roster_columns.correo);
            report_column(&column_map, "first name", &config.roster_columns.nombre);
            report_column(&column_map, "surname", &config.roster_columns.apellido);
            match &config.roster_columns.grupos {
                Some(grupos) => report_column(&column_map, "groups", grupos),
                None => println!("    groups: disabled (no Regional column)"),
            }
        }
        Err(e) => println!("    unreadable: {}", e),
    }
}

/// Parse a file's header record into a column map
fn read_header(path: &Path) -> Result<ColumnMap> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read file {}", path.display()), e))?;
    let text = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = csv_reader.headers().map_err(|e| {
        Error::csv_parsing(
            path.display().to_string(),
            "Failed to read CSV headers",
            Some(e),
        )
    })?;

    Ok(ColumnMap::analyze(headers))
}

/// Print whether one configured column resolves against the header
fn report_column(column_map: &ColumnMap, role: &str, configured: &str) {
    match column_map.get_index(configured) {
        Some(index) => println!("    {}: '{}' found at column {}", role, configured, index),
        None => {
            let mut found: Vec<&str> = column_map.columns().collect();
            found.sort_unstable();
            println!(
                "    {}: '{}' NOT FOUND (headers present: {})",
                role,
                configured,
                found.join(", ")
            );
        }
    }
}
