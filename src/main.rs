use clap::Parser;
use grade_report::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {}", format_error_chain(&error));
            process::exit(1);
        }
    }
}

/// Render an error and every underlying cause on one line
fn format_error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    message
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Grade Report - LMS Quiz Grade Consolidator");
    println!("==========================================");
    println!();
    println!("Consolidates per-quiz grade export files and a student roster into a");
    println!("single CSV report, joined by normalized student email address.");
    println!();
    println!("USAGE:");
    println!("    grade-report <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Generate the consolidated report (main command)");
    println!("    inspect     Report per-file labels and column resolution");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Generate the report with the settings from ./config.json:");
    println!("    grade-report process");
    println!();
    println!("    # Override directories and keep raw score text:");
    println!("    grade-report process --grades-dir ./Calificaciones \\");
    println!("                         --roster-dir \"./Lista de estudiantes\" \\");
    println!("                         --score-policy cruda");
    println!();
    println!("    # Preview which files and columns a run would use:");
    println!("    grade-report process --dry-run");
    println!("    grade-report inspect");
    println!();
    println!("For detailed help on any command, use:");
    println!("    grade-report <COMMAND> --help");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_chain_includes_sources() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = grade_report::Error::io("Failed to read file 'lista.csv'", source);

        let message = format_error_chain(&error);
        assert!(message.starts_with("I/O error: Failed to read file 'lista.csv'"));
        assert!(message.contains("access denied"));
    }

    #[test]
    fn test_format_error_chain_without_source() {
        let error = grade_report::Error::configuration("No config file found");
        assert_eq!(
            format_error_chain(&error),
            "Configuration error: No config file found"
        );
    }
}
