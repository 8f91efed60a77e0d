use colored::Colorize;

use keeper_core::command::CommandReport;

/// Text for a failed report, `None` on success.
pub fn error_line(report: &CommandReport) -> Option<String> {
    report
        .result
        .as_ref()
        .err()
        .map(|e| format!("Error in '{}': {}", report.command, e))
}

/// Writes results to stdout and errors to stderr. Returns whether every
/// command succeeded.
///
/// A command that failed part-way still prints what it did before the error.
pub fn print_reports(reports: &[CommandReport], styled: bool) -> bool {
    let mut all_ok = true;
    for report in reports {
        for line in report.output_lines() {
            println!("{line}");
        }
        if let Some(line) = error_line(report) {
            all_ok = false;
            if styled {
                eprintln!("{}", line.red());
            } else {
                eprintln!("{line}");
            }
        }
    }
    all_ok
}
