//! Report formatting and printing utilities.
//!
//! Diagnostics are displayed cargo-style. Kept out of the core so glean can be
//! used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, ExtractSummary, InitSummary, ReportedDiagnostic,
};
use crate::config::CONFIG_FILE_NAME;
use crate::issues::Severity;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print diagnostics to stdout.
pub fn report(diagnostics: &[ReportedDiagnostic]) {
    report_to(diagnostics, &mut io::stdout().lock());
}

/// Print diagnostics to a custom writer, in the order given.
pub fn report_to<W: Write>(diagnostics: &[ReportedDiagnostic], writer: &mut W) {
    if diagnostics.is_empty() {
        return;
    }

    let max_line_width = calculate_max_line_width(diagnostics);
    for reported in diagnostics {
        print_diagnostic(reported, writer, max_line_width);
    }

    print_summary(diagnostics, writer);
}

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Extract(summary) => {
            report(&result.diagnostics);
            print_extract_to(summary, result.error_count, &mut io::stdout().lock());
            print_skipped_warning(result.skipped_count, verbose);
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_diagnostic<W: Write>(
    reported: &ReportedDiagnostic,
    writer: &mut W,
    max_line_width: usize,
) {
    let diagnostic = &reported.diagnostic;
    let severity_str = match diagnostic.severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };
    let _ = writeln!(writer, "{}: {}", severity_str, diagnostic.message);

    // Clickable location: --> path:line:col
    let Some(location) = diagnostic.location else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), diagnostic.resource);
        let _ = writeln!(writer);
        return;
    };
    let _ = writeln!(
        writer,
        "  {} {}:{}",
        "-->".blue(),
        diagnostic.resource,
        location
    );

    if let Some(source_line) = &reported.source_line {
        let caret_char = match diagnostic.severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            location.line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // Column is 0-based, in characters.
        let prefix: String = source_line.chars().take(location.column).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(diagnostics: &[ReportedDiagnostic], writer: &mut W) {
    let total_errors = diagnostics
        .iter()
        .filter(|d| d.diagnostic.severity == Severity::Error)
        .count();
    let total_warnings = diagnostics.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        diagnostics.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

fn calculate_max_line_width(diagnostics: &[ReportedDiagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.source_line.is_some())
        .filter_map(|d| d.diagnostic.location.map(|loc| loc.line))
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn print_extract_to<W: Write>(summary: &ExtractSummary, error_count: usize, writer: &mut W) {
    let files = summary.markup_files + summary.script_files;
    let msg = format!(
        "Extracted {} {} from {} {} ({} markup, {} script) into {}",
        summary.translation_count,
        if summary.translation_count == 1 {
            "translation"
        } else {
            "translations"
        },
        files,
        if files == 1 { "file" } else { "files" },
        summary.markup_files,
        summary.script_files,
        summary.output.display()
    );
    let _ = if error_count == 0 {
        writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green())
    } else {
        writeln!(writer, "{} {}", FAILURE_MARK.red(), msg)
    };

    if !summary.emitted.is_empty() {
        let _ = writeln!(
            writer,
            "  {} rewritten {} emitted",
            summary.emitted.len(),
            if summary.emitted.len() == 1 {
                "script"
            } else {
                "scripts"
            }
        );
    }
}

fn print_skipped_warning(count: usize, verbose: bool) {
    if count > 0 && !verbose {
        eprintln!(
            "{} {} path(s) could not be accessed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
    if let Some(error) = &summary.error {
        eprintln!("{} {}", "error:".bold().red(), error);
    }
}

// ============================================================
// Tests
// ============================================================
