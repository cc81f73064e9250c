use std::path::PathBuf;

use crate::issues::Diagnostic;
use crate::utils::source_line;

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub markup_files: usize,
    pub script_files: usize,
    pub translation_count: usize,
    /// Path the catalog was written to.
    pub output: PathBuf,
    /// Rewritten scripts written under the emit directory.
    pub emitted: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// A diagnostic with the source line it points at, for display.
#[derive(Debug, Clone)]
pub struct ReportedDiagnostic {
    pub diagnostic: Diagnostic,
    pub source_line: Option<String>,
}

impl ReportedDiagnostic {
    pub fn new(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostic,
            source_line: None,
        }
    }

    /// Attach the line of `text` the diagnostic's location points at.
    pub fn with_source(diagnostic: Diagnostic, text: &str) -> Self {
        let source_line = diagnostic
            .location
            .and_then(|loc| source_line(text, loc.line))
            .map(String::from);
        Self {
            diagnostic,
            source_line,
        }
    }
}

/// Result of running glean commands
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// Diagnostics sorted by resource and location.
    pub diagnostics: Vec<ReportedDiagnostic>,
    /// Number of paths the scanner could not access.
    pub skipped_count: usize,
}
