use super::{CommandResult, CommandSummary, ReportedDiagnostic};
use crate::issues::Severity;

pub fn finish(
    summary: CommandSummary,
    mut diagnostics: Vec<ReportedDiagnostic>,
    skipped_count: usize,
) -> CommandResult {
    // Stable: diagnostics at the same position keep their emission order.
    diagnostics.sort_by(|a, b| {
        a.diagnostic
            .resource
            .cmp(&b.diagnostic.resource)
            .then_with(|| a.diagnostic.location.cmp(&b.diagnostic.location))
    });

    let mut error_count = diagnostics
        .iter()
        .filter(|d| d.diagnostic.severity == Severity::Error)
        .count();
    let warning_count = diagnostics.len() - error_count;

    if let CommandSummary::Init(ref summary) = summary
        && summary.error.is_some()
    {
        error_count += 1;
    }

    CommandResult {
        summary,
        error_count,
        warning_count,
        diagnostics,
        skipped_count,
    }
}
