//! Script (JavaScript/TypeScript) extraction.
//!
//! - `comments`: suppression comment collection and block scoping
//! - `visitor`: call recognition, validation and tree rewrite

pub mod comments;
pub mod visitor;

use anyhow::Result;
use swc_ecma_visit::VisitMutWith;
use tracing::debug;

use crate::core::host::TranslationHost;
use crate::core::parsers::script::{ParsedScript, parse_script_source};
use crate::issues::Diagnostic;
use comments::SuppressionComments;
use visitor::{TranslationVisitor, apply_edits};

pub const DEFAULT_SERVICE_IDENTIFIER: &str = "$translate";
pub const DEFAULT_REGISTRATION_NAMESPACE: &str = "i18n";

/// Names of the calls the visitor recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Function or method name of the translation service, e.g. `$translate`.
    pub service_identifier: String,
    /// Object owning `registerTranslation(s)`, e.g. `i18n`.
    pub registration_namespace: String,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            service_identifier: DEFAULT_SERVICE_IDENTIFIER.to_string(),
            registration_namespace: DEFAULT_REGISTRATION_NAMESPACE.to_string(),
        }
    }
}

/// Result of extracting one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptExtraction {
    /// The source with every registration call replaced by its literal.
    pub code: String,
    /// Whether `code` differs from the input.
    pub changed: bool,
}

/// Extract the translations of one script into `host` and rewrite its registration calls.
///
/// A file that does not parse is reported as an error and returned unchanged.
pub fn extract_from_source(
    source: &str,
    resource: &str,
    options: &ScriptOptions,
    host: &mut dyn TranslationHost,
) -> Result<ScriptExtraction> {
    let unchanged = || ScriptExtraction {
        code: source.to_string(),
        changed: false,
    };

    let ParsedScript {
        mut program,
        source: parsed,
    } = match parse_script_source(source.to_string(), resource) {
        Ok(parsed) => parsed,
        Err(err) => {
            host.emit_error(Diagnostic::error(resource, None, err.to_string()));
            return Ok(unchanged());
        }
    };

    let suppressions = SuppressionComments::collect(&parsed);
    debug!(
        resource,
        suppressions = suppressions.len(),
        "extracting script"
    );

    let mut visitor = TranslationVisitor::new(&parsed, resource, options, &suppressions, host);
    program.visit_mut_with(&mut visitor);
    if !visitor.changed() {
        return Ok(unchanged());
    }

    let edits = visitor.into_edits();
    debug!(resource, edits = edits.len(), "rewrote registration calls");
    Ok(ScriptExtraction {
        code: apply_edits(source, edits),
        changed: true,
    })
}
