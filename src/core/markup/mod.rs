//! Markup (template) extraction.
//!
//! - `context`: Parse Context arena of open elements
//! - `extractors`: extraction rules run on each closed element
//! - `parser`: tokenizer event handler driving the two above

pub mod context;
pub mod extractors;
pub mod parser;

pub use extractors::{DirectiveExtractor, Extractor, IdConventionExtractor, MarkupExtractor};

use anyhow::Result;
use tracing::debug;

use crate::core::host::TranslationHost;
use crate::core::parsers::markup::tokenize;
use context::ParseContext;
use parser::MarkupParser;

/// Extract every translation of one markup file into `host`.
///
/// Problems in the markup are reported through the host. An `Err` means the parser
/// itself misbehaved.
pub fn extract_from_markup(
    source: &str,
    resource: &str,
    extractors: &[Extractor],
    host: &mut dyn TranslationHost,
) -> Result<()> {
    debug!(
        resource,
        extractors = ?extractors.iter().map(|e| e.name()).collect::<Vec<_>>(),
        "extracting markup"
    );

    let context = ParseContext::new(source, resource, host);
    let mut parser = MarkupParser::new(context, extractors);
    tokenize(source, &mut parser)?;
    parser.finish()
}
