//! Extraction rules applied to every completed markup element.
//!
//! - `directive`: `translate` attribute/element convention
//! - `id_convention`: marker attribute carrying `default@@id`

mod directive;
mod id_convention;

pub use directive::DirectiveExtractor;
pub use id_convention::IdConventionExtractor;

use enum_dispatch::enum_dispatch;

use crate::core::expression::ExpressionMatch;
use crate::core::markup::context::{Element, ParseContext};

/// A rule that inspects a closed element for translatable content.
#[enum_dispatch]
pub trait MarkupExtractor {
    /// Name used in the `extractors` config list.
    fn name(&self) -> &'static str;

    /// Register the element's translations, or report why it has none.
    fn extract(&self, element: &Element, context: &mut ParseContext<'_>);
}

/// The configured extraction rules.
#[enum_dispatch(MarkupExtractor)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
    Directive(DirectiveExtractor),
    IdConvention(IdConventionExtractor),
}

impl Extractor {
    /// Every rule with its default settings.
    pub fn defaults() -> Vec<Extractor> {
        vec![
            DirectiveExtractor.into(),
            IdConventionExtractor::default().into(),
        ]
    }

    /// Look up a rule by its config name.
    pub fn from_name(name: &str, marker: &str, id_delimiter: &str) -> Option<Extractor> {
        match name {
            "directive" => Some(DirectiveExtractor.into()),
            "idConvention" => Some(IdConventionExtractor::new(marker, id_delimiter).into()),
            _ => None,
        }
    }

    pub fn is_directive(&self) -> bool {
        matches!(self, Extractor::Directive(_))
    }
}

/// Handle one `translate` filter expression found at `position`.
///
/// Only a quoted literal piped straight into `translate` is registered; anything
/// else is a suppressable error.
pub fn apply_filter_match(found: &ExpressionMatch, context: &mut ParseContext<'_>, position: usize) {
    if !found.is_literal() {
        context.emit_suppressable_error(
            format!(
                "{}: dynamic filter expression '{}' is not supported, use the suppress-dynamic-translation-error attribute or register the translation manually",
                context.as_html(),
                found.full_match
            ),
            position,
        );
        return;
    }

    if let Some(filter) = &found.preceding_filter {
        context.emit_suppressable_error(
            format!(
                "{}: another filter '{}' runs before the translate filter in '{}', not supported",
                context.as_html(),
                filter,
                found.full_match
            ),
            position,
        );
        return;
    }

    if let Some(id) = found.literal_value() {
        context.register_translation(&id, None, position);
    }
}
