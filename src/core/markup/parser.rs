//! Stateful markup parser: turns tokenizer events into Parse Context moves and runs
//! the extractors on every element close.

use anyhow::Result;
use tracing::trace;

use crate::core::expression::{match_all, match_bare};
use crate::core::markup::context::{ParseContext, TextSegment};
use crate::core::markup::extractors::{
    DirectiveExtractor, Extractor, MarkupExtractor, apply_filter_match,
};
use crate::core::parsers::markup::{Attribute, MarkupHandler};

/// Marks an element and its descendants as intentionally dynamic.
pub const SUPPRESS_ATTRIBUTE: &str = "suppress-dynamic-translation-error";

/// Attributes whose whole value is an expression rather than text.
const EXPRESSION_ATTRIBUTES: &[&str] = &[
    "ng-bind",
    "ng-bind-html",
    "data-ng-bind",
    "data-ng-bind-html",
];

pub struct MarkupParser<'a> {
    context: ParseContext<'a>,
    extractors: &'a [Extractor],
    directive_enabled: bool,
    /// Set after a fatal tokenizer error; nothing more is extracted from the file.
    aborted: bool,
}

impl<'a> MarkupParser<'a> {
    pub fn new(context: ParseContext<'a>, extractors: &'a [Extractor]) -> Self {
        Self {
            context,
            extractors,
            directive_enabled: extractors.iter().any(Extractor::is_directive),
            aborted: false,
        }
    }

    /// Close every element still open at end of input.
    pub fn finish(mut self) -> Result<()> {
        if self.aborted {
            return Ok(());
        }
        while !self.context.is_root() {
            self.close_current()?;
        }
        Ok(())
    }

    fn close_current(&mut self) -> Result<()> {
        let element = self.context.current().clone();
        for extractor in self.extractors {
            extractor.extract(&element, &mut self.context);
        }
        self.context.leave()?;
        Ok(())
    }

    fn scan_attribute(&mut self, attribute: &Attribute) {
        if EXPRESSION_ATTRIBUTES.contains(&attribute.name.as_str()) {
            if let Some(found) = match_bare(&attribute.value) {
                apply_filter_match(&found, &mut self.context, attribute.start);
            }
            return;
        }
        for found in match_all(&attribute.value) {
            apply_filter_match(&found, &mut self.context, attribute.start);
        }
    }

    fn scan_text(&mut self, segment: &TextSegment) {
        // Offsets within decoded text only map onto the source when nothing was decoded.
        let exact = segment.text == segment.raw;
        for found in match_all(&segment.text) {
            let position = segment.start + if exact { found.start } else { 0 };
            apply_filter_match(&found, &mut self.context, position);
        }
    }
}

impl MarkupHandler for MarkupParser<'_> {
    fn on_open_tag(&mut self, name: &str, attributes: Vec<Attribute>, start: usize) -> Result<()> {
        trace!(name, start, "open tag");
        self.context.enter(name, attributes, start);

        let directive_enabled = self.directive_enabled;
        let element = self.context.current_mut();
        element.suppress_errors = element.has_attribute(SUPPRESS_ATTRIBUTE);
        if directive_enabled {
            DirectiveExtractor::mark(element);
        }

        let attributes = element.attributes.clone();
        for attribute in &attributes {
            self.scan_attribute(attribute);
        }
        Ok(())
    }

    fn on_text(&mut self, text: &str, raw: &str, start: usize) -> Result<()> {
        let Some(segment) = self.context.add_text(text, raw, start).cloned() else {
            return Ok(());
        };
        let element = self.context.current();
        if element.translate_directive_active && element.translate_attr_id_override.is_none() {
            // The text is the id, resolved when the element closes.
            return Ok(());
        }
        self.scan_text(&segment);
        Ok(())
    }

    fn on_close_tag(&mut self, name: &str, start: usize) -> Result<()> {
        trace!(name, start, "close tag");
        if self.context.is_root() {
            self.context
                .emit_error(format!("unexpected closing tag '</{}>'", name), start);
            return Ok(());
        }

        let expected = &self.context.current().tag_name;
        if expected != name {
            let message = format!(
                "mismatched closing tag '</{}>', expected '</{}>'",
                name, expected
            );
            self.context.emit_suppressable_error(message, start);
        }
        self.close_current()
    }

    fn on_parse_error(&mut self, message: &str, position: usize, fatal: bool) -> Result<()> {
        self.context.emit_error(message.to_string(), position);
        if fatal {
            self.aborted = true;
        }
        Ok(())
    }
}
