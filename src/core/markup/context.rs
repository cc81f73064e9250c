//! Parse Context: the chain of elements currently open in the markup parser.
//!
//! Elements live in an arena indexed by [`ContextId`]; each node stores its parent's
//! index. Element nesting is strictly last-in first-out, so the arena doubles as the
//! open-element stack and a node is dropped when it is left.

use anyhow::{Result, bail};

use crate::core::data::{Location, Translation, Usage};
use crate::core::host::TranslationHost;
use crate::core::parsers::markup::Attribute;
use crate::issues::Diagnostic;
use crate::utils::{location_at, looks_like_expression};

/// Index of an element in the arena. The root sentinel is always `ContextId::ROOT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextId(usize);

impl ContextId {
    pub const ROOT: ContextId = ContextId(0);
}

/// One text run directly inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    /// Byte offset of the trimmed text.
    pub start: usize,
    /// Trimmed, entity-decoded text.
    pub text: String,
    /// Source form of the text.
    pub raw: String,
}

/// An element as seen by the extractors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub parent: Option<ContextId>,
    pub tag_name: String,
    pub attributes: Vec<Attribute>,
    pub texts: Vec<TextSegment>,
    /// Locally set suppression; see [`ParseContext::suppress_errors`] for the resolved value.
    pub suppress_errors: bool,
    pub translate_directive_active: bool,
    pub translate_attr_id_override: Option<String>,
    pub default_text_override: Option<String>,
    pub start: usize,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Renders the element for diagnostics, e.g. `<div class='x'>...</div>`.
    pub fn as_html(&self) -> String {
        let mut html = format!("<{}", self.tag_name);
        for attribute in &self.attributes {
            if attribute.value.is_empty() {
                html.push_str(&format!(" {}", attribute.name));
            } else {
                html.push_str(&format!(" {}='{}'", attribute.name, attribute.value));
            }
        }
        html.push('>');
        if self.texts.is_empty() {
            html.push_str("...");
        } else {
            for segment in &self.texts {
                html.push_str(&segment.raw);
            }
        }
        html.push_str(&format!("</{}>", self.tag_name));
        html
    }
}

/// Open elements of one markup file plus the sink every diagnostic goes to.
pub struct ParseContext<'a> {
    source: &'a str,
    resource: &'a str,
    host: &'a mut dyn TranslationHost,
    nodes: Vec<Element>,
}

impl<'a> ParseContext<'a> {
    pub fn new(source: &'a str, resource: &'a str, host: &'a mut dyn TranslationHost) -> Self {
        Self {
            source,
            resource,
            host,
            nodes: vec![Element::default()],
        }
    }

    pub fn resource(&self) -> &str {
        self.resource
    }

    /// The innermost open element, or the root sentinel.
    pub fn current_id(&self) -> ContextId {
        ContextId(self.nodes.len() - 1)
    }

    pub fn is_root(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn current(&self) -> &Element {
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Element {
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn get(&self, id: ContextId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    /// Open a child of the current element and make it current.
    pub fn enter(&mut self, tag_name: &str, attributes: Vec<Attribute>, start: usize) -> ContextId {
        let parent = self.current_id();
        self.nodes.push(Element {
            parent: Some(parent),
            tag_name: tag_name.to_string(),
            attributes,
            start,
            ..Default::default()
        });
        self.current_id()
    }

    /// Close the current element and return to its parent.
    ///
    /// Leaving the root is a program error.
    pub fn leave(&mut self) -> Result<ContextId> {
        if self.is_root() {
            bail!("cannot leave the root parse context of '{}'", self.resource);
        }
        self.nodes.pop();
        Ok(self.current_id())
    }

    /// Append a text run to the current element. Whitespace-only text is ignored.
    pub fn add_text(&mut self, text: &str, raw: &str, start: usize) -> Option<&TextSegment> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let leading = raw.len() - raw.trim_start().len();
        let segment = TextSegment {
            start: start + leading,
            text: trimmed.to_string(),
            raw: raw.trim().to_string(),
        };
        let element = self.current_mut();
        element.texts.push(segment);
        element.texts.last()
    }

    /// Resolved suppression flag of the current element: set locally or on any ancestor.
    pub fn suppress_errors(&self) -> bool {
        let mut id = Some(self.current_id());
        while let Some(ContextId(index)) = id {
            let Some(element) = self.nodes.get(index) else {
                break;
            };
            if element.suppress_errors {
                return true;
            }
            id = element.parent;
        }
        false
    }

    pub fn location(&self, position: usize) -> Location {
        location_at(self.source, position)
    }

    /// Report a problem at a byte offset. Never suppressed.
    pub fn emit_error(&mut self, message: impl Into<String>, position: usize) {
        let location = self.location(position);
        self.host
            .emit_error(Diagnostic::error(self.resource, Some(location), message));
    }

    /// Report a problem unless the current element or an ancestor suppresses errors.
    pub fn emit_suppressable_error(&mut self, message: impl Into<String>, position: usize) {
        if !self.suppress_errors() {
            self.emit_error(message, position);
        }
    }

    pub fn as_html(&self) -> String {
        self.current().as_html()
    }

    /// Forward a translation found at `position` to the host.
    ///
    /// Ids and default texts that are still template expressions are rejected with a
    /// suppressable error.
    pub fn register_translation(&mut self, id: &str, default_text: Option<&str>, position: usize) {
        if looks_like_expression(id) {
            self.emit_suppressable_error(
                format!(
                    "'{}' uses an expression as translation id, not supported",
                    id
                ),
                position,
            );
            return;
        }
        if let Some(text) = default_text
            && looks_like_expression(text)
        {
            self.emit_suppressable_error(
                format!(
                    "'{}' uses an expression as default text for '{}', not supported",
                    text, id
                ),
                position,
            );
            return;
        }

        let usage = Usage::new(self.resource, self.location(position));
        self.host.register_translation(Translation::new(
            id,
            default_text.map(str::to_string),
            usage,
        ));
    }
}
