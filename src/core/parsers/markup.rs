//! Streaming HTML tokenizer.
//!
//! Drives a [`MarkupHandler`] from [`quick_xml::Reader`] in document order. End names
//! are not checked, so mismatched and stray closing tags reach the handler. On top of
//! the reader, void elements and self-closing tags are closed immediately and
//! `script`/`style` content is raw text. Comments and doctypes are skipped. Input that
//! ends inside a tag, comment or declaration is fatal.

use std::borrow::Cow;

use anyhow::Result;
use quick_xml::Reader;
use quick_xml::errors::{Error as XmlError, SyntaxError};
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text up to the matching closing tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// An attribute of an open tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lower-cased attribute name.
    pub name: String,
    /// Entity-decoded value, empty for attributes without a value.
    pub value: String,
    /// Byte offset of the attribute name.
    pub start: usize,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>, start: usize) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            start,
        }
    }
}

/// Receiver of tokenizer events.
///
/// Every callback may fail; a failure stops tokenizing and is returned from
/// [`tokenize`].
pub trait MarkupHandler {
    fn on_open_tag(&mut self, name: &str, attributes: Vec<Attribute>, start: usize) -> Result<()>;

    /// `text` is entity-decoded, `raw` is the text as written in the source.
    fn on_text(&mut self, text: &str, raw: &str, start: usize) -> Result<()>;

    fn on_close_tag(&mut self, name: &str, start: usize) -> Result<()>;

    /// A malformed construct. After a fatal error no further events are reported.
    fn on_parse_error(&mut self, message: &str, position: usize, fatal: bool) -> Result<()>;
}

/// Tokenize `source`, reporting every event to `handler`.
pub fn tokenize<H: MarkupHandler>(source: &str, handler: &mut H) -> Result<()> {
    let mut reader = Reader::from_str(source);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.trim_text(false);

    // Byte offset where the next event starts.
    let mut offset = 0;
    loop {
        let start = offset;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => return handler.on_parse_error(&error_message(&err), start, true),
        };
        offset = reader.buffer_position() as usize;

        match event {
            Event::Start(tag) => {
                let name = tag_name(&tag);
                if name.is_empty() {
                    // `<` not followed by a name: keep it as text.
                    let raw = &source[start..offset];
                    handler.on_text(raw, raw, start)?;
                    continue;
                }
                let attributes = read_attributes(&tag, &source[start..offset], start, handler)?;
                handler.on_open_tag(&name, attributes, start)?;

                if VOID_ELEMENTS.contains(&name.as_str()) {
                    handler.on_close_tag(&name, start)?;
                } else if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    let text = match reader.read_text(tag.name()) {
                        Ok(text) => text,
                        Err(err) => {
                            return handler.on_parse_error(&error_message(&err), start, true);
                        }
                    };
                    if !text.is_empty() {
                        handler.on_text(&text, &text, offset)?;
                    }
                    handler.on_close_tag(&name, offset + text.len())?;
                    offset = reader.buffer_position() as usize;
                }
            }
            Event::Empty(tag) => {
                let name = tag_name(&tag);
                let attributes = read_attributes(&tag, &source[start..offset], start, handler)?;
                handler.on_open_tag(&name, attributes, start)?;
                handler.on_close_tag(&name, start)?;
            }
            Event::End(tag) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).to_ascii_lowercase();
                // `</br>` and friends close nothing.
                if !VOID_ELEMENTS.contains(&name.as_str()) {
                    handler.on_close_tag(&name, start)?;
                }
            }
            Event::Text(text) => {
                let raw = String::from_utf8_lossy(&text);
                offset = start + raw.len();
                if !raw.is_empty() {
                    handler.on_text(&decode(&raw), &raw, start)?;
                }
            }
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

fn tag_name(tag: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(tag.name().as_ref()).to_ascii_lowercase()
}

/// Attributes of `tag`, whose source text `raw_tag` starts at `tag_start`.
fn read_attributes<H: MarkupHandler>(
    tag: &BytesStart<'_>,
    raw_tag: &str,
    tag_start: usize,
    handler: &mut H,
) -> Result<Vec<Attribute>> {
    let mut attributes = Vec::new();
    let mut cursor = 0;
    for attribute in tag.html_attributes().with_checks(false) {
        let attribute = match attribute {
            Ok(attribute) => attribute,
            Err(err) => {
                let message = format!("malformed attribute in tag '<{}': {}", tag_name(tag), err);
                handler.on_parse_error(&message, tag_start, false)?;
                break;
            }
        };
        let key = String::from_utf8_lossy(attribute.key.as_ref());
        let at = attribute_offset(raw_tag, &key, cursor).unwrap_or(0);
        cursor = at + key.len();

        let value = String::from_utf8_lossy(&attribute.value);
        attributes.push(Attribute::new(
            key.to_ascii_lowercase(),
            decode(&value),
            tag_start + at,
        ));
    }
    Ok(attributes)
}

/// Offset of the attribute name `key` in `raw_tag`, searching from `from`.
fn attribute_offset(raw_tag: &str, key: &str, from: usize) -> Option<usize> {
    let mut search = from;
    loop {
        let at = search + raw_tag.get(search..)?.find(key)?;
        if raw_tag.as_bytes()[..at]
            .last()
            .is_some_and(u8::is_ascii_whitespace)
        {
            return Some(at);
        }
        search = at + key.len();
    }
}

/// Decode HTML entities and character references.
///
/// Text that cannot be decoded, like a lone `&` or an unknown entity, is kept as written.
fn decode(raw: &str) -> Cow<'_, str> {
    unescape_with(raw, resolve_html5_entity).unwrap_or(Cow::Borrowed(raw))
}

fn error_message(err: &XmlError) -> String {
    match err {
        XmlError::Syntax(SyntaxError::UnclosedTag) => "unterminated tag".to_string(),
        XmlError::Syntax(SyntaxError::UnclosedComment) => "unterminated comment".to_string(),
        XmlError::Syntax(SyntaxError::UnclosedDoctype) => "unterminated doctype".to_string(),
        err => format!("malformed markup: {}", err),
    }
}
