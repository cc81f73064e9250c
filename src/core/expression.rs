//! Matcher for `translate` filter expressions embedded in templates.
//!
//! Recognizes pipelines such as `{{ 'HOME.TITLE' | translate }}` inside text and
//! attribute values, or the undelimited form `'HOME.TITLE' | translate` used by
//! expression attributes like `ng-bind`.
//!
//! Interpolations nested inside a quoted value are not supported: a quoted value
//! never contains `{` or `}`, so a match cannot span two interpolations.

use std::sync::LazyLock;

use regex::{CaptureMatches, Captures, Regex};

/// Piped subject: everything up to the first `|` outside a quoted run.
const VALUE: &str = r#"(?:[^|'"{}]|'(?:[^'\\{}]|\\.)*'|"(?:[^"\\{}]|\\.)*")+"#;

/// One filter of the chain including its arguments, e.g. ` date:'short' `.
const FILTER: &str = r#"(?:[^|'"{}]|'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*")+"#;

static INTERPOLATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\{{\{{\s*({VALUE})\s*((?:\|(?:{FILTER}))+)\}}\}}"
    ))
    .unwrap()
});

/// A value consisting of exactly one quoted string.
static LITERAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*")$"#).unwrap()
});

static BARE_EXPRESSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*({VALUE})\s*((?:\|(?:{FILTER}))+)$")).unwrap()
});

/// One `translate` filter expression found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionMatch {
    /// The complete matched text, including delimiters.
    pub full_match: String,
    /// Byte offset of the match within the searched text.
    pub start: usize,
    /// The trimmed piped subject. Quotes of a string literal are retained.
    pub value: String,
    /// Name of the filter applied directly before `translate`, if any.
    pub preceding_filter: Option<String>,
}

impl ExpressionMatch {
    /// True if the value is a quoted string literal rather than a reference.
    pub fn is_literal(&self) -> bool {
        LITERAL_REGEX.is_match(&self.value)
    }

    /// The value with its quotes stripped and escaped characters unescaped,
    /// or `None` if the value is not a string literal.
    pub fn literal_value(&self) -> Option<String> {
        if !self.is_literal() {
            return None;
        }
        let inner = &self.value[1..self.value.len() - 1];
        let mut unescaped = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    unescaped.push(next);
                }
            } else {
                unescaped.push(c);
            }
        }
        Some(unescaped)
    }
}

/// Lazily yields every `{{ value | ... | translate | ... }}` expression in `text`.
///
/// Interpolations without a `translate` filter are skipped.
///
/// # Examples
///
/// ```
/// use glean::core::expression::match_all;
///
/// let matches: Vec<_> = match_all("{{ 'A' | translate }} {{ name }} {{ 'B' | translate }}").collect();
/// assert_eq!(matches.len(), 2);
/// assert_eq!(matches[1].value, "'B'");
/// ```
pub fn match_all(text: &str) -> Matches<'_, '_> {
    Matches {
        captures: INTERPOLATION_REGEX.captures_iter(text),
    }
}

/// Matches an undelimited expression such as `'A' | translate` spanning the whole text.
pub fn match_bare(text: &str) -> Option<ExpressionMatch> {
    BARE_EXPRESSION_REGEX
        .captures(text)
        .and_then(|caps| to_match(&caps))
}

/// Iterator returned by [`match_all`].
pub struct Matches<'r, 't> {
    captures: CaptureMatches<'r, 't>,
}

impl Iterator for Matches<'_, '_> {
    type Item = ExpressionMatch;

    fn next(&mut self) -> Option<Self::Item> {
        self.captures.by_ref().find_map(|caps| to_match(&caps))
    }
}

fn to_match(caps: &Captures<'_>) -> Option<ExpressionMatch> {
    let full = caps.get(0)?;
    let value = caps.get(1)?.as_str().trim();
    let chain = caps.get(2)?.as_str();

    let names: Vec<&str> = split_filters(chain).into_iter().map(filter_name).collect();
    let translate_index = names
        .iter()
        .position(|name| name.eq_ignore_ascii_case("translate"))?;

    let preceding_filter = translate_index
        .checked_sub(1)
        .map(|i| names[i].to_string())
        .filter(|name| !name.is_empty());

    Some(ExpressionMatch {
        full_match: full.as_str().to_string(),
        start: full.start(),
        value: value.to_string(),
        preceding_filter,
    })
}

/// Split a `| a | b:'x|y' | c` chain into its filters, respecting quoted arguments.
fn split_filters(chain: &str) -> Vec<&str> {
    let mut filters = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = None;

    for (i, c) in chain.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '|') => {
                if let Some(s) = start {
                    filters.push(&chain[s..i]);
                }
                start = Some(i + 1);
            }
            (None, _) => {}
        }
    }
    if let Some(s) = start {
        filters.push(&chain[s..]);
    }
    filters
}

/// The name of a filter without its `:argument` list.
fn filter_name(filter: &str) -> &str {
    filter.split(':').next().unwrap_or_default().trim()
}
