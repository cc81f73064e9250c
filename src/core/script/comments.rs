//! Suppression comments for dynamic translation errors in scripts.
//!
//! A comment containing `suppress-dynamic-translation-error: true` silences the
//! suppressable errors of every later call in the same block:
//!
//! ```js
//! function load(key) {
//!   // suppress-dynamic-translation-error: true
//!   return $translate(key);   // <- not reported
//! }
//! $translate(other);          // <- reported, outside the block
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::core::data::Location;
use crate::core::parsers::script::ScriptSource;

static SUPPRESS_DIRECTIVE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"suppress-dynamic-translation-error\s*:\s*true\b").unwrap());

/// A comment with the positions of its first and last character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptComment {
    pub text: String,
    pub start: Location,
    pub end: Location,
}

/// The suppression comments of one file, sorted by start line.
#[derive(Debug, Clone, Default)]
pub struct SuppressionComments {
    comments: Vec<ScriptComment>,
}

impl SuppressionComments {
    /// Collect the suppression comments of a parsed file.
    pub fn collect(source: &ScriptSource) -> Self {
        let comments = source
            .comments
            .iter()
            .map(|cmt| {
                let (start_line, start_col) = source.line_col(cmt.span.lo);
                let (end_line, end_col) = source.line_col(cmt.span.hi);
                ScriptComment {
                    text: cmt.text.to_string(),
                    start: Location::new(start_line, start_col),
                    end: Location::new(end_line, end_col),
                }
            })
            .collect();
        Self::from_comments(comments)
    }

    /// Keep only comments carrying the directive.
    pub fn from_comments(comments: Vec<ScriptComment>) -> Self {
        let mut comments: Vec<_> = comments
            .into_iter()
            .filter(|c| SUPPRESS_DIRECTIVE_REGEX.is_match(&c.text))
            .collect();
        comments.sort_by_key(|c| c.start);
        Self { comments }
    }

    /// Whether a directive starts at or after `block_start_line` and ends no later
    /// than `call_line`.
    pub fn suppresses(&self, block_start_line: usize, call_line: usize) -> bool {
        let first = self
            .comments
            .partition_point(|c| c.start.line < block_start_line);
        self.comments[first..]
            .iter()
            .take_while(|c| c.start.line <= call_line)
            .any(|c| c.end.line <= call_line)
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
