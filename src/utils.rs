//! Common utility functions shared across the codebase.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::data::Location;

/// Generic `{{ ... }}` interpolation shape, used to reject ids and default texts
/// that are still unresolved template expressions.
static INTERPOLATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{.*\}\}").unwrap());

/// Computes the location of a byte offset by scanning the text from the start.
///
/// Lines are 1-based, columns are 0-based and counted in characters. Offsets past
/// the end of the text are clamped to the end.
///
/// # Examples
///
/// ```
/// use glean::utils::location_at;
///
/// let loc = location_at("a\nbc", 3);
/// assert_eq!((loc.line, loc.column), (2, 1));
/// ```
pub fn location_at(text: &str, offset: usize) -> Location {
    let mut end = offset.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let prefix = &text[..end];
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = prefix[line_start..].chars().count();
    Location::new(line, column)
}

/// Returns the full source line (without line terminator) for a 1-based line number.
pub fn source_line(text: &str, line: usize) -> Option<&str> {
    text.lines()
        .nth(line.checked_sub(1)?)
        .map(|l| l.trim_end_matches('\r'))
}

/// Checks if the text still contains a `{{ ... }}` template expression.
///
/// # Examples
///
/// ```
/// use glean::utils::looks_like_expression;
///
/// assert!(looks_like_expression("{{ vm.title }}"));
/// assert!(looks_like_expression("Hello {{name}}"));
/// assert!(!looks_like_expression("HOME.TITLE"));
/// ```
pub fn looks_like_expression(text: &str) -> bool {
    INTERPOLATION_REGEX.is_match(text)
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_location_at_first_line() {
        let loc = location_at("<div>Hi</div>", 5);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 5);
    }

    #[test]
    fn test_location_at_after_newlines() {
        let text = "<div>\n  <span>\n    x";
        let loc = location_at(text, text.find("<span").unwrap());
        assert_eq!(loc, Location::new(2, 2));
    }

    #[test]
    fn test_location_at_counts_characters() {
        let text = "你好 <b>";
        let loc = location_at(text, text.find('<').unwrap());
        assert_eq!(loc, Location::new(1, 3));
    }

    #[test]
    fn test_location_at_clamps_offset() {
        let loc = location_at("ab\ncd", 100);
        assert_eq!(loc, Location::new(2, 2));
    }

    #[test]
    fn test_source_line() {
        let text = "first\r\nsecond\nthird";
        assert_eq!(source_line(text, 1), Some("first"));
        assert_eq!(source_line(text, 3), Some("third"));
        assert_eq!(source_line(text, 0), None);
        assert_eq!(source_line(text, 4), None);
    }

    #[test]
    fn test_looks_like_expression() {
        assert!(looks_like_expression("{{ vm.key }}"));
        assert!(looks_like_expression("prefix {{a}} suffix"));
        assert!(looks_like_expression("{{\n a \n}}"));
        assert!(!looks_like_expression("{ single }"));
        assert!(!looks_like_expression("PLAIN_ID"));
        assert!(!looks_like_expression(""));
    }
}
