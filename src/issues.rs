//! Diagnostics reported while extracting translations.
//!
//! Extraction never aborts on an expected problem. Every problem becomes a
//! [`Diagnostic`] handed to the host's error or warning sink, and extraction continues
//! with the next element or call.

use std::fmt;

use crate::core::data::Location;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A user-visible problem found in a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Identifier of the file the problem was found in.
    pub resource: String,
    /// Position in the resource, when known.
    pub location: Option<Location>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(
        resource: impl Into<String>,
        location: Option<Location>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            resource: resource.into(),
            location,
            message: message.into(),
        }
    }

    pub fn warning(
        resource: impl Into<String>,
        location: Option<Location>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            resource: resource.into(),
            location,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Formats as `resource:line:column: message`.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{}:{}: {}", self.resource, location, self.message),
            None => write!(f, "{}: {}", self.resource, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::issues::*;

    #[test]
    fn test_display_with_location() {
        let diagnostic = Diagnostic::error("app.html", Some(Location::new(3, 7)), "broken");
        assert_eq!(diagnostic.to_string(), "app.html:3:7: broken");
    }

    #[test]
    fn test_display_without_location() {
        let diagnostic = Diagnostic::warning("app.js", None, "empty id");
        assert_eq!(diagnostic.to_string(), "app.js: empty id");
        assert!(!diagnostic.is_error());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
