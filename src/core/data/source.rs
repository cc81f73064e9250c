use std::fmt;

use serde::Serialize;

/// Position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (0-indexed, in characters).
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One occurrence of a translation id: the resource it was found in and where.
///
/// Usages are compared structurally, so registering the same occurrence twice
/// never produces a duplicate entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Usage {
    /// Identifier of the file the id was found in.
    pub resource: String,
    pub location: Location,
}

impl Usage {
    pub fn new(resource: impl Into<String>, location: Location) -> Self {
        Self {
            resource: resource.into(),
            location,
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.location)
    }
}
