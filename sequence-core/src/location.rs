use std::fmt;
use std::sync::Arc;

/// Line/column position of the current read point in a source.
///
/// Attached to every checkpoint and to the sequence's current position.
/// Consuming a newline increments `line` and resets `column` to 0; any
/// other item increments `column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Name of the source (file name, stream label), if one was given.
    pub source_name: Option<Arc<str>>,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (0-indexed, reset on newline).
    pub column: usize,
}

impl Location {
    /// Creates a location at the start of an unnamed source.
    pub fn new() -> Self {
        Self {
            source_name: None,
            line: 1,
            column: 0,
        }
    }

    /// Creates a location at the start of a named source.
    pub fn for_source(source_name: Arc<str>) -> Self {
        Self {
            source_name: Some(source_name),
            line: 1,
            column: 0,
        }
    }

    /// Creates a location with the given coordinates.
    pub fn at(line: usize, column: usize) -> Self {
        Self {
            source_name: None,
            line,
            column,
        }
    }

    /// Advances past one consumed item.
    pub fn advance(&mut self, is_newline: bool) {
        if is_newline {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_name {
            Some(name) => write!(f, "{} line {} column {}", name, self.line, self.column),
            None => write!(f, "line {} column {}", self.line, self.column),
        }
    }
}
