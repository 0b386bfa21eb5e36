//! Line/column coordinates.
//!
//! ## Learning: Newtype Pattern
//!
//! `Position` wraps line/column coordinates instead of a bare
//! `(usize, usize)`, so line and column cannot be swapped by accident.

use serde::{Deserialize, Serialize};

/// A position in the text buffer.
///
/// Both fields are 0-indexed; the column counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line index
    pub line: usize,
    /// Character column
    pub column: usize,
}

/// One search hit. Results are ordered by line, then column.
pub type SearchResult = Position;

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position at the start of the buffer.
    pub const ZERO: Position = Position { line: 0, column: 0 };
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 1-indexed for user-facing output
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, column): (usize, usize)) -> Self {
        Self { line, column }
    }
}
