//! Command vocabulary for buffer operations.
//!
//! ## Learning: The Command Pattern
//!
//! Each buffer operation is a value of [`Command`]. A front end (the CLI,
//! a menu loop, a script) builds commands; [`Editor::execute`] applies
//! them and describes the result as a [`CommandOutput`]. Front ends never
//! call buffer methods directly, so they all report outcomes the same way.
//!
//! [`Editor::execute`]: crate::Editor::execute

use quill_buffer::{CharStatistics, Position, SearchResult, Truncation};

/// Operations an [`Editor`](crate::Editor) can run against its buffer.
///
/// Lines and columns are 0-indexed; columns count characters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    // Line commands
    InsertLine { index: usize, text: String },
    AppendLine { text: String },
    DeleteLine { index: usize },
    Clear,

    // Positional edits
    Insert { line: usize, column: usize, text: String },
    InsertAt { position: usize, text: String },
    Replace { line: usize, column: usize, len: usize, text: String },
    ReplaceChar { line: usize, column: usize, text: String },
    DeleteRange { line: usize, column: usize, len: usize },

    // Pattern edits
    ReplaceAll { pattern: String, replacement: String },
    DeleteSubstring { pattern: String },

    // Queries
    Count { pattern: String },
    Find { pattern: String },
    Statistics,
}

impl Command {
    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::InsertLine { .. } => "Insert Line",
            Command::AppendLine { .. } => "Append Line",
            Command::DeleteLine { .. } => "Delete Line",
            Command::Clear => "Clear",
            Command::Insert { .. } => "Insert",
            Command::InsertAt { .. } => "Insert at Position",
            Command::Replace { .. } => "Replace",
            Command::ReplaceChar { .. } => "Replace Character",
            Command::DeleteRange { .. } => "Delete Range",
            Command::ReplaceAll { .. } => "Replace All",
            Command::DeleteSubstring { .. } => "Delete Substring",
            Command::Count { .. } => "Count",
            Command::Find { .. } => "Find",
            Command::Statistics => "Statistics",
        }
    }

    /// Returns true if the command can change buffer content.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Command::Count { .. } | Command::Find { .. } | Command::Statistics
        )
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Applied in full with nothing to report
    Done,
    /// Applied, but the text was cut to the line limit
    Truncated(Truncation),
    /// Text was inserted at this position
    Inserted(Position),
    /// Content removed by a delete
    Removed(String),
    /// Number of occurrences counted or replaced
    Count(usize),
    /// Search hits
    Matches(Vec<SearchResult>),
    /// Character statistics
    Statistics(CharStatistics),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display_name() {
        assert_eq!(Command::Statistics.display_name(), "Statistics");
        assert_eq!(
            Command::ReplaceAll {
                pattern: "a".to_string(),
                replacement: "b".to_string()
            }
            .display_name(),
            "Replace All"
        );
    }

    #[test]
    fn test_queries_are_not_mutating() {
        assert!(!Command::Find { pattern: "x".into() }.is_mutating());
        assert!(!Command::Statistics.is_mutating());
        assert!(Command::DeleteLine { index: 0 }.is_mutating());
        assert!(Command::Clear.is_mutating());
    }
}
