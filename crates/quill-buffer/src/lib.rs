//! # Quill Buffer
//!
//! Line-oriented text buffer with UTF-8 aware addressing, KMP substring
//! search and capacity-bounded editing.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Bytes vs Characters
//! - Lines are stored as `Vec<u8>`; users address them in characters
//! - [`index`] translates between the two, built on [`codepoint`]
//!
//! ### Ownership & Borrowing
//! - `TextBuffer` owns every line
//! - `line()` returns `&[u8]` borrowed from the buffer, so the borrow
//!   checker rejects holding it across a mutation
//!
//! ### Errors as Values
//! - Every operator returns `BufferResult<T>`; match counts and failures
//!   never share a return channel

pub mod codepoint;
pub mod file;
pub mod index;
pub mod search;
pub mod stats;

mod buffer;
mod position;

pub use buffer::{BufferConfig, Fit, TextBuffer};
pub use file::{LoadReport, Truncation};
pub use position::{Position, SearchResult};
pub use search::Pattern;
pub use stats::{CharCategory, CharStatistics};

/// Default maximum number of lines in a buffer.
pub const MAX_LINES: usize = 1000;

/// Default maximum bytes in a single line.
pub const MAX_LINE_LENGTH: usize = 4096;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Line {line} is out of bounds (buffer has {line_count} lines)")]
    LineOutOfBounds { line: usize, line_count: usize },

    #[error("Column {column} is out of bounds on line {line} ({len} characters)")]
    ColumnOutOfBounds {
        line: usize,
        column: usize,
        len: usize,
    },

    #[error("Position {position} is past the end of the buffer (length {len})")]
    PositionOutOfBounds { position: usize, len: usize },

    #[error("Buffer is full ({max} lines)")]
    TooManyLines { max: usize },

    #[error("Line {line} would be {len} bytes long (limit {max})")]
    LineTooLong { line: usize, len: usize, max: usize },

    #[error("Search pattern is empty")]
    EmptyPattern,

    #[error("No file path set")]
    NoFilePath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad classification of a [`BufferError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A line, column or position outside valid bounds
    InvalidIndex,
    /// Line count or line byte length limit reached
    CapacityExceeded,
    /// Zero-length search or replace pattern
    EmptyPattern,
    /// Reading or writing a file failed, or no file is associated
    Io,
}

impl BufferError {
    /// Returns the broad kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BufferError::LineOutOfBounds { .. }
            | BufferError::ColumnOutOfBounds { .. }
            | BufferError::PositionOutOfBounds { .. } => ErrorKind::InvalidIndex,
            BufferError::TooManyLines { .. } | BufferError::LineTooLong { .. } => {
                ErrorKind::CapacityExceeded
            }
            BufferError::EmptyPattern => ErrorKind::EmptyPattern,
            BufferError::NoFilePath | BufferError::Io(_) => ErrorKind::Io,
        }
    }
}
