//! Core line buffer implementation.
//!
//! ## Why a Vector of Lines?
//!
//! Every operation here is line-scoped: search never crosses a line
//! boundary, and edits splice bytes within a single line. A `Vec<Vec<u8>>`
//! keeps each line independently sized while capacity limits are checked
//! explicitly before each mutation.
//!
//! ## Learning: Build, Then Swap
//!
//! Splicing operators assemble the new line in a fresh `Vec<u8>` and only
//! then replace the stored line. A rejected edit returns before the swap,
//! so a line is never left half-edited.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::file::{self, LoadReport, Truncation};
use crate::index::{byte_offset_of, byte_range_of, char_len};
use crate::position::{Position, SearchResult};
use crate::search::Pattern;
use crate::stats::CharStatistics;
use crate::{BufferError, BufferResult, MAX_LINE_LENGTH, MAX_LINES};

/// Outcome of an operation that may shorten its input to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Stored in full
    Complete,
    /// Stored after cutting to the line byte limit
    Truncated(Truncation),
}

impl Fit {
    /// Returns true if content was cut.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Fit::Truncated(_))
    }
}

/// Capacity limits and save behavior for a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    /// Maximum number of lines
    pub max_lines: usize,

    /// Maximum bytes per line
    pub max_line_length: usize,

    /// Write through a temporary file and rename on save
    pub atomic_save: bool,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_lines: MAX_LINES,
            max_line_length: MAX_LINE_LENGTH,
            atomic_save: true,
        }
    }
}

/// An ordered sequence of byte lines with a modification flag.
///
/// # Thread Safety
///
/// There is no internal locking. A host sharing one buffer between threads
/// must serialize access, e.g. with a `Mutex<TextBuffer>` held for the
/// duration of each call.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    /// Line contents without terminators
    lines: Vec<Vec<u8>>,

    /// Whether the buffer has unsaved changes
    modified: bool,

    /// Associated file path (if any)
    file_path: Option<PathBuf>,

    /// Capacity limits
    config: BufferConfig,
}

impl TextBuffer {
    /// Creates a new empty buffer with the default limits.
    ///
    /// # Example
    /// ```
    /// use quill_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// assert!(!buffer.is_modified());
    /// ```
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    /// Creates an empty buffer with custom limits.
    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            lines: Vec::new(),
            modified: false,
            file_path: None,
            config,
        }
    }

    /// Loads a buffer from a file with the default limits.
    pub fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let mut buffer = Self::new();
        buffer.load(path)?;
        Ok(buffer)
    }

    /// Replaces the buffer content with the lines of a file.
    ///
    /// The buffer is cleared first. Overlong lines are cut at the byte
    /// limit and lines past the line limit are skipped; both are listed in
    /// the returned report. On I/O failure the buffer is left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> BufferResult<LoadReport> {
        let path = path.as_ref();
        let loaded = file::read_lines(path, &self.config)?;

        self.clear();
        self.lines = loaded.lines;
        self.file_path = Some(path.to_path_buf());

        for cut in &loaded.truncated {
            tracing::warn!(
                line = cut.line,
                original_len = cut.original_len,
                "Line truncated to {} bytes on load",
                cut.kept_len
            );
        }
        if loaded.dropped_lines > 0 {
            tracing::warn!(
                "Skipped {} lines beyond the {} line limit",
                loaded.dropped_lines,
                self.config.max_lines
            );
        }
        tracing::info!("Loaded {} lines from {}", self.lines.len(), path.display());

        Ok(LoadReport {
            line_count: self.lines.len(),
            truncated: loaded.truncated,
            dropped_lines: loaded.dropped_lines,
        })
    }

    /// Saves the buffer to its associated file.
    pub fn save(&mut self) -> BufferResult<()> {
        let path = self.file_path.clone().ok_or(BufferError::NoFilePath)?;
        self.save_as(&path)
    }

    /// Saves the buffer to a specific path and associates it.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> BufferResult<()> {
        let path = path.as_ref();
        file::write_lines(path, self.lines(), self.config.atomic_save)?;

        tracing::info!("Saved {} lines to {}", self.lines.len(), path.display());
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Empties the buffer, marks it clean and forgets the file path.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.modified = false;
        self.file_path = None;
    }

    // ==================== Queries ====================

    /// Number of lines.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the buffer holds no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Raw bytes of a line.
    ///
    /// The slice borrows the buffer, so it cannot outlive the next mutation.
    pub fn line(&self, index: usize) -> BufferResult<&[u8]> {
        self.lines
            .get(index)
            .map(Vec::as_slice)
            .ok_or(BufferError::LineOutOfBounds {
                line: index,
                line_count: self.lines.len(),
            })
    }

    /// A line as text, with invalid UTF-8 replaced by U+FFFD.
    pub fn line_str(&self, index: usize) -> BufferResult<Cow<'_, str>> {
        Ok(String::from_utf8_lossy(self.line(index)?))
    }

    /// Iterates over the raw bytes of every line.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.lines.iter().map(Vec::as_slice)
    }

    /// All lines joined with `\n` (no trailing newline).
    pub fn text(&self) -> String {
        let joined = self.lines.join(&b'\n');
        String::from_utf8_lossy(&joined).into_owned()
    }

    /// Characters on a line.
    pub fn char_len(&self, index: usize) -> BufferResult<usize> {
        Ok(char_len(self.line(index)?))
    }

    /// Total characters across all lines, line boundaries excluded.
    pub fn len_chars(&self) -> usize {
        self.lines().map(char_len).sum()
    }

    /// Total bytes across all lines, line boundaries excluded.
    pub fn len_bytes(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }

    /// Length of the global character address space: every character
    /// plus one unit per boundary between lines.
    pub fn global_len(&self) -> usize {
        self.len_chars() + self.lines.len().saturating_sub(1)
    }

    /// Returns true if the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the associated file path, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// The associated file name for display, empty when there is none.
    pub fn filename(&self) -> Cow<'_, str> {
        self.file_path
            .as_deref()
            .map_or(Cow::Borrowed(""), |p| p.to_string_lossy())
    }

    /// Returns the buffer's limits.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    // ==================== Line Mutations ====================

    /// Inserts a new line before `index` (`index == line_count` appends).
    ///
    /// Text longer than the line limit is cut at the byte limit, which may
    /// split a multi-byte character; the cut is reported, not rejected.
    pub fn insert_line(&mut self, index: usize, text: impl AsRef<[u8]>) -> BufferResult<Fit> {
        if self.lines.len() >= self.config.max_lines {
            return Err(BufferError::TooManyLines {
                max: self.config.max_lines,
            });
        }
        if index > self.lines.len() {
            return Err(BufferError::LineOutOfBounds {
                line: index,
                line_count: self.lines.len(),
            });
        }

        let (line, cut) = file::truncate_raw(text.as_ref().to_vec(), self.config.max_line_length);
        self.lines.insert(index, line);
        self.modified = true;

        Ok(match cut {
            Some((original_len, kept_len)) => {
                tracing::warn!(line = index, "Inserted line truncated to {} bytes", kept_len);
                Fit::Truncated(Truncation {
                    line: index,
                    original_len,
                    kept_len,
                })
            }
            None => Fit::Complete,
        })
    }

    /// Appends a line at the end of the buffer.
    pub fn append_line(&mut self, text: impl AsRef<[u8]>) -> BufferResult<Fit> {
        self.insert_line(self.lines.len(), text)
    }

    /// Removes a line and returns its content.
    pub fn delete_line(&mut self, index: usize) -> BufferResult<Vec<u8>> {
        self.check_line(index)?;
        let removed = self.lines.remove(index);
        self.modified = true;
        Ok(removed)
    }

    // ==================== Positional Edits ====================

    /// Inserts `text` before character `column` of `line`.
    ///
    /// `column == char_len(line)` appends to the line. Fails without
    /// changing anything if the result would exceed the line limit. An
    /// empty `text` is validated but leaves the buffer clean.
    pub fn insert_substring(
        &mut self,
        line: usize,
        column: usize,
        text: impl AsRef<[u8]>,
    ) -> BufferResult<()> {
        let text = text.as_ref();
        let current = self.line(line)?;
        let at = byte_offset_of(current, column).ok_or_else(|| BufferError::ColumnOutOfBounds {
            line,
            column,
            len: char_len(current),
        })?;
        self.check_fit(line, current.len() + text.len())?;
        if text.is_empty() {
            return Ok(());
        }

        let mut spliced = Vec::with_capacity(current.len() + text.len());
        spliced.extend_from_slice(&current[..at]);
        spliced.extend_from_slice(text);
        spliced.extend_from_slice(&current[at..]);

        self.commit_line(line, spliced);
        Ok(())
    }

    /// Inserts `text` at a global character position.
    ///
    /// Positions count every character of every line plus one unit for each
    /// boundary between lines, so position `global_len()` is the very end.
    /// An empty buffer accepts only position 0, where the text becomes the
    /// first line. Returns the line/column the text was inserted at.
    pub fn insert_at_global(
        &mut self,
        position: usize,
        text: impl AsRef<[u8]>,
    ) -> BufferResult<Position> {
        let text = text.as_ref();

        if self.lines.is_empty() {
            if position != 0 {
                return Err(BufferError::PositionOutOfBounds { position, len: 0 });
            }
            self.check_fit(0, text.len())?;
            self.insert_line(0, text)?;
            return Ok(Position::ZERO);
        }

        let target = self.resolve_global(position)?;
        self.insert_substring(target.line, target.column, text)?;
        Ok(target)
    }

    /// Maps a global character position to a line/column.
    pub fn resolve_global(&self, position: usize) -> BufferResult<Position> {
        let mut line_start = 0;
        for (index, line) in self.lines().enumerate() {
            let len = char_len(line);
            if position <= line_start + len {
                return Ok(Position::new(index, position - line_start));
            }
            // One unit for the boundary to the next line
            line_start += len + 1;
        }
        Err(BufferError::PositionOutOfBounds {
            position,
            len: self.global_len(),
        })
    }

    /// Replaces `len` characters starting at `column` with `text`.
    ///
    /// `column` must address an existing character; `len` is clamped to the
    /// characters remaining on the line. Replacing zero characters with
    /// empty text leaves the buffer clean.
    pub fn replace_range(
        &mut self,
        line: usize,
        column: usize,
        len: usize,
        text: impl AsRef<[u8]>,
    ) -> BufferResult<()> {
        let text = text.as_ref();
        let range = self.existing_range(line, column, len)?;
        let current = &self.lines[line];
        let new_len = current.len() - range.len() + text.len();
        self.check_fit(line, new_len)?;
        if range.is_empty() && text.is_empty() {
            return Ok(());
        }

        let current = &self.lines[line];
        let mut spliced = Vec::with_capacity(new_len);
        spliced.extend_from_slice(&current[..range.start]);
        spliced.extend_from_slice(text);
        spliced.extend_from_slice(&current[range.end..]);

        self.commit_line(line, spliced);
        Ok(())
    }

    /// Replaces the single character at `column` with `text`, which may be
    /// any number of characters.
    pub fn replace_char(
        &mut self,
        line: usize,
        column: usize,
        text: impl AsRef<[u8]>,
    ) -> BufferResult<()> {
        self.replace_range(line, column, 1, text)
    }

    /// Removes `len` characters starting at `column` and returns them.
    ///
    /// `len == 0` only validates the position; the buffer stays clean.
    pub fn delete_range(&mut self, line: usize, column: usize, len: usize) -> BufferResult<Vec<u8>> {
        let range = self.existing_range(line, column, len)?;
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let removed: Vec<u8> = self.lines[line].drain(range).collect();
        self.modified = true;
        Ok(removed)
    }

    // ==================== Pattern Edits ====================

    /// Replaces every non-overlapping occurrence of `pattern`, line by line.
    ///
    /// Returns the number of replacements made. The buffer is marked
    /// modified whenever that number is non-zero, even if `replacement`
    /// equals `pattern`.
    ///
    /// When a line would outgrow the byte limit, replacement on that line
    /// stops before the first occurrence whose replacement would leave no
    /// room for the rest of the line. That rest is kept unmodified, so no
    /// original content is ever dropped.
    pub fn replace_all(
        &mut self,
        pattern: impl AsRef<[u8]>,
        replacement: impl AsRef<[u8]>,
    ) -> BufferResult<usize> {
        let pattern = Pattern::new(pattern.as_ref())?;
        let replacement = replacement.as_ref();
        let max = self.config.max_line_length;
        let mut total = 0;

        for index in 0..self.lines.len() {
            let line = &self.lines[index];
            let mut out = Vec::with_capacity(line.len());
            let mut last = 0;
            let mut count = 0;

            for start in pattern.non_overlapping(line) {
                let prefix = &line[last..start];
                let tail = line.len() - start - pattern.len();
                if out.len() + prefix.len() + replacement.len() + tail > max {
                    tracing::debug!(line = index, "Replacement stopped at the line limit");
                    break;
                }
                out.extend_from_slice(prefix);
                out.extend_from_slice(replacement);
                last = start + pattern.len();
                count += 1;
            }

            if count == 0 {
                continue;
            }

            out.extend_from_slice(&line[last..]);
            self.lines[index] = out;
            total += count;
        }

        if total > 0 {
            self.modified = true;
        }
        tracing::debug!(replaced = total, "replace_all finished");
        Ok(total)
    }

    /// Removes every non-overlapping occurrence of `pattern`.
    pub fn delete_substring(&mut self, pattern: impl AsRef<[u8]>) -> BufferResult<usize> {
        self.replace_all(pattern, b"")
    }

    // ==================== Search ====================

    /// Counts occurrences of `pattern`, overlapping ones included.
    pub fn find_count(&self, pattern: impl AsRef<[u8]>) -> BufferResult<usize> {
        let pattern = Pattern::new(pattern.as_ref())?;
        Ok(self.lines().map(|line| pattern.count_in_line(line)).sum())
    }

    /// Locates every occurrence of `pattern`, ordered by line then column.
    pub fn find_all(&self, pattern: impl AsRef<[u8]>) -> BufferResult<Vec<SearchResult>> {
        let pattern = Pattern::new(pattern.as_ref())?;
        Ok(self
            .lines()
            .enumerate()
            .flat_map(|(index, line)| pattern.collect_in_line(line, index))
            .collect())
    }

    // ==================== Statistics ====================

    /// Classifies every character of the buffer.
    pub fn statistics(&self) -> CharStatistics {
        CharStatistics::from_lines(self.lines())
    }

    // ==================== Helpers ====================

    fn check_line(&self, line: usize) -> BufferResult<()> {
        if line >= self.lines.len() {
            return Err(BufferError::LineOutOfBounds {
                line,
                line_count: self.lines.len(),
            });
        }
        Ok(())
    }

    fn check_fit(&self, line: usize, len: usize) -> BufferResult<()> {
        if len > self.config.max_line_length {
            return Err(BufferError::LineTooLong {
                line,
                len,
                max: self.config.max_line_length,
            });
        }
        Ok(())
    }

    /// Byte range of `[column, column + len)` where `column` must name an
    /// existing character.
    fn existing_range(
        &self,
        line: usize,
        column: usize,
        len: usize,
    ) -> BufferResult<std::ops::Range<usize>> {
        let current = self.line(line)?;
        let chars = char_len(current);
        if column >= chars {
            return Err(BufferError::ColumnOutOfBounds {
                line,
                column,
                len: chars,
            });
        }
        byte_range_of(current, column, len).ok_or(BufferError::ColumnOutOfBounds {
            line,
            column,
            len: chars,
        })
    }

    fn commit_line(&mut self, line: usize, content: Vec<u8>) {
        self.lines[line] = content;
        self.modified = true;
    }
}

impl From<&str> for TextBuffer {
    /// Splits on `\n` with the default limits. The buffer starts clean.
    fn from(s: &str) -> Self {
        let config = BufferConfig::default();
        let loaded = file::split_lines(s.as_bytes(), &config);
        Self {
            lines: loaded.lines,
            modified: false,
            file_path: None,
            config,
        }
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}
