//! Substring search using Knuth-Morris-Pratt.
//!
//! ## Learning: Precomputation
//!
//! The failure table (`lps`) is built once per pattern and then reused for
//! every line, so searching the whole buffer costs O(pattern + text).
//!
//! Patterns are matched as raw bytes. A match never spans two lines.

use crate::index::char_index_of_byte;
use crate::position::SearchResult;
use crate::{BufferError, BufferResult};

/// A compiled search pattern.
#[derive(Debug, Clone)]
pub struct Pattern<'p> {
    bytes: &'p [u8],
    /// `lps[i]` is the length of the longest proper prefix of
    /// `bytes[..=i]` that is also a suffix of it
    lps: Vec<usize>,
}

impl<'p> Pattern<'p> {
    /// Compiles a pattern. Empty patterns are rejected.
    pub fn new(pattern: &'p [u8]) -> BufferResult<Self> {
        if pattern.is_empty() {
            return Err(BufferError::EmptyPattern);
        }
        Ok(Self {
            bytes: pattern,
            lps: build_lps(pattern),
        })
    }

    /// The pattern bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes
    }

    /// Pattern length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty patterns cannot be compiled.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The failure table.
    pub fn lps(&self) -> &[usize] {
        &self.lps
    }

    /// Byte offsets of every match in `line`, overlapping matches included.
    pub fn matches<'a>(&'a self, line: &'a [u8]) -> Matches<'a> {
        Matches::new(self, line, true)
    }

    /// Byte offsets of leftmost non-overlapping matches in `line`.
    ///
    /// Each match consumes the pattern's length before scanning resumes.
    pub fn non_overlapping<'a>(&'a self, line: &'a [u8]) -> Matches<'a> {
        Matches::new(self, line, false)
    }

    /// Counts matches in one line, overlapping matches included.
    pub fn count_in_line(&self, line: &[u8]) -> usize {
        self.matches(line).count()
    }

    /// Locates matches in one line as `(line_index, character column)`.
    ///
    /// A match starting inside a multi-byte sequence (possible when the
    /// pattern itself begins with a continuation byte) reports its byte
    /// offset as the column.
    pub fn collect_in_line(&self, line: &[u8], line_index: usize) -> Vec<SearchResult> {
        self.matches(line)
            .map(|byte| {
                let column = char_index_of_byte(line, byte).unwrap_or(byte);
                SearchResult::new(line_index, column)
            })
            .collect()
    }
}

/// Builds the KMP failure table for a non-empty pattern.
fn build_lps(pattern: &[u8]) -> Vec<usize> {
    let mut lps = vec![0; pattern.len()];
    let mut len = 0;
    let mut i = 1;

    while i < pattern.len() {
        if pattern[i] == pattern[len] {
            len += 1;
            lps[i] = len;
            i += 1;
        } else if len != 0 {
            len = lps[len - 1];
        } else {
            lps[i] = 0;
            i += 1;
        }
    }

    lps
}

/// Iterator over match start offsets produced by a KMP scan.
#[derive(Debug)]
pub struct Matches<'a> {
    pattern: &'a Pattern<'a>,
    text: &'a [u8],
    /// Next text byte to compare
    i: usize,
    /// Pattern bytes matched so far
    j: usize,
    overlapping: bool,
}

impl<'a> Matches<'a> {
    fn new(pattern: &'a Pattern<'a>, text: &'a [u8], overlapping: bool) -> Self {
        Self {
            pattern,
            text,
            i: 0,
            j: 0,
            overlapping,
        }
    }
}

impl Iterator for Matches<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let pat = self.pattern.bytes;
        let m = pat.len();

        while self.i < self.text.len() {
            if self.text[self.i] == pat[self.j] {
                self.i += 1;
                self.j += 1;
                if self.j == m {
                    let start = self.i - m;
                    // Overlapping scans keep the longest border; otherwise restart
                    self.j = if self.overlapping {
                        self.pattern.lps[m - 1]
                    } else {
                        0
                    };
                    return Some(start);
                }
            } else if self.j != 0 {
                self.j = self.pattern.lps[self.j - 1];
            } else {
                self.i += 1;
            }
        }

        None
    }
}
