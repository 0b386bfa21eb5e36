//! Character/byte index translation within a single line.
//!
//! Users address text in characters; storage is bytes. Every
//! position-based mutation resolves its character coordinates through
//! these functions before touching the line.

use crate::codepoint::codepoints;

/// Number of decoded codepoints in `line`.
pub fn char_len(line: &[u8]) -> usize {
    codepoints(line).count()
}

/// Byte offset of the character at `char_index`.
///
/// `char_index == char_len(line)` yields `line.len()` (the end of the
/// line, a valid insertion point). Returns `None` past that.
pub fn byte_offset_of(line: &[u8], char_index: usize) -> Option<usize> {
    let mut walked = 0;
    for (offset, _) in codepoints(line) {
        if walked == char_index {
            return Some(offset);
        }
        walked += 1;
    }
    (walked == char_index).then_some(line.len())
}

/// Character index of the codepoint starting at `byte_offset`.
///
/// Returns `None` when the offset falls inside a multi-byte sequence or
/// past the end of the line.
pub fn char_index_of_byte(line: &[u8], byte_offset: usize) -> Option<usize> {
    let mut index = 0;
    for (offset, _) in codepoints(line) {
        if offset == byte_offset {
            return Some(index);
        }
        if offset > byte_offset {
            return None;
        }
        index += 1;
    }
    (byte_offset == line.len()).then_some(index)
}

/// Resolves the character span `[column, column + len)` to a byte range.
///
/// `len` is clamped to the characters remaining on the line. Returns
/// `None` when `column` is not a valid character index.
pub fn byte_range_of(line: &[u8], column: usize, len: usize) -> Option<std::ops::Range<usize>> {
    let start = byte_offset_of(line, column)?;
    let end = codepoints(&line[start..])
        .nth(len)
        .map_or(line.len(), |(offset, _)| start + offset);
    Some(start..end)
}
