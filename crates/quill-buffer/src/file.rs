//! Line-file persistence.
//!
//! The on-disk format is an ordered sequence of lines, each terminated by
//! `\n`. Loading strips line endings and applies the buffer's capacity
//! limits; saving writes every line followed by a single newline.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::buffer::BufferConfig;

/// A line shortened to fit the per-line byte limit.
///
/// The cut is made at the byte limit itself and may split a multi-byte
/// character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    /// Line index the truncated text landed on
    pub line: usize,
    /// Byte length before truncation
    pub original_len: usize,
    /// Byte length kept
    pub kept_len: usize,
}

/// Lines read from disk plus what had to be cut to fit.
#[derive(Debug, Clone, Default)]
pub struct LoadedLines {
    pub lines: Vec<Vec<u8>>,
    pub truncated: Vec<Truncation>,
    /// Lines past the line limit that were not read
    pub dropped_lines: usize,
}

/// Summary of a buffer load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub line_count: usize,
    pub truncated: Vec<Truncation>,
    pub dropped_lines: usize,
}

impl LoadReport {
    /// True when every line of the file was loaded in full.
    pub fn is_complete(&self) -> bool {
        self.truncated.is_empty() && self.dropped_lines == 0
    }
}

/// Cuts `bytes` to at most `max` bytes, at the raw byte limit.
pub(crate) fn truncate_raw(mut bytes: Vec<u8>, max: usize) -> (Vec<u8>, Option<(usize, usize)>) {
    let original_len = bytes.len();
    if original_len <= max {
        return (bytes, None);
    }
    bytes.truncate(max);
    (bytes, Some((original_len, max)))
}

/// Splits raw file content into lines and applies `config` limits.
pub fn split_lines(content: &[u8], config: &BufferConfig) -> LoadedLines {
    let mut loaded = LoadedLines::default();
    if content.is_empty() {
        return loaded;
    }

    // A trailing newline terminates the last line rather than starting a new one
    let body = content.strip_suffix(b"\n").unwrap_or(content);

    for raw in body.split(|&b| b == b'\n') {
        if loaded.lines.len() == config.max_lines {
            loaded.dropped_lines += 1;
            continue;
        }

        let end = raw
            .iter()
            .rposition(|&b| b != b'\r' && b != b'\n')
            .map_or(0, |i| i + 1);
        let (line, cut) = truncate_raw(raw[..end].to_vec(), config.max_line_length);
        if let Some((original_len, kept_len)) = cut {
            loaded.truncated.push(Truncation {
                line: loaded.lines.len(),
                original_len,
                kept_len,
            });
        }
        loaded.lines.push(line);
    }

    loaded
}

/// Reads a line file from disk.
pub fn read_lines(path: impl AsRef<Path>, config: &BufferConfig) -> std::io::Result<LoadedLines> {
    let content = std::fs::read(path.as_ref())?;
    Ok(split_lines(&content, config))
}

/// Writes lines to disk, one `\n` after each.
///
/// With `atomic` set the content goes to a fresh temporary file in the
/// target's directory, which is synced and then persisted over the target.
/// A failed atomic write removes the temporary file and leaves the target
/// untouched.
pub fn write_lines<'a>(
    path: impl AsRef<Path>,
    lines: impl IntoIterator<Item = &'a [u8]>,
    atomic: bool,
) -> std::io::Result<()> {
    let path = path.as_ref();

    if !atomic {
        let file = std::fs::File::create(path)?;
        return write_all_lines(BufWriter::new(file), lines);
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = NamedTempFile::new_in(parent)?;
    write_all_lines(BufWriter::new(&mut temp_file), lines)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path)?;
    Ok(())
}

fn write_all_lines<'a, W: Write>(
    mut out: W,
    lines: impl IntoIterator<Item = &'a [u8]>,
) -> std::io::Result<()> {
    for line in lines {
        out.write_all(line)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn small_config() -> BufferConfig {
        BufferConfig {
            max_lines: 3,
            max_line_length: 4,
            ..BufferConfig::default()
        }
    }

    #[test]
    fn test_split_strips_line_endings() {
        let loaded = split_lines(b"one\r\ntwo\n\nthree", &BufferConfig::default());
        assert_eq!(
            loaded.lines,
            vec![b"one".to_vec(), b"two".to_vec(), Vec::new(), b"three".to_vec()]
        );
        assert!(loaded.truncated.is_empty());
    }

    #[test]
    fn test_trailing_newline_does_not_add_line() {
        let loaded = split_lines(b"a\nb\n", &BufferConfig::default());
        assert_eq!(loaded.lines.len(), 2);
        assert!(split_lines(b"", &BufferConfig::default()).lines.is_empty());
    }

    #[test]
    fn test_limits_truncate_and_drop() {
        let loaded = split_lines(b"abcdef\nx\ny\nz\nw", &small_config());
        assert_eq!(loaded.lines[0], b"abcd".to_vec());
        assert_eq!(
            loaded.truncated,
            vec![Truncation { line: 0, original_len: 6, kept_len: 4 }]
        );
        assert_eq!(loaded.lines.len(), 3);
        assert_eq!(loaded.dropped_lines, 2);
    }

    #[test]
    fn test_truncation_may_split_a_character() {
        let text = "ab\u{4e2d}";
        let loaded = split_lines(text.as_bytes(), &small_config());
        assert_eq!(loaded.lines[0].len(), 4);
        assert!(std::str::from_utf8(&loaded.lines[0]).is_err());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let lines: Vec<&[u8]> = vec![b"first".as_slice(), b"".as_slice(), "\u{4e2d}".as_bytes()];

        write_lines(&path, lines.iter().copied(), true).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), "first\n\n\u{4e2d}\n".as_bytes());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        let loaded = read_lines(&path, &BufferConfig::default()).unwrap();
        assert_eq!(loaded.lines.len(), 3);
        assert_eq!(loaded.lines[2], "\u{4e2d}".as_bytes().to_vec());
    }

    #[test]
    fn test_atomic_write_leaves_sibling_tmp_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let sibling = dir.path().join("notes.tmp");
        std::fs::write(&sibling, "keep me").unwrap();

        write_lines(&path, [b"hello".as_slice()], true).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"hello\n");
        assert_eq!(std::fs::read(&sibling).unwrap(), b"keep me");
    }

    #[test]
    fn test_atomic_write_over_tmp_named_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scratch.tmp");
        std::fs::write(&path, "old\n").unwrap();

        write_lines(&path, [b"new".as_slice()], true).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_atomic_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        // A directory cannot be replaced by a file
        let path = dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("inner.txt"), "x").unwrap();

        assert!(write_lines(&path, [b"data".as_slice()], true).is_err());
        assert!(path.is_dir());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
