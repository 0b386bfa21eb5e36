//! Main editor orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Editor` owns the one buffer in use plus its configuration. Front ends
//! hold an `Editor` and pass it around by reference; there is no global
//! buffer.

use std::io;
use std::path::{Path, PathBuf};

use quill_buffer::{BufferError, Fit, LoadReport, TextBuffer};

use crate::command::{Command, CommandOutput};
use crate::config::Config;
use crate::{CoreError, CoreResult};

/// The editor state: one buffer and the settings it was built with.
#[derive(Debug)]
pub struct Editor {
    /// The buffer being edited
    buffer: TextBuffer,

    /// Editor configuration
    config: Config,
}

impl Editor {
    /// Creates an editor with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an editor with custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            buffer: TextBuffer::with_config(config.buffer_config()),
            config,
        }
    }

    /// Returns the buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns a mutable reference to the buffer.
    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    /// Returns the editor configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== File Operations ====================

    /// Replaces the buffer content with a file.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> CoreResult<LoadReport> {
        let path = path.as_ref();
        match self.buffer.load(path) {
            Ok(report) => Ok(report),
            Err(BufferError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Err(CoreError::FileNotFound(path.display().to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Saves the buffer to its associated file.
    pub fn save(&mut self) -> CoreResult<()> {
        let path = self
            .buffer
            .file_path()
            .map(Path::to_path_buf)
            .ok_or(CoreError::Buffer(quill_buffer::BufferError::NoFilePath))?;
        self.save_as(path)
    }

    /// Saves the buffer to `path`, backing up the old file if configured.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        if self.config.files.backup_on_save && path.exists() {
            let backup = backup_path(path);
            std::fs::copy(path, &backup)?;
            tracing::debug!("Backed up {} to {}", path.display(), backup.display());
        }
        self.buffer.save_as(path)?;
        Ok(())
    }

    // ==================== Commands ====================

    /// Runs a command against the buffer.
    pub fn execute(&mut self, command: &Command) -> CoreResult<CommandOutput> {
        tracing::debug!("Executing {}", command.display_name());
        let buf = &mut self.buffer;

        let output = match command {
            Command::InsertLine { index, text } => fit_output(buf.insert_line(*index, text)?),
            Command::AppendLine { text } => fit_output(buf.append_line(text)?),
            Command::DeleteLine { index } => removed(buf.delete_line(*index)?),
            Command::Clear => {
                buf.clear();
                CommandOutput::Done
            }

            Command::Insert { line, column, text } => {
                buf.insert_substring(*line, *column, text)?;
                CommandOutput::Inserted(quill_buffer::Position::new(*line, *column))
            }
            Command::InsertAt { position, text } => {
                CommandOutput::Inserted(buf.insert_at_global(*position, text)?)
            }
            Command::Replace {
                line,
                column,
                len,
                text,
            } => {
                buf.replace_range(*line, *column, *len, text)?;
                CommandOutput::Done
            }
            Command::ReplaceChar { line, column, text } => {
                buf.replace_char(*line, *column, text)?;
                CommandOutput::Done
            }
            Command::DeleteRange { line, column, len } => {
                removed(buf.delete_range(*line, *column, *len)?)
            }

            Command::ReplaceAll {
                pattern,
                replacement,
            } => CommandOutput::Count(buf.replace_all(pattern, replacement)?),
            Command::DeleteSubstring { pattern } => {
                CommandOutput::Count(buf.delete_substring(pattern)?)
            }

            Command::Count { pattern } => CommandOutput::Count(buf.find_count(pattern)?),
            Command::Find { pattern } => CommandOutput::Matches(buf.find_all(pattern)?),
            Command::Statistics => CommandOutput::Statistics(buf.statistics()),
        };

        Ok(output)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

fn fit_output(fit: Fit) -> CommandOutput {
    match fit {
        Fit::Complete => CommandOutput::Done,
        Fit::Truncated(cut) => CommandOutput::Truncated(cut),
    }
}

fn removed(bytes: Vec<u8>) -> CommandOutput {
    CommandOutput::Removed(String::from_utf8_lossy(&bytes).into_owned())
}

/// `notes.txt` -> `notes.txt.bak`
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
