//! # Quill - Line Editing From the Command Line
//!
//! Opens one file, runs one command against it, prints the outcome and
//! saves the result.
//!
//! ## Quick Start
//!
//! ```bash
//! # Character statistics
//! cargo run -- notes.txt stats
//!
//! # Count overlapping matches
//! cargo run -- notes.txt count aa
//!
//! # Replace everywhere, print instead of saving
//! cargo run -- --dry-run notes.txt replace-all colour color
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill_core::{Command, CommandOutput, Config, Editor};

/// Quill - line-oriented text editing
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to edit (started empty if it does not exist)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Config file to use instead of the user config
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Save the result here instead of back to FILE
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the edited text instead of saving
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

/// Lines and columns are 0-indexed; columns count characters.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Action {
    /// Print the buffer with line numbers
    Show,
    /// Character statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Count occurrences of a pattern (overlapping)
    Count { pattern: String },
    /// List every occurrence of a pattern
    Find {
        pattern: String,
        #[arg(long)]
        json: bool,
    },
    /// Insert a line before INDEX
    InsertLine { index: usize, text: String },
    /// Append a line
    Append { text: String },
    /// Insert text at a line and column
    Insert {
        line: usize,
        column: usize,
        text: String,
    },
    /// Insert text at a global character position
    InsertAt { position: usize, text: String },
    /// Replace LEN characters at a line and column
    Replace {
        line: usize,
        column: usize,
        len: usize,
        text: String,
    },
    /// Replace one character
    ReplaceChar {
        line: usize,
        column: usize,
        text: String,
    },
    /// Replace every occurrence of a pattern
    ReplaceAll { pattern: String, replacement: String },
    /// Delete every occurrence of a pattern
    Delete { pattern: String },
    /// Delete LEN characters at a line and column
    DeleteRange {
        line: usize,
        column: usize,
        len: usize,
    },
    /// Delete a line
    DeleteLine { index: usize },
}

impl Action {
    /// The editor command this action runs; `None` for display-only actions.
    fn to_command(&self) -> Option<Command> {
        let command = match self {
            Action::Show => return None,
            Action::Stats { .. } => Command::Statistics,
            Action::Count { pattern } => Command::Count {
                pattern: pattern.clone(),
            },
            Action::Find { pattern, .. } => Command::Find {
                pattern: pattern.clone(),
            },
            Action::InsertLine { index, text } => Command::InsertLine {
                index: *index,
                text: text.clone(),
            },
            Action::Append { text } => Command::AppendLine { text: text.clone() },
            Action::Insert { line, column, text } => Command::Insert {
                line: *line,
                column: *column,
                text: text.clone(),
            },
            Action::InsertAt { position, text } => Command::InsertAt {
                position: *position,
                text: text.clone(),
            },
            Action::Replace {
                line,
                column,
                len,
                text,
            } => Command::Replace {
                line: *line,
                column: *column,
                len: *len,
                text: text.clone(),
            },
            Action::ReplaceChar { line, column, text } => Command::ReplaceChar {
                line: *line,
                column: *column,
                text: text.clone(),
            },
            Action::ReplaceAll {
                pattern,
                replacement,
            } => Command::ReplaceAll {
                pattern: pattern.clone(),
                replacement: replacement.clone(),
            },
            Action::Delete { pattern } => Command::DeleteSubstring {
                pattern: pattern.clone(),
            },
            Action::DeleteRange { line, column, len } => Command::DeleteRange {
                line: *line,
                column: *column,
                len: *len,
            },
            Action::DeleteLine { index } => Command::DeleteLine { index: *index },
        };
        Some(command)
    }

    fn wants_json(&self) -> bool {
        matches!(
            self,
            Action::Stats { json: true } | Action::Find { json: true, .. }
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(),
    };

    let mut editor = Editor::with_config(config);
    if args.file.exists() {
        let report = editor
            .open_file(&args.file)
            .with_context(|| format!("Failed to open {}", args.file.display()))?;
        if !report.is_complete() {
            eprintln!(
                "warning: {} line(s) truncated, {} line(s) beyond the limit skipped",
                report.truncated.len(),
                report.dropped_lines
            );
        }
    } else {
        tracing::info!("{} does not exist, starting empty", args.file.display());
    }

    let Some(command) = args.action.to_command() else {
        show(&editor, &args);
        return Ok(());
    };

    let output = editor
        .execute(&command)
        .with_context(|| format!("{} failed", command.display_name()))?;
    report(&output, &editor, args.action.wants_json())?;

    if command.is_mutating() && editor.buffer().is_modified() {
        if args.dry_run {
            println!("{}", editor.buffer().text());
        } else {
            let target = args.output.as_ref().unwrap_or(&args.file);
            editor
                .save_as(target)
                .with_context(|| format!("Failed to save {}", target.display()))?;
            println!("Saved {} lines to {}", editor.buffer().line_count(), target.display());
        }
    }

    Ok(())
}

/// Prints the buffer with 1-based line numbers.
fn show(editor: &Editor, args: &Args) {
    let buffer = editor.buffer();
    let marker = if buffer.is_modified() { " [modified]" } else { "" };
    println!("File: {}{}", args.file.display(), marker);
    println!("{} lines", buffer.line_count());
    println!("----------------------------------");
    if buffer.is_empty() {
        println!("(empty)");
    }
    for (index, line) in buffer.lines().enumerate() {
        println!("{:>3} | {}", index + 1, String::from_utf8_lossy(line));
    }
}

/// Prints what a command produced.
fn report(output: &CommandOutput, editor: &Editor, json: bool) -> anyhow::Result<()> {
    match output {
        CommandOutput::Done => println!("Done"),
        CommandOutput::Truncated(cut) => println!(
            "Line {} truncated from {} to {} bytes",
            cut.line + 1,
            cut.original_len,
            cut.kept_len
        ),
        CommandOutput::Inserted(position) => println!("Inserted at {}", position),
        CommandOutput::Removed(text) => println!("Removed: {}", text),
        CommandOutput::Count(count) => println!("{} occurrence(s)", count),
        CommandOutput::Matches(hits) if json => {
            println!("{}", serde_json::to_string_pretty(hits)?);
        }
        CommandOutput::Matches(hits) => {
            for hit in hits {
                let line = editor.buffer().line_str(hit.line)?;
                println!("{:<8} {}", hit.to_string(), line);
            }
            println!("{} match(es)", hits.len());
        }
        CommandOutput::Statistics(stats) if json => {
            println!("{}", serde_json::to_string_pretty(stats)?);
        }
        CommandOutput::Statistics(stats) => println!("{}", stats),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["quill", "notes.txt", "show"]);
        assert_eq!(args.file, PathBuf::from("notes.txt"));
        assert_eq!(args.action, Action::Show);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_action_to_command() {
        let args = Args::parse_from(["quill", "-n", "a.txt", "replace-all", "x", "y"]);
        assert!(args.dry_run);
        assert_eq!(
            args.action.to_command(),
            Some(Command::ReplaceAll {
                pattern: "x".into(),
                replacement: "y".into()
            })
        );
        assert_eq!(Action::Show.to_command(), None);
    }

    #[test]
    fn test_json_flag() {
        let args = Args::parse_from(["quill", "a.txt", "find", "ab", "--json"]);
        assert!(args.action.wants_json());
        let args = Args::parse_from(["quill", "a.txt", "stats"]);
        assert!(!args.action.wants_json());
    }
}
