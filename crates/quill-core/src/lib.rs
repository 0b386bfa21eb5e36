//! # Quill Core
//!
//! Editor facade, command dispatch and configuration.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │                  Editor                    │
//! │  ┌──────────┐  ┌──────────────────────┐   │
//! │  │  Config  │  │  Command -> Output   │   │
//! │  └──────────┘  └──────────┬───────────┘   │
//! │                           │               │
//! │              ┌────────────┴────────────┐  │
//! │              │  TextBuffer (one only)  │  │
//! │              └─────────────────────────┘  │
//! └───────────────────────────────────────────┘
//! ```

pub mod command;
pub mod config;
pub mod editor;

pub use command::{Command, CommandOutput};
pub use config::Config;
pub use editor::Editor;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Buffer error: {0}")]
    Buffer(#[from] quill_buffer::BufferError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}
