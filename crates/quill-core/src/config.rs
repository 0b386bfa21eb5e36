//! Editor configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[derive(Serialize, Deserialize)]` generates the TOML conversion.
//! `#[serde(default)]` fills missing fields from `Default::default()`, so
//! a config file only needs the keys it wants to change.

use quill_buffer::{BufferConfig, MAX_LINE_LENGTH, MAX_LINES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Buffer capacity settings
    pub buffer: BufferSection,

    /// File handling settings
    pub files: FileConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("quill").join("config.toml"))
    }

    /// Writes the config to a file, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Rejects limits a buffer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer.max_lines == 0 {
            return Err(ConfigError::Invalid("buffer.max_lines must be at least 1".into()));
        }
        if self.buffer.max_line_length == 0 {
            return Err(ConfigError::Invalid(
                "buffer.max_line_length must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Buffer settings derived from this config.
    pub fn buffer_config(&self) -> BufferConfig {
        BufferConfig {
            max_lines: self.buffer.max_lines,
            max_line_length: self.buffer.max_line_length,
            atomic_save: self.files.atomic_save,
        }
    }
}

/// Buffer capacity configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferSection {
    /// Maximum number of lines
    pub max_lines: usize,

    /// Maximum bytes per line
    pub max_line_length: usize,
}

impl Default for BufferSection {
    fn default() -> Self {
        Self {
            max_lines: MAX_LINES,
            max_line_length: MAX_LINE_LENGTH,
        }
    }
}

/// File handling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Write through a temporary file and rename
    pub atomic_save: bool,

    /// Copy the previous file to `<name>.bak` before overwriting
    pub backup_on_save: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            atomic_save: true,
            backup_on_save: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.buffer.max_lines, 1000);
        assert_eq!(config.buffer.max_line_length, 4096);
        assert!(config.files.atomic_save);
        assert_eq!(config.buffer_config(), BufferConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[buffer]\nmax_lines = 50\n").unwrap();
        assert_eq!(config.buffer.max_lines, 50);
        assert_eq!(config.buffer.max_line_length, 4096);
        assert!(!config.files.backup_on_save);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.files.backup_on_save = true;

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_zero_limits_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[buffer]\nmax_line_length = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }
}
