//! Configuration loading with fallback to defaults.
//!
//! A missing, unreadable, or malformed config file never stops a run: the
//! caller gets `Config::default()` plus a notice to show the user.

use code_enforcer_core::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the given file.
    File(PathBuf),
    /// The file could not be used; built-in defaults apply.
    Default {
        /// One-line explanation for the user.
        notice: String,
    },
}

impl ConfigSource {
    /// Returns the fallback notice, if defaults were used.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::File(_) => None,
            Self::Default { notice } => Some(notice),
        }
    }
}

/// Loads the configuration at `path`, falling back to defaults.
#[must_use]
pub fn load(path: &Path) -> (Config, ConfigSource) {
    match Config::from_file(path) {
        Ok(config) => {
            tracing::debug!("Loaded config: {}", path.display());
            (config, ConfigSource::File(path.to_path_buf()))
        }
        Err(e) => {
            let notice = format!("failed to read {}: {}", path.display(), reason(&e));
            tracing::warn!("Using default configuration, {}", notice);
            (Config::default(), ConfigSource::Default { notice })
        }
    }
}

fn reason(e: &ConfigError) -> String {
    match e {
        ConfigError::Io { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}
