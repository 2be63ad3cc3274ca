//! Expands glob specs into loaded source files.

use crate::config::GlobSpec;
use crate::types::SourceFile;

use glob::MatchOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Wildcards never match a leading `.`, so dotfiles and dot-directories are
/// only selected when a pattern names them literally.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

/// Errors that can occur while building a file set. All of them are fatal.
#[derive(Debug, Error)]
pub enum FileSetError {
    /// An include or exclude pattern is not a valid glob.
    #[error("Invalid glob pattern `{pattern}`")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        source: glob::PatternError,
    },

    /// A directory could not be traversed during expansion.
    #[error("Failed to expand glob")]
    Glob(#[from] glob::GlobError),

    /// A selected file could not be read.
    #[error("Failed to read {path}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Builds file sets relative to a project root.
#[derive(Debug, Clone)]
pub struct FileSetBuilder {
    root: PathBuf,
}

impl FileSetBuilder {
    /// Creates a builder that resolves patterns against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Expands every spec in order and loads each selected file.
    ///
    /// Include patterns are expanded independently, so a file matched by two
    /// patterns appears twice.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid pattern, an unreadable directory, or a
    /// selected file that cannot be read.
    pub fn build(&self, specs: &[&GlobSpec]) -> Result<Vec<SourceFile>, FileSetError> {
        let mut files = Vec::new();
        for spec in specs {
            for path in self.expand(spec)? {
                files.push(self.read(&path)?);
            }
        }
        Ok(files)
    }

    /// Expands a single spec into relative paths, without reading them.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid pattern or an unreadable directory.
    pub fn expand(&self, spec: &GlobSpec) -> Result<Vec<PathBuf>, FileSetError> {
        let excludes = spec
            .exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| FileSetError::Pattern {
                    pattern: p.clone(),
                    source: e,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let root_prefix = glob::Pattern::escape(&self.root.to_string_lossy());
        let mut paths = Vec::new();

        for include in &spec.include {
            let pattern = format!("{root_prefix}/{include}");
            let entries = glob::glob_with(&pattern, MATCH_OPTIONS).map_err(|e| FileSetError::Pattern {
                pattern: include.clone(),
                source: e,
            })?;

            for entry in entries {
                let path = entry?;
                if !path.is_file() {
                    continue;
                }

                let relative = self.relative(&path);
                if excludes.iter().any(|p| p.matches_path_with(&relative, MATCH_OPTIONS)) {
                    debug!("Excluding: {}", relative.display());
                    continue;
                }

                paths.push(relative);
            }
        }

        Ok(paths)
    }

    /// Loads a file (given relative to the root) into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as UTF-8 text.
    pub fn read(&self, relative: &Path) -> Result<SourceFile, FileSetError> {
        let full = self.root.join(relative);
        let content = std::fs::read_to_string(&full).map_err(|e| FileSetError::Read {
            path: full.clone(),
            source: e,
        })?;
        Ok(SourceFile::new(relative, content))
    }

    /// Returns the root patterns are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Strips the root from `path` when it lies beneath it.
    #[must_use]
    pub fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}
