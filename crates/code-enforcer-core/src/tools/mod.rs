//! Boundaries to the external tools the enforcer delegates to.
//!
//! Each tool is consumed through a small trait so the pipeline can be driven
//! with in-process fakes. The default implementations shell out to the
//! project's locally installed tools.

mod doc;
mod json;
mod lint;

pub use doc::{CoverageEntry, DocLintLine, DocLintRecord, DocReport, DocTool, EsdocTool};
pub use json::{JsonFormatter, SerdeJsonFormatter};
pub use lint::{EslintEngine, LintEngine, LintFileResult, LintMessage};

use std::path::PathBuf;
use thiserror::Error;

/// Failures of an external tool. These abort the run.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool could not be started.
    #[error("failed to start {tool} ({command})")]
    Spawn {
        /// Tool name.
        tool: &'static str,
        /// Command that was run.
        command: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The tool exited with an unexpected status.
    #[error("{tool} exited with {status}: {stderr}")]
    Exit {
        /// Tool name.
        tool: &'static str,
        /// Exit status description.
        status: String,
        /// Captured standard error, if any.
        stderr: String,
    },

    /// The tool produced output that could not be understood.
    #[error("{tool} produced malformed output in {what}: {message}")]
    Output {
        /// Tool name.
        tool: &'static str,
        /// Which output (stream or artifact) was malformed.
        what: String,
        /// Parse error message.
        message: String,
    },

    /// One of the tool's artifacts could not be read.
    #[error("failed to read {tool} artifact {path}")]
    Read {
        /// Tool name.
        tool: &'static str,
        /// Artifact path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}
