//! # code-enforcer-core
//!
//! Core engine for source-code compliance checking on raw text.
//!
//! This crate provides the pieces a run is assembled from:
//!
//! - [`Rule`] trait for regex-driven per-file checks, and [`RuleRegistry`]
//!   for indexing them by identifier
//! - [`FileSetBuilder`] for turning include/exclude globs into loaded files
//! - [`scanner`] and [`position`] for finding matches and mapping them back
//!   to displayable source lines
//! - [`tools`] for the external lint, documentation and JSON collaborators
//! - [`Enforcer`] for sequencing every stage into one [`Report`]
//!
//! ## Example
//!
//! ```ignore
//! use code_enforcer_core::{Config, Enforcer};
//!
//! let report = Enforcer::builder()
//!     .root(".")
//!     .config(Config::default())
//!     .rule(MyRule::new())
//!     .build()?
//!     .run()
//!     .await?;
//!
//! assert!(report.is_clean());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod enforcer;
mod file_set;
mod rule;
mod types;

pub mod position;
pub mod scanner;
pub mod tools;

pub use config::{
    Config, ConfigError, DocToolConfig, GlobSpec, LintToolConfig, DEFAULT_CONFIG_FILE,
};
pub use enforcer::{
    Enforcer, EnforcerBuilder, EnforcerError, Stage, DOC_SOURCE, JSON_SOURCE, LINT_SOURCE,
    MANIFEST_SOURCE,
};
pub use file_set::{FileSetBuilder, FileSetError};
pub use rule::{RegisteredRule, RegistryError, Rule, RuleBox, RuleRegistry};
pub use types::{Diagnostic, DiagnosticSink, Position, Report, SourceFile};
