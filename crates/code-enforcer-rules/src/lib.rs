//! # code-enforcer-rules
//!
//! Built-in compliance rules for code-enforcer.
//!
//! Every rule is a raw-text pattern check over JavaScript sources; none of
//! them parse the code.
//!
//! ## Available Rules
//!
//! | Name | Description |
//! |------|-------------|
//! | `ascii-only` | Forbids characters outside printable ASCII |
//! | `console-style-calls` | Forbids `console.*` calls |
//! | `no-extension-imports` | Forbids `.js` suffixes on import paths |
//! | `no-index-imports` | Forbids explicit `/index` import paths |
//! | `no-todo-tags` | Forbids configured tags (`TODO`, `FIXME`) in comments |
//!
//! ## Usage
//!
//! ```ignore
//! use code_enforcer_core::Enforcer;
//!
//! let report = Enforcer::builder()
//!     .root(".")
//!     .rules(code_enforcer_rules::all_rules()?)
//!     .build()?
//!     .run()
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ascii_only;
pub mod console_calls;
pub mod no_extension_imports;
pub mod no_index_imports;
pub mod no_todo_tags;
mod registry;

pub use ascii_only::AsciiOnly;
pub use console_calls::ConsoleCalls;
pub use no_extension_imports::NoExtensionImports;
pub use no_index_imports::NoIndexImports;
pub use no_todo_tags::NoTodoTags;
pub use registry::{all_rules, builtin_registry};

/// Re-export core types for convenience.
pub use code_enforcer_core::{Diagnostic, Rule, RuleBox};
