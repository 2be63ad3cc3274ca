//! Rule to forbid work-tracking tags in comments.
//!
//! # Rationale
//!
//! `TODO` and `FIXME` comments outlive the intent behind them. Open work
//! belongs in the issue tracker.
//!
//! # Detection
//!
//! Comments are found with a plain pattern (`/* ... */` blocks and `//` line
//! comments, skipping `://` so URLs are not mistaken for comments). Inside
//! each comment, every configured tag is searched case-insensitively with an
//! optional leading `@`. Each hit is reported at the comment's start offset
//! plus the tag's offset inside the comment.
//!
//! Tag patterns are compiled once per distinct `todoTags` list and reused for
//! every file checked with it.

use code_enforcer_core::{scanner, Config, Diagnostic, DiagnosticSink, Position, Rule, SourceFile};
use regex::Regex;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Rule name for no-todo-tags.
pub const NAME: &str = "no-todo-tags";

const COMMENT_PATTERN: &str = r"/\*[\s\S]*?\*/|([^\\:]|^)//.*$";

/// Compiled tag patterns together with the tag list they were built from.
#[derive(Debug)]
struct TagPatterns {
    tags: Vec<String>,
    patterns: Vec<Regex>,
}

/// Flags configured tags (`todoTags`) inside comments.
#[derive(Debug)]
pub struct NoTodoTags {
    comments: Regex,
    cache: Mutex<Option<Arc<TagPatterns>>>,
}

impl NoTodoTags {
    /// Creates a new rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            comments: scanner::compile(COMMENT_PATTERN)?,
            cache: Mutex::new(None),
        })
    }

    /// Returns the compiled patterns for `tags`, compiling them only when the
    /// list differs from the cached one.
    fn tag_patterns(&self, tags: &[String]) -> Arc<TagPatterns> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.as_ref().filter(|c| c.tags == tags) {
            return Arc::clone(cached);
        }

        debug!("Compiling todo tags {:?}", tags);
        let compiled = Arc::new(TagPatterns {
            tags: tags.to_vec(),
            patterns: Self::compile_tags(tags),
        });
        *cache = Some(Arc::clone(&compiled));
        compiled
    }

    fn compile_tags(tags: &[String]) -> Vec<Regex> {
        tags.iter()
            .filter_map(|tag| {
                let pattern = format!("@?{}.*$", regex::escape(tag));
                match scanner::compile_case_insensitive(&pattern) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!("Skipping todo tag {:?}: {}", tag, e);
                        None
                    }
                }
            })
            .collect()
    }
}

impl Rule for NoTodoTags {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids TODO-style tags in comments"
    }

    fn filename_pattern(&self) -> &'static str {
        r".*\.js"
    }

    fn check(&self, file: &SourceFile, config: &Config, sink: &mut DiagnosticSink) {
        if config.todo_tags.is_empty() {
            return;
        }

        let tags = self.tag_patterns(&config.todo_tags);
        let problem = format!("don't use {} tags", config.todo_tags.join(","));

        for comment in self.comments.find_iter(&file.content) {
            for tag in &tags.patterns {
                for offset in scanner::scan(comment.as_str(), tag) {
                    sink.push(
                        Diagnostic::new(
                            problem.clone(),
                            "create tickets in your tracker",
                            file.clone(),
                            Position::Offset(comment.start() + offset),
                        )
                        .with_source(NAME),
                    );
                }
            }
        }
    }
}
