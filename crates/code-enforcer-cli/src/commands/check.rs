//! Check command implementation.

use anyhow::{Context, Result};
use code_enforcer_core::Enforcer;
use code_enforcer_rules::all_rules;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use crate::config_loader;

/// Exit code when the run found diagnostics.
const EXIT_DIAGNOSTICS: u8 = 1;

/// Runs every check against the project at `root`.
///
/// Returns exit code 0 for a clean run and 1 when diagnostics were printed.
pub async fn run(root: &Path, config_file: &Path, show_solutions: bool) -> Result<ExitCode> {
    let (config, source) = config_loader::load(&root.join(config_file));
    if let Some(notice) = source.notice() {
        println!("{notice}");
    }

    let rules = all_rules().context("Failed to load built-in rules")?;

    tracing::info!("Checking {:?} with {} rules", root, rules.len());

    let report = Enforcer::builder()
        .root(root)
        .config(config)
        .rules(rules)
        .build()
        .context("Failed to build enforcer")?
        .run()
        .await
        .context("Run aborted")?;

    if report.is_clean() {
        return Ok(ExitCode::SUCCESS);
    }

    let color = std::io::stdout().is_terminal();
    print!(
        "{}",
        super::output::render(&report.diagnostics, show_solutions, color)
    );

    Ok(ExitCode::from(EXIT_DIAGNOSTICS))
}
