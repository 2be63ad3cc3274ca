//! Diagnostic report formatting.

use code_enforcer_core::position::{self, ResolvedLine};
use code_enforcer_core::{Diagnostic, Position};

const BLUE: &str = "\x1b[34m";
const RED: &str = "\x1b[31m";
const WHITE: &str = "\x1b[37m";
const RESET: &str = "\x1b[0m";

struct Style {
    color: bool,
}

impl Style {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Renders the full report: header, one block per diagnostic, summary line.
#[must_use]
pub fn render(diagnostics: &[Diagnostic], show_solutions: bool, color: bool) -> String {
    let style = Style { color };
    let mut out = String::from("Errors:\n");

    for diagnostic in diagnostics {
        out.push_str(&render_one(diagnostic, show_solutions, &style));
    }

    let summary = format!("Errors: {}", diagnostics.len());
    out.push_str(&style.paint(RED, &summary));
    out.push('\n');
    out
}

fn resolve(diagnostic: &Diagnostic) -> Option<ResolvedLine<'_>> {
    let content = &diagnostic.file.content;
    match diagnostic.position {
        Position::Offset(offset) => position::resolve_by_offset(content, offset),
        Position::Line { line, .. } => position::resolve_by_line(content, line),
        Position::Unknown => None,
    }
}

/// Renders one diagnostic block, terminated by a blank line.
fn render_one(diagnostic: &Diagnostic, show_solutions: bool, style: &Style) -> String {
    let resolved = resolve(diagnostic);

    let line_number = match (&resolved, diagnostic.position) {
        (Some(r), _) => style.paint(BLUE, &r.line_number.to_string()),
        (None, Position::Line { line, .. }) => style.paint(BLUE, &line.to_string()),
        (None, _) => String::new(),
    };

    let mut block = format!(
        "{}: {}: {}",
        diagnostic.file.name(),
        line_number,
        diagnostic.problem
    );
    if show_solutions && !diagnostic.solution.is_empty() {
        block.push_str(&format!(" ({})", style.paint(WHITE, &diagnostic.solution)));
    }
    block.push('\n');

    if let Some(r) = resolved {
        block.push_str(&format!("  {}\n{}\n", r.text, style.paint(RED, &r.caret)));
    }
    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use code_enforcer_core::SourceFile;

    fn diag(content: &str, position: Position) -> Diagnostic {
        Diagnostic::new(
            "no console calls",
            "use logging library",
            SourceFile::new("src/app.js", content),
            position,
        )
    }

    #[test]
    fn renders_offset_diagnostic_with_caret() {
        let d = diag("let a;\n  console.log(a);\n", Position::Offset(9));
        let out = render(&[d], false, false);
        assert_eq!(
            out,
            "Errors:\n\
             src/app.js: 2: no console calls\n\
             \x20   console.log(a);\n\
             \x20   ^\n\
             \n\
             Errors: 1\n"
        );
    }

    #[test]
    fn renders_line_diagnostic_with_bare_caret() {
        let d = diag("a\nb\nc", Position::line(3));
        let out = render(&[d], false, false);
        assert!(out.contains("src/app.js: 3: no console calls\n  c\n^\n\n"));
    }

    #[test]
    fn solutions_only_when_requested() {
        let d = diag("x", Position::Unknown);
        let without = render(&[d.clone()], false, false);
        let with = render(&[d], true, false);
        assert!(without.contains("src/app.js: : no console calls\n\n"));
        assert!(with.contains("src/app.js: : no console calls (use logging library)\n\n"));
    }

    #[test]
    fn unresolvable_line_keeps_number() {
        let d = diag("only line", Position::line(7));
        let out = render(&[d], false, false);
        assert!(out.contains("src/app.js: 7: no console calls\n\n"));
    }

    #[test]
    fn color_wraps_summary_and_caret() {
        let d = diag("console.x", Position::Offset(0));
        let out = render(&[d], false, true);
        assert!(out.contains("\x1b[31m  ^\x1b[0m"));
        assert!(out.ends_with("\x1b[31mErrors: 1\x1b[0m\n"));
        assert!(out.contains("\x1b[34m1\x1b[0m"));
    }

    #[test]
    fn blocks_follow_diagnostic_order() {
        let first = diag("console.a", Position::Offset(0));
        let second = diag("x\nconsole.b", Position::line(2));
        let out = render(&[first, second], true, false);
        assert_eq!(
            out,
            "Errors:\n\
             src/app.js: 1: no console calls (use logging library)\n\
             \x20 console.a\n\
             \x20 ^\n\
             \n\
             src/app.js: 2: no console calls (use logging library)\n\
             \x20 console.b\n\
             ^\n\
             \n\
             Errors: 2\n"
        );
    }

    #[test]
    fn empty_report_is_just_header_and_count() {
        assert_eq!(render(&[], true, false), "Errors:\nErrors: 0\n");
    }
}
