//! Resolves offsets and line numbers back into displayable source context.

/// A source line resolved for display, with its caret marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine<'a> {
    /// Line number (1-indexed).
    pub line_number: usize,
    /// Text of the line, without its terminator.
    pub text: &'a str,
    /// Marker line pointing at the reported column.
    pub caret: String,
}

/// Indent added to offset carets so they line up under the reporter's
/// two-space source prefix.
const CARET_INDENT: usize = 2;

/// Iterates `(start_offset, text)` for every line of `content`.
///
/// Line text excludes the `\n` terminator and a preceding `\r`. A trailing
/// newline does not start an extra empty line.
fn lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content.split_inclusive('\n').scan(0, |start, raw| {
        let line_start = *start;
        *start += raw.len();
        let text = raw.strip_suffix('\n').unwrap_or(raw);
        let text = text.strip_suffix('\r').unwrap_or(text);
        Some((line_start, text))
    })
}

/// Resolves a byte `offset` to the line that contains it.
///
/// The caret is indented by the number of characters between the line start
/// and `offset`, plus two. Returns `None` when `offset` lies past the end of
/// `content`.
#[must_use]
pub fn resolve_by_offset(content: &str, offset: usize) -> Option<ResolvedLine<'_>> {
    if offset > content.len() {
        return None;
    }

    let (line_number, (start, text)) = lines(content)
        .enumerate()
        .take_while(|(_, (start, _))| *start <= offset)
        .last()?;

    let column = content
        .get(start..offset)
        .map_or(offset - start, |prefix| prefix.chars().count());

    Some(ResolvedLine {
        line_number: line_number + 1,
        text,
        caret: format!("{}^", " ".repeat(column + CARET_INDENT)),
    })
}

/// Resolves a 1-indexed line `number` to its text with a bare caret.
///
/// Returns `None` for line `0` or a line past the end of `content`.
#[must_use]
pub fn resolve_by_line(content: &str, number: usize) -> Option<ResolvedLine<'_>> {
    let (_, text) = lines(content).nth(number.checked_sub(1)?)?;
    Some(ResolvedLine {
        line_number: number,
        text,
        caret: "^".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "first\nsecond line\r\n\nlast";

    #[test]
    fn offset_in_first_line() {
        let r = resolve_by_offset(SAMPLE, 2).unwrap();
        assert_eq!(r.line_number, 1);
        assert_eq!(r.text, "first");
        assert_eq!(r.caret, "    ^");
    }

    #[test]
    fn offset_at_line_start() {
        let r = resolve_by_offset(SAMPLE, 6).unwrap();
        assert_eq!(r.line_number, 2);
        assert_eq!(r.text, "second line");
        assert_eq!(r.caret, "  ^");
    }

    #[test]
    fn offset_on_terminator_belongs_to_its_line() {
        let r = resolve_by_offset(SAMPLE, 5).unwrap();
        assert_eq!(r.line_number, 1);
    }

    #[test]
    fn offset_on_empty_line() {
        let r = resolve_by_offset(SAMPLE, 19).unwrap();
        assert_eq!(r.line_number, 3);
        assert_eq!(r.text, "");
    }

    #[test]
    fn offset_past_end_is_none() {
        assert!(resolve_by_offset(SAMPLE, SAMPLE.len() + 1).is_none());
        assert!(resolve_by_offset("", 0).is_none());
    }

    #[test]
    fn caret_counts_characters_not_bytes() {
        let content = "const s = 'héllo';";
        let offset = content.find("llo").unwrap();
        let r = resolve_by_offset(content, offset).unwrap();
        assert_eq!(r.caret.len() - 1, "const s = 'hé".chars().count() + 2);
    }

    #[test]
    fn every_offset_maps_to_its_enclosing_line() {
        for (offset, _) in SAMPLE.char_indices() {
            let r = resolve_by_offset(SAMPLE, offset).unwrap();
            assert!(r.line_number >= 1);
            let expected = SAMPLE.lines().nth(r.line_number - 1).unwrap();
            assert_eq!(r.text, expected.trim_end_matches('\r'));
        }
    }

    #[test]
    fn line_lookup_matches_split() {
        for (i, expected) in SAMPLE.lines().enumerate() {
            let r = resolve_by_line(SAMPLE, i + 1).unwrap();
            assert_eq!(r.text, expected);
            assert_eq!(r.caret, "^");
        }
    }

    #[test]
    fn line_out_of_range_is_none() {
        assert!(resolve_by_line(SAMPLE, 0).is_none());
        assert!(resolve_by_line(SAMPLE, 5).is_none());
    }
}
