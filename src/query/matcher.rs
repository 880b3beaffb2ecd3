use crate::types::{Filter, MatchResult, RenderLine};

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte span of the first case-insensitive occurrence of `needle`.
///
/// Characters are compared one to one, so the returned span always lies on
/// char boundaries of `haystack` and covers exactly `needle.chars().count()`
/// characters.
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return Some((0, 0));
    }

    'outer: for (start, _) in haystack.char_indices() {
        let mut rest = haystack[start..].char_indices();
        let mut end = start;
        for n in needle.chars() {
            match rest.next() {
                Some((offset, h)) if chars_eq_ignore_case(h, n) => {
                    end = start + offset + h.len_utf8();
                }
                _ => continue 'outer,
            }
        }
        return Some((start, end));
    }
    None
}

/// Case-insensitive substring test
pub fn contains_keyword(line: &str, keyword: &str) -> bool {
    find_case_insensitive(line, keyword).is_some()
}

/// Find the first filter, in registry order, whose keyword occurs in `line`.
///
/// With `restrict_to`, only a filter whose keyword equals it (ignoring case)
/// is eligible. A line holding several keywords is attributed to the
/// earliest registered one, wherever the keywords sit in the text.
pub fn find_match(line: &str, filters: &[Filter], restrict_to: Option<&str>) -> Option<MatchResult> {
    filters
        .iter()
        .filter(|f| restrict_to.map_or(true, |r| f.is_keyword(r)))
        .find_map(|f| {
            find_case_insensitive(line, &f.keyword).map(|(match_start, match_end)| MatchResult {
                filter: f.clone(),
                match_start,
                match_end,
            })
        })
}

/// Split `line` around a match span into `(prefix, matched, suffix)`.
/// Returns None if the span is out of range or not on char boundaries.
pub fn highlight_split(line: &str, match_start: usize, match_end: usize) -> Option<(&str, &str, &str)> {
    if match_start > match_end {
        return None;
    }
    Some((
        line.get(..match_start)?,
        line.get(match_start..match_end)?,
        line.get(match_end..)?,
    ))
}

/// Build a highlighted render line for a span, falling back to plain text
/// when the span does not fit the line.
pub fn highlight(line: &str, match_start: usize, match_end: usize) -> RenderLine {
    match highlight_split(line, match_start, match_end) {
        Some((prefix, matched, suffix)) => RenderLine::Highlight {
            prefix: prefix.to_string(),
            matched: matched.to_string(),
            suffix: suffix.to_string(),
        },
        None => RenderLine::plain(line),
    }
}

/// Highlight the first occurrence of `keyword`, if any.
pub fn highlight_keyword(line: &str, keyword: &str) -> Option<RenderLine> {
    find_case_insensitive(line, keyword).map(|(start, end)| highlight(line, start, end))
}
