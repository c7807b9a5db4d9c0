//! Lexical helpers shared by the rewrite rules.
//!
//! Rules work on raw text, so they need a few quote-aware primitives: finding
//! the trailing `--` comment, mapping only the parts of a line that are not
//! inside single-quoted literals, and matching parentheses without tripping
//! over a `)` inside a string.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `[ident]` brackets around a bare identifier (not array subscripts or
/// literals).
static BRACKETED_IDENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?P<ident>[A-Za-z_][A-Za-z0-9_$#@ ]*)\]").expect("valid regex")
});

/// A backtick-quoted or `[ident]`-bracketed identifier.
static QUOTED_IDENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`[^`]*`|\[[A-Za-z_][A-Za-z0-9_$#@ ]*\]").expect("valid regex")
});

/// Returns true for lines that hold nothing but a `--` comment.
pub fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with("--")
}

/// Returns true for empty or whitespace-only lines.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Returns true when a rewritten line has no SQL left: whitespace only or a
/// single vestigial comma.
pub fn is_vestigial(code: &str) -> bool {
    let trimmed = code.trim();
    trimmed.is_empty() || trimmed == ","
}

/// Split a line into its code part and a trailing `--` comment.
///
/// Quote characters (single and double) are tracked so that `--` inside a
/// literal or a quoted identifier is not mistaken for a comment. The comment
/// part keeps its `--` prefix; whitespace before it stays with the code.
pub fn split_trailing_comment(line: &str) -> (&str, &str) {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'\'' || b == b'"' => quote = Some(b),
            None if b == b'-' && bytes.get(i + 1) == Some(&b'-') => {
                return (&line[..i], &line[i..]);
            }
            None => {}
        }
        i += 1;
    }
    (line, "")
}

/// Byte ranges of `line` that lie outside single-quoted string literals.
///
/// An unterminated literal runs to the end of the line.
pub fn code_segments(line: &str) -> Vec<(usize, usize)> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_literal = false;
    for (i, c) in line.char_indices() {
        if c != '\'' {
            continue;
        }
        if in_literal {
            start = i + 1;
        } else if i > start {
            segments.push((start, i));
        }
        in_literal = !in_literal;
    }
    if !in_literal && start < line.len() {
        segments.push((start, line.len()));
    }
    segments
}

/// Apply `f` to every segment outside single-quoted literals and stitch the
/// line back together.
pub fn map_outside_literals(line: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for (start, end) in code_segments(line) {
        out.push_str(&line[last..start]);
        out.push_str(&f(&line[start..end]));
        last = end;
    }
    out.push_str(&line[last..]);
    out
}

/// Returns true when `ch` occurs in `line` outside single-quoted literals.
pub fn contains_outside_literals(line: &str, ch: char) -> bool {
    code_segments(line)
        .into_iter()
        .any(|(start, end)| line[start..end].contains(ch))
}

/// Returns true when `re` matches somewhere outside single-quoted literals.
pub fn matches_outside_literals(line: &str, re: &Regex) -> bool {
    code_segments(line)
        .into_iter()
        .any(|(start, end)| re.is_match(&line[start..end]))
}

/// Replace every match of `re` outside literals.
///
/// Returns the rewritten line and the text of the first match, or `None` when
/// nothing matched.
pub fn replace_outside_literals(
    line: &str,
    re: &Regex,
    mut replacement: impl FnMut(&Captures) -> String
) -> Option<(String, String)> {
    rewrite_outside_literals(line, re, |caps| Some(replacement(caps)))
}

/// Like [`replace_outside_literals`], but `rewrite` may decline a match by
/// returning `None`, which leaves that match untouched. Only accepted
/// matches count.
pub fn rewrite_outside_literals(
    line: &str,
    re: &Regex,
    mut rewrite: impl FnMut(&Captures) -> Option<String>
) -> Option<(String, String)> {
    let mut first: Option<String> = None;
    let rewritten = map_outside_literals(line, |segment| {
        re.replace_all(segment, |caps: &Captures| match rewrite(caps) {
            Some(replacement) => {
                if first.is_none() {
                    first = Some(caps[0].trim().to_string());
                }
                replacement
            }
            None => caps[0].to_string()
        })
        .into_owned()
    });
    first.map(|clause| (rewritten, clause))
}

/// Returns true when byte offset `idx` lies outside single-quoted literals.
pub fn is_code_at(line: &str, idx: usize) -> bool {
    code_segments(line)
        .into_iter()
        .any(|(start, end)| (start..end).contains(&idx))
}

/// Index of the `)` matching the `(` at `open`, skipping quoted text.
pub fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

/// Split an argument list on top-level commas, skipping nested parentheses and
/// quoted text. Arguments are returned untrimmed.
pub fn split_top_level_args(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut start = 0;
    for (i, b) in args.bytes().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => {
                    parts.push(&args[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
    }
    parts.push(&args[start..]);
    parts
}

/// Remove source-dialect identifier quoting: backticks and `[ident]`
/// brackets. Single-quoted literals are left intact.
pub fn strip_identifier_quoting(line: &str) -> String {
    map_outside_literals(line, |segment| {
        let unticked = segment.replace('`', "");
        BRACKETED_IDENT_REGEX
            .replace_all(&unticked, "$ident")
            .into_owned()
    })
}

/// Quoted identifiers outside literals that [`strip_identifier_quoting`]
/// would unquote, in order.
pub fn quoted_identifiers(line: &str) -> Vec<&str> {
    code_segments(line)
        .into_iter()
        .flat_map(move |(start, end)| QUOTED_IDENT_REGEX.find_iter(&line[start..end]))
        .map(|m| m.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trailing_comment() {
        let (code, comment) = split_trailing_comment("SELECT a -- note");
        assert_eq!(code, "SELECT a ");
        assert_eq!(comment, "-- note");
    }

    #[test]
    fn test_split_ignores_dashes_in_literal() {
        let (code, comment) = split_trailing_comment("SELECT '--x' AS a");
        assert_eq!(code, "SELECT '--x' AS a");
        assert!(comment.is_empty());
    }

    #[test]
    fn test_code_segments_skip_literals() {
        let line = "a 'b' c";
        let segments: Vec<&str> = code_segments(line)
            .into_iter()
            .map(|(s, e)| &line[s..e])
            .collect();
        assert_eq!(segments, vec!["a ", " c"]);
    }

    #[test]
    fn test_code_segments_unterminated_literal() {
        let line = "x = 'abc";
        let segments: Vec<&str> = code_segments(line)
            .into_iter()
            .map(|(s, e)| &line[s..e])
            .collect();
        assert_eq!(segments, vec!["x = "]);
    }

    #[test]
    fn test_map_outside_literals() {
        let out = map_outside_literals("json 'json' json", |s| s.to_uppercase());
        assert_eq!(out, "JSON 'json' JSON");
    }

    #[test]
    fn test_matching_paren_nested() {
        let s = "f(a, g(b), ')')";
        assert_eq!(matching_paren(s, 1), Some(s.len() - 1));
    }

    #[test]
    fn test_split_top_level_args() {
        let args = split_top_level_args("a, f(b, c), 'x,y'");
        assert_eq!(args, vec!["a", " f(b, c)", " 'x,y'"]);
    }

    #[test]
    fn test_strip_identifier_quoting() {
        assert_eq!(
            strip_identifier_quoting("SELECT `id`, [name] FROM [dbo].[t]"),
            "SELECT id, name FROM dbo.t"
        );
    }

    #[test]
    fn test_strip_keeps_subscripts_and_literals() {
        assert_eq!(
            strip_identifier_quoting("SELECT arr[0], '`x`'"),
            "SELECT arr[0], '`x`'"
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(
            quoted_identifiers("SELECT `id`, [order id], arr[0], '[x]' FROM t"),
            vec!["`id`", "[order id]"]
        );
        assert!(quoted_identifiers("SELECT a FROM t").is_empty());
    }

    #[test]
    fn test_is_vestigial() {
        assert!(is_vestigial("   "));
        assert!(is_vestigial("  ,  "));
        assert!(!is_vestigial("a,"));
    }
}
