//! Function name and call shape rules.
//!
//! Renames are plain substitutions. Rules that look at arguments (`AVG`,
//! `LISTAGG`, `COALESCE`, `NVL`, `JSON_EXTRACT_ARRAY_ELEMENT_TEXT`) locate the
//! call's parentheses with [`lexical::matching_paren`] and split the argument
//! list on top-level commas, so nested calls and quoted commas survive.

use std::sync::LazyLock;

use regex::Regex;

use super::{Rewrite, Rule, RuleCategory, RuleInfo, lexical, substitute};
use crate::translator::LineContext;

static DATE_ADD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDATE_ADD\b").expect("valid regex"));

static DATE_DIFF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDATE_DIFF\b").expect("valid regex"));

static PGDATE_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPGDATE_PART\b").expect("valid regex"));

static PG_CATALOG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpg_catalog\s*\.\s*").expect("valid regex"));

static CEILING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCEILING\b").expect("valid regex"));

static NOW_CALL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNOW\s*\(\s*\)").expect("valid regex"));

static NOW_LITERAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)'now'::(?:character\s+varying|varchar|text)\b").expect("valid regex")
});

static TRUNC_TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\btrunc\(\s*\((?P<ts>[^()]*(?:\([^()]*\))?[^()]*)\)::timestamp(?:\s+with(?:out)?\s+time\s+zone)?\s*\)"
    )
    .expect("valid regex")
});

static SIMILAR_TO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<expr>[\w.]+(?:\([^()]*\))?)\s+(?P<neg>NOT\s+)?SIMILAR\s+TO\s+'(?P<pat>[^']*)'"
    )
    .expect("valid regex")
});

static JST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)'JST'").expect("valid regex"));

static AVG_CALL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAVG\s*\(").expect("valid regex"));

/// User functions that already truncate their averages
static AI_VI_CALL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bf_(?:ai|vi)\s*\(").expect("valid regex"));

static TRUNC_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTRUNC\s*\(\s*$").expect("valid regex"));

static OVER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*OVER\b").expect("valid regex"));

static LISTAGG_CALL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLISTAGG\s*\(").expect("valid regex"));

static DISTINCT_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*DISTINCT\s+").expect("valid regex"));

static WITHIN_GROUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*WITHIN\s+GROUP\s*\(").expect("valid regex"));

static COALESCE_CALL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCOALESCE\s*\(").expect("valid regex"));

static NVL_CALL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNVL\s*\(").expect("valid regex"));

static ORDER_BY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bORDER\s+BY\b").expect("valid regex"));

static UNKNOWN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bUNKNOWN\b").expect("valid regex"));

static JSON_ARRAY_ELEMENT_CALL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bJSON_EXTRACT_ARRAY_ELEMENT_TEXT\s*\(").expect("valid regex")
});

/// A function call located in a line.
struct Call<'a> {
    line:  &'a str,
    start: usize,
    open:  usize,
    close: usize
}

impl<'a> Call<'a> {
    fn text(&self) -> &'a str {
        &self.line[self.start..=self.close]
    }

    fn args(&self) -> &'a str {
        &self.line[self.open + 1..self.close]
    }

    fn before(&self) -> &'a str {
        &self.line[..self.start]
    }

    fn after(&self) -> &'a str {
        &self.line[self.close + 1..]
    }
}

/// Rewrite every call matched by `call_re` (which must end at the opening
/// parenthesis) outside literals.
///
/// Calls are visited right to left, so nested calls are rewritten before the
/// calls that enclose them. `f` returns the replacement text and the end of
/// the replaced range, or `None` to leave the call alone.
fn rewrite_calls(
    line: &str,
    call_re: &Regex,
    mut f: impl FnMut(&Call) -> Option<(String, usize)>
) -> Option<Rewrite> {
    let starts: Vec<(usize, usize)> = call_re
        .find_iter(line)
        .filter(|m| lexical::is_code_at(line, m.start()))
        .map(|m| (m.start(), m.end() - 1))
        .collect();
    let mut current = line.to_string();
    let mut note = None;
    for (start, open) in starts.into_iter().rev() {
        let Some(close) = lexical::matching_paren(&current, open) else {
            continue;
        };
        let call = Call {
            line: &current,
            start,
            open,
            close
        };
        if let Some((replacement, end)) = f(&call) {
            note = Some(call.text().trim().to_string());
            current.replace_range(start..end, &replacement);
        }
    }
    note.map(|note| Rewrite::new(current, note))
}

pub struct DateAdd;

impl Rule for DateAdd {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC001",
            name:     "DATE_ADD to DATEADD",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &DATE_ADD_REGEX, "DATEADD")
    }
}

pub struct DateDiff;

impl Rule for DateDiff {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC002",
            name:     "DATE_DIFF to DATEDIFF",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &DATE_DIFF_REGEX, "DATEDIFF")
    }
}

pub struct PgDatePart;

impl Rule for PgDatePart {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC003",
            name:     "PGDATE_PART to DATE_PART",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &PGDATE_PART_REGEX, "DATE_PART")
    }
}

pub struct PgCatalog;

impl Rule for PgCatalog {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC004",
            name:     "pg_catalog qualifier dropped",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &PG_CATALOG_REGEX, "")
    }
}

pub struct Ceiling;

impl Rule for Ceiling {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC005",
            name:     "CEILING to CEIL",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &CEILING_REGEX, "CEIL")
    }
}

pub struct Now;

impl Rule for Now {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC006",
            name:     "NOW() to CURRENT_TIMESTAMP()",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &NOW_CALL_REGEX, "CURRENT_TIMESTAMP()")
    }
}

/// Redshift's `'now'` text default, as printed by pg_dump
pub struct NowLiteral;

impl Rule for NowLiteral {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC007",
            name:     "'now' literal to CURRENT_TIMESTAMP",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let found = NOW_LITERAL_REGEX.find(line)?;
        Some(Rewrite::new(
            NOW_LITERAL_REGEX
                .replace_all(line, "CURRENT_TIMESTAMP")
                .into_owned(),
            found.as_str()
        ))
    }
}

pub struct TruncTimestamp;

impl Rule for TruncTimestamp {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC008",
            name:     "trunc(timestamp) to DATE_TRUNC('DAY', ...)",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        lexical::rewrite_outside_literals(line, &TRUNC_TIMESTAMP_REGEX, |caps| {
            Some(format!("DATE_TRUNC('DAY', {})", caps["ts"].trim()))
        })
        .map(|(rewritten, clause)| Rewrite::new(rewritten, clause))
    }
}

/// `x [NOT] SIMILAR TO 'pat'` to `[NOT ]REGEXP_LIKE(x, 'regex')`
pub struct SimilarTo;

impl SimilarTo {
    /// SQL pattern to POSIX regex, as a Snowflake string literal body
    fn to_regex(pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() + 8);
        for c in pattern.chars() {
            match c {
                '%' => out.push_str(".*"),
                '_' => out.push('.'),
                '.' => out.push_str("\\\\."),
                other => out.push(other)
            }
        }
        out
    }
}

impl Rule for SimilarTo {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC009",
            name:     "SIMILAR TO to REGEXP_LIKE",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let mut note = None;
        let rewritten = SIMILAR_TO_REGEX.replace_all(line, |caps: &regex::Captures| {
            let whole = &caps[0];
            let start = caps.get(0).map_or(0, |m| m.start());
            if !lexical::is_code_at(line, start) {
                return whole.to_string();
            }
            if note.is_none() {
                note = Some(whole.trim().to_string());
            }
            let negation = if caps.name("neg").is_some() { "NOT " } else { "" };
            format!(
                "{}REGEXP_LIKE({}, '{}')",
                negation,
                &caps["expr"],
                Self::to_regex(&caps["pat"])
            )
        });
        let rewritten = rewritten.into_owned();
        note.map(|note| Rewrite::new(rewritten, note))
    }
}

/// Snowflake does not know the `JST` zone abbreviation
pub struct JstTimezone;

impl Rule for JstTimezone {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC010",
            name:     "'JST' time zone to 'Japan'",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let found = JST_REGEX.find(line)?;
        Some(Rewrite::new(
            JST_REGEX.replace_all(line, "'Japan'").into_owned(),
            found.as_str()
        ))
    }
}

/// Redshift truncates `AVG` over integers; Snowflake returns a fraction
pub struct AvgTrunc;

impl Rule for AvgTrunc {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC011",
            name:     "AVG wrapped in TRUNC",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        if lexical::matches_outside_literals(line, &AI_VI_CALL_REGEX) {
            return None;
        }
        rewrite_calls(line, &AVG_CALL_REGEX, |call| {
            if TRUNC_OPEN_REGEX.is_match(call.before()) || OVER_REGEX.is_match(call.after()) {
                return None;
            }
            Some((format!("TRUNC({})", call.text()), call.close + 1))
        })
    }
}

/// Snowflake has `LISTAGG(DISTINCT ...)` but orders it differently; the
/// `f_list_distinct` UDF removes duplicates after aggregation
pub struct ListaggDistinct;

impl Rule for ListaggDistinct {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC012",
            name:     "LISTAGG(DISTINCT) to f_list_distinct",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let mut unordered = None;
        let rewrite = rewrite_calls(line, &LISTAGG_CALL_REGEX, |call| {
            let distinct = DISTINCT_PREFIX_REGEX.find(call.args())?;
            let args = &call.args()[distinct.end()..];
            let Some(group) = WITHIN_GROUP_REGEX.find(call.after()) else {
                unordered.get_or_insert_with(|| call.text().trim().to_string());
                return None;
            };
            let group_open = call.close + group.end();
            let group_close = lexical::matching_paren(call.line, group_open)?;
            let separator = lexical::split_top_level_args(args)
                .get(1)
                .map_or("''", |sep| sep.trim())
                .to_string();
            Some((
                format!(
                    "f_list_distinct(LISTAGG({}) WITHIN GROUP {}, {})",
                    args.trim(),
                    &call.line[group_open..=group_close],
                    separator
                ),
                group_close + 1
            ))
        });
        rewrite.or_else(|| {
            unordered.map(|call| {
                Rewrite::new(line, format!("WARNING: {call} without WITHIN GROUP left as is"))
            })
        })
    }
}

/// Snowflake requires at least two `COALESCE` arguments
pub struct Coalesce;

impl Rule for Coalesce {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC013",
            name:     "single-argument COALESCE padded with null",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        rewrite_calls(line, &COALESCE_CALL_REGEX, pad_single_argument)
    }
}

pub struct Nvl;

impl Rule for Nvl {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC014",
            name:     "single-argument NVL padded with null",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        if lexical::matches_outside_literals(line, &ORDER_BY_REGEX)
            || lexical::matches_outside_literals(line, &UNKNOWN_REGEX)
        {
            return None;
        }
        rewrite_calls(line, &NVL_CALL_REGEX, pad_single_argument)
    }
}

fn pad_single_argument(call: &Call) -> Option<(String, usize)> {
    let args = lexical::split_top_level_args(call.args());
    if args.len() != 1 || args[0].trim().is_empty() {
        return None;
    }
    Some((
        format!("{}, null)", &call.line[call.start..call.close]),
        call.close + 1
    ))
}

pub struct JsonArrayElement;

impl Rule for JsonArrayElement {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "FUNC015",
            name:     "JSON_EXTRACT_ARRAY_ELEMENT_TEXT to PARSE_JSON subscript",
            category: RuleCategory::Function
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        rewrite_calls(line, &JSON_ARRAY_ELEMENT_CALL_REGEX, |call| {
            let args = lexical::split_top_level_args(call.args());
            let [json, index, ..] = args.as_slice() else {
                return None;
            };
            Some((
                format!("PARSE_JSON({})[{}]", json.trim(), index.trim()),
                call.close + 1
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(rule: &dyn Rule, line: &str) -> Option<String> {
        rule.apply(line, &LineContext::default()).map(|rw| rw.line)
    }

    #[test]
    fn test_renames() {
        assert_eq!(
            apply(&DateAdd, "SELECT DATE_ADD('day', 1, d), date_add('day', 2, d)").as_deref(),
            Some("SELECT DATEADD('day', 1, d), DATEADD('day', 2, d)")
        );
        assert_eq!(
            apply(&DateDiff, "  DATE_DIFF('day', a, b)").as_deref(),
            Some("  DATEDIFF('day', a, b)")
        );
        assert_eq!(
            apply(&PgDatePart, "pgdate_part('year', d)").as_deref(),
            Some("DATE_PART('year', d)")
        );
        assert_eq!(
            apply(&PgCatalog, "SELECT pg_catalog.lower(a)").as_deref(),
            Some("SELECT lower(a)")
        );
        assert_eq!(apply(&Ceiling, "CEILING(x)").as_deref(), Some("CEIL(x)"));
        assert!(apply(&Ceiling, "CEIL(x)").is_none());
    }

    #[test]
    fn test_now() {
        assert_eq!(
            apply(&Now, "SELECT now() AS t").as_deref(),
            Some("SELECT CURRENT_TIMESTAMP() AS t")
        );
        assert!(apply(&Now, "SELECT 'now()'").is_none());
        assert!(apply(&Now, "SELECT known").is_none());
    }

    #[test]
    fn test_now_literal() {
        assert_eq!(
            apply(&NowLiteral, "  ts TIMESTAMP DEFAULT ('now'::character varying)::timestamp")
                .as_deref(),
            Some("  ts TIMESTAMP DEFAULT (CURRENT_TIMESTAMP)::timestamp")
        );
    }

    #[test]
    fn test_trunc_timestamp() {
        assert_eq!(
            apply(
                &TruncTimestamp,
                "  d DATE DEFAULT trunc((CURRENT_TIMESTAMP)::timestamp without time zone),"
            )
            .as_deref(),
            Some("  d DATE DEFAULT DATE_TRUNC('DAY', CURRENT_TIMESTAMP),")
        );
    }

    #[test]
    fn test_similar_to() {
        assert_eq!(
            apply(&SimilarTo, "WHERE code SIMILAR TO 'A_%.csv'").as_deref(),
            Some("WHERE REGEXP_LIKE(code, 'A..*\\\\.csv')")
        );
        assert_eq!(
            apply(&SimilarTo, "AND lower(x) NOT SIMILAR TO '%abc%'").as_deref(),
            Some("AND NOT REGEXP_LIKE(lower(x), '.*abc.*')")
        );
    }

    #[test]
    fn test_jst() {
        assert_eq!(
            apply(&JstTimezone, "CONVERT_TIMEZONE('JST', ts)").as_deref(),
            Some("CONVERT_TIMEZONE('Japan', ts)")
        );
    }

    #[test]
    fn test_avg_trunc() {
        assert_eq!(
            apply(&AvgTrunc, "SELECT AVG(score) AS s,").as_deref(),
            Some("SELECT TRUNC(AVG(score)) AS s,")
        );
        assert!(apply(&AvgTrunc, "SELECT TRUNC(AVG(score)) AS s,").is_none());
        assert!(apply(&AvgTrunc, "SELECT AVG(x) OVER (PARTITION BY g)").is_none());
        assert!(apply(&AvgTrunc, "SELECT f_ai(a), AVG(x)").is_none());
    }

    #[test]
    fn test_listagg_distinct() {
        assert_eq!(
            apply(
                &ListaggDistinct,
                "  LISTAGG(DISTINCT name, '/') WITHIN GROUP (ORDER BY id DESC) AS names"
            )
            .as_deref(),
            Some(
                "  f_list_distinct(LISTAGG(name, '/') WITHIN GROUP (ORDER BY id DESC), '/') AS names"
            )
        );
    }

    #[test]
    fn test_listagg_distinct_without_group_is_warning() {
        let line = "  LISTAGG(DISTINCT name, '/') AS names";
        let rw = ListaggDistinct.apply(line, &LineContext::default()).unwrap();
        assert_eq!(rw.line, line);
        assert!(rw.note.starts_with("WARNING"));
    }

    #[test]
    fn test_coalesce() {
        assert_eq!(
            apply(&Coalesce, "SELECT COALESCE(a) AS x").as_deref(),
            Some("SELECT COALESCE(a, null) AS x")
        );
        assert!(apply(&Coalesce, "SELECT COALESCE(a, 0)").is_none());
        assert_eq!(
            apply(&Coalesce, "COALESCE(COALESCE(f(a, b)))").as_deref(),
            Some("COALESCE(COALESCE(f(a, b), null), null)")
        );
    }

    #[test]
    fn test_nvl() {
        assert_eq!(
            apply(&Nvl, "SELECT NVL(a) AS x").as_deref(),
            Some("SELECT NVL(a, null) AS x")
        );
        assert!(apply(&Nvl, "ORDER BY NVL(a)").is_none());
        assert!(apply(&Nvl, "WHERE NVL(a) IS UNKNOWN").is_none());
    }

    #[test]
    fn test_json_array_element() {
        assert_eq!(
            apply(&JsonArrayElement, "SELECT json_extract_array_element_text(tags, 0) AS t").as_deref(),
            Some("SELECT PARSE_JSON(tags)[0] AS t")
        );
        assert!(apply(&JsonArrayElement, "SELECT json_extract_array_element_text(tags)").is_none());
    }
}
