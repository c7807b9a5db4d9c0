//! Date arithmetic rules of the repeat group.
//!
//! Each application rewrites only the leftmost eligible occurrence; the
//! translator re-runs the group until the line stops changing.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{Rewrite, Rule, RuleCategory, RuleInfo, lexical};
use crate::translator::LineContext;

/// `TRUNC(col, 'unit') - n`
static PRIOR_PERIOD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bTRUNC\(\s*(?P<col>[^,()']+(?:\([^()]*\))?)\s*,\s*(?P<unit>'[^']+')\s*\)\s*(?P<offset>[-+]\s*\d+)"
    )
    .expect("valid regex")
});

static SYSDATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSYSDATE\b(?P<call>\s*\(\s*\))?").expect("valid regex")
});

/// Rewrite the first match of `re` that starts outside literals and that
/// `f` accepts.
fn rewrite_first(
    line: &str,
    re: &Regex,
    f: impl Fn(&Captures) -> Option<String>
) -> Option<Rewrite> {
    re.captures_iter(line).find_map(|caps| {
        let found = caps.get(0)?;
        if !lexical::is_code_at(line, found.start()) {
            return None;
        }
        let replacement = f(&caps)?;
        Some(Rewrite::new(
            format!(
                "{}{}{}",
                &line[..found.start()],
                replacement,
                &line[found.end()..]
            ),
            found.as_str().trim()
        ))
    })
}

/// `TRUNC(col, 'MM') - 1` to `dateadd('MM', -1, trunc(col, 'MM'))`
pub struct PriorPeriod;

impl Rule for PriorPeriod {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DATE001",
            name:     "Truncated date offset to DATEADD",
            category: RuleCategory::Temporal
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        rewrite_first(line, &PRIOR_PERIOD_REGEX, |caps| {
            let compact: String = caps["offset"]
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            let offset: i64 = compact.parse().ok()?;
            let unit = &caps["unit"];
            Some(format!(
                "dateadd({}, {}, trunc({}, {}))",
                unit,
                offset,
                caps["col"].trim(),
                unit
            ))
        })
    }
}

/// Bare `SYSDATE` to `CURRENT_TIMESTAMP()`; `SYSDATE()` is valid Snowflake
pub struct Sysdate;

impl Rule for Sysdate {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "DATE002",
            name:     "SYSDATE to CURRENT_TIMESTAMP()",
            category: RuleCategory::Temporal
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        rewrite_first(line, &SYSDATE_REGEX, |caps| {
            caps.name("call")
                .is_none()
                .then(|| "CURRENT_TIMESTAMP()".to_string())
        })
    }
}
