//! Operator, statement shape and identifier rules.

use std::sync::LazyLock;

use regex::Regex;

use super::{Rewrite, Rule, RuleCategory, RuleInfo, lexical, substitute};
use crate::translator::LineContext;

static DELETE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<lead>\s*DELETE)\s+(?P<next>[^\s;]+)").expect("valid regex")
});

static UNBOUNDED_FRAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*\bROWS\s+BETWEEN\s+UNBOUNDED\s+PRECEDING\s+AND\s+UNBOUNDED\s+FOLLOWING\b(?P<close>\s*\))?"
    )
    .expect("valid regex")
});

static ORDER_BY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bORDER\s+BY\b").expect("valid regex"));

static ARRAY_LITERAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bARRAY\s*\[").expect("valid regex"));

static NVL_WITH_PLUS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNVL\(.*\+.*\)").expect("valid regex"));

/// Either a `{{ template }}` placeholder or a dotted identifier chain.
static QUALIFIED_IDENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<template>\{\{.*?\}\})|(?P<ident>\b[A-Za-z_][A-Za-z0-9_$]*(?:\.[A-Za-z_][A-Za-z0-9_$]*)+\b)"
    )
    .expect("valid regex")
});

fn near_order_by(line: &str, ctx: &LineContext) -> bool {
    lexical::matches_outside_literals(line, &ORDER_BY_REGEX)
        || ctx
            .previous_line()
            .is_some_and(|prev| lexical::matches_outside_literals(prev, &ORDER_BY_REGEX))
}

/// `DELETE t WHERE ...` to `DELETE FROM t WHERE ...`
pub struct DeleteFrom;

impl Rule for DeleteFrom {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "EXPR001",
            name:     "DELETE without FROM",
            category: RuleCategory::Expression
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        let caps = DELETE_REGEX.captures(line)?;
        if caps["next"].eq_ignore_ascii_case("FROM") {
            return None;
        }
        let lead = caps.name("lead")?;
        Some(Rewrite::new(
            format!("{} FROM{}", lead.as_str(), &line[lead.end()..]),
            lead.as_str().trim()
        ))
    }
}

/// A full-partition frame is the default without `ORDER BY`; with one it
/// changes the result and must stay
pub struct UnboundedWindowFrame;

impl Rule for UnboundedWindowFrame {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "EXPR002",
            name:     "Unbounded window frame dropped",
            category: RuleCategory::Expression
        }
    }

    fn apply(&self, line: &str, ctx: &LineContext) -> Option<Rewrite> {
        if near_order_by(line, ctx) {
            return None;
        }
        lexical::replace_outside_literals(line, &UNBOUNDED_FRAME_REGEX, |caps| {
            if caps.name("close").is_some() {
                ")".to_string()
            } else {
                String::new()
            }
        })
        .map(|(rewritten, clause)| Rewrite::new(rewritten, clause))
    }
}

pub struct ArrayLiteral;

impl Rule for ArrayLiteral {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "EXPR003",
            name:     "ARRAY[...] to [...]",
            category: RuleCategory::Expression
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        substitute(line, &ARRAY_LITERAL_REGEX, "[")
    }
}

/// String concatenation with `+` to `||`
///
/// A `+` with a numeric literal on either side is arithmetic and stays. Lines
/// with a `+` inside a quoted string or inside an `NVL(...)` call are left
/// alone entirely.
pub struct StringConcat;

impl StringConcat {
    /// Operand token adjacent to an operator, without grouping parentheses.
    fn operand(text: &str, before: bool) -> &str {
        let is_token = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.';
        if before {
            let text = text.trim_end().trim_end_matches(')').trim_end();
            let start = text
                .char_indices()
                .rev()
                .take_while(|&(_, c)| is_token(c))
                .last()
                .map_or(text.len(), |(i, _)| i);
            &text[start..]
        } else {
            let text = text.trim_start().trim_start_matches('(').trim_start();
            let end = text
                .char_indices()
                .find(|&(_, c)| !is_token(c))
                .map_or(text.len(), |(i, _)| i);
            &text[..end]
        }
    }

    fn is_numeric(token: &str) -> bool {
        !token.is_empty() && token.parse::<f64>().is_ok()
    }
}

impl Rule for StringConcat {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "EXPR004",
            name:     "+ concatenation to ||",
            category: RuleCategory::Expression
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        if !lexical::contains_outside_literals(line, '+') {
            return None;
        }
        let quoted_plus = line.contains('+')
            && line
                .char_indices()
                .any(|(i, c)| c == '+' && !lexical::is_code_at(line, i));
        if quoted_plus || lexical::matches_outside_literals(line, &NVL_WITH_PLUS_REGEX) {
            return None;
        }

        let mut out = String::with_capacity(line.len() + 8);
        let mut last = 0;
        let mut converted = false;
        for (i, _) in line.match_indices('+') {
            let before = &line[..i];
            let after = &line[i + 1..];
            if Self::is_numeric(Self::operand(before, true))
                || Self::is_numeric(Self::operand(after, false))
            {
                continue;
            }
            out.push_str(before[last..].trim_end());
            out.push_str(" || ");
            last = i + 1 + (after.len() - after.trim_start().len());
            converted = true;
        }
        if !converted {
            return None;
        }
        out.push_str(&line[last..]);
        Some(Rewrite::new(out, "+"))
    }
}

/// Schema-qualified identifiers are upper-cased to match Snowflake's
/// unquoted identifier resolution
pub struct QualifiedIdentifierCase;

impl Rule for QualifiedIdentifierCase {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "EXPR005",
            name:     "Qualified identifiers upper-cased",
            category: RuleCategory::Expression
        }
    }

    fn apply(&self, line: &str, ctx: &LineContext) -> Option<Rewrite> {
        if near_order_by(line, ctx) {
            return None;
        }
        lexical::rewrite_outside_literals(line, &QUALIFIED_IDENT_REGEX, |caps| {
            let ident = caps.name("ident")?.as_str();
            ident
                .chars()
                .any(|c| c.is_ascii_lowercase())
                .then(|| ident.to_ascii_uppercase())
        })
        .map(|(rewritten, clause)| Rewrite::new(rewritten, clause))
    }
}

/// A comma left alone on its line once the clause after it was removed
pub struct DanglingComma;

impl Rule for DanglingComma {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "EXPR006",
            name:     "Dangling comma dropped",
            category: RuleCategory::Expression
        }
    }

    fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
        if line.trim() != "," {
            return None;
        }
        let indent = &line[..line.len() - line.trim_start().len()];
        Some(Rewrite::new(indent, ","))
    }
}
