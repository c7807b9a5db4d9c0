//! Rewrite rule engine for Redshift-to-Snowflake conversion.
//!
//! A rule is a single pattern-and-rewrite unit over one line of SQL. Rules
//! are collected into a [`RuleSet`], an explicit ordered list: later rules
//! see the output of earlier rules on the same line, so the order is part of
//! the contract. Reordering two rules can change the output for a line both
//! of them match.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │    Line     │────▶│   RuleSet    │────▶│ Repeat group │────▶ output
//! └─────────────┘     │  (in order)  │     │ (fixed point)│
//!                     └──────────────┘     └──────────────┘
//! ```
//!
//! # Rule Categories
//!
//! - **DDL** (`DDL001`-`DDL020`) - Redshift/MySQL table clauses
//! - **DataType** (`TYPE001`-`TYPE014`) - Column type names
//! - **Function** (`FUNC001`-`FUNC015`) - Function names and call shapes
//! - **Expression** (`EXPR001`-`EXPR006`) - Operators, statements, identifiers
//! - **Temporal** (`DATE001`-`DATE002`) - Repeated date arithmetic rewrites
//!
//! # Configuration
//!
//! Rules can be disabled by id via [`RulesConfig`]:
//!
//! ```toml
//! [rules]
//! disabled = ["EXPR005"]
//! ```
//!
//! # Implementing Custom Rules
//!
//! ```
//! use sql_converter::{
//!     rules::{Rewrite, Rule, RuleCategory, RuleInfo},
//!     translator::LineContext
//! };
//!
//! pub struct GetdateRule;
//!
//! impl Rule for GetdateRule {
//!     fn info(&self) -> RuleInfo {
//!         RuleInfo {
//!             id:       "CUSTOM001",
//!             name:     "GETDATE() to CURRENT_TIMESTAMP()",
//!             category: RuleCategory::Function
//!         }
//!     }
//!
//!     fn apply(&self, line: &str, _ctx: &LineContext) -> Option<Rewrite> {
//!         line.contains("GETDATE()").then(|| {
//!             Rewrite::new(line.replace("GETDATE()", "CURRENT_TIMESTAMP()"), "GETDATE()")
//!         })
//!     }
//! }
//! ```

mod datatype;
mod ddl;
mod expression;
mod function;
pub mod lexical;
mod temporal;
mod types;

use regex::{Captures, Regex};
pub use types::{Control, Rewrite, RuleCategory, RuleInfo, Terminator};

use crate::{config::RulesConfig, translator::LineContext};

/// Trait for implementing line rewrite rules.
///
/// Rules are pure with respect to `(line, context)`: they inspect the current
/// line and return a [`Rewrite`] when they match. They must be `Send + Sync`
/// so one rule set can serve documents converted in parallel.
///
/// A rule applied to its own output must not match again, except for rules
/// in the repeat group, which are re-run until the line stops changing.
pub trait Rule: Send + Sync {
    /// Returns metadata about this rule.
    fn info(&self) -> RuleInfo;

    /// Tests the rule against a line.
    ///
    /// # Arguments
    ///
    /// * `line` - Code part of the current, possibly already rewritten, line
    /// * `ctx` - Per-document line context
    ///
    /// # Returns
    ///
    /// `None` when the rule does not match.
    fn apply(&self, line: &str, ctx: &LineContext) -> Option<Rewrite>;
}

/// Explicit ordered rule set.
///
/// # Example
///
/// ```
/// use sql_converter::{config::RulesConfig, rules::RuleSet};
///
/// let config = RulesConfig {
///     disabled: vec!["EXPR005".into()]
/// };
///
/// let rules = RuleSet::with_config(&config);
/// assert!(!rules.ids().contains(&"EXPR005"));
/// assert_eq!(rules.ids()[0], "TYPE001");
/// ```
pub struct RuleSet {
    rules:  Vec<Box<dyn Rule>>,
    repeat: Vec<Box<dyn Rule>>
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSet {
    /// Full Redshift-to-Snowflake rule set
    pub fn standard() -> Self {
        Self::with_config(&RulesConfig::default())
    }

    /// Rule set without the rules disabled in `config`
    ///
    /// # Notes
    ///
    /// - Order below is the translation contract; tests pin the pairs that
    ///   depend on it
    /// - Repeat group rules run after all single-pass rules
    pub fn with_config(config: &RulesConfig) -> Self {
        let all_rules: Vec<Box<dyn Rule>> = vec![
            Box::new(datatype::CharLengthUnit),
            Box::new(ddl::DefaultSysdate),
            Box::new(datatype::Nvarchar),
            Box::new(datatype::Nchar),
            Box::new(function::DateAdd),
            Box::new(function::DateDiff),
            Box::new(function::PgDatePart),
            Box::new(function::PgCatalog),
            Box::new(function::Ceiling),
            Box::new(function::Now),
            Box::new(expression::DeleteFrom),
            Box::new(expression::UnboundedWindowFrame),
            Box::new(ddl::AlterTable),
            Box::new(ddl::OwnerTo),
            Box::new(ddl::Grant),
            Box::new(datatype::FloatN),
            Box::new(ddl::CreateTable),
            Box::new(ddl::Distkey),
            Box::new(ddl::SortkeyBlock),
            Box::new(ddl::Sortkey),
            Box::new(ddl::Charset),
            Box::new(ddl::AutoIncrement),
            Box::new(datatype::Unsigned),
            Box::new(ddl::DefaultZero),
            Box::new(ddl::DefaultZeroDate),
            Box::new(ddl::DefaultZeroTimestamp),
            Box::new(ddl::BinaryDefault),
            Box::new(datatype::DecimalPrecision),
            Box::new(datatype::FloatDoubleScale),
            Box::new(datatype::LongText),
            Box::new(ddl::SessionSet),
            Box::new(ddl::Encode),
            Box::new(ddl::Diststyle),
            Box::new(function::NowLiteral),
            Box::new(datatype::Bpchar),
            Box::new(datatype::CharacterVarying),
            Box::new(ddl::Identity),
            Box::new(function::TruncTimestamp),
            Box::new(datatype::IntDisplayWidth),
            Box::new(datatype::Integer),
            Box::new(datatype::NumericScale),
            Box::new(expression::ArrayLiteral),
            Box::new(expression::StringConcat),
            Box::new(ddl::ViewSchema),
            Box::new(expression::QualifiedIdentifierCase),
            Box::new(function::SimilarTo),
            Box::new(function::JstTimezone),
            Box::new(function::AvgTrunc),
            Box::new(function::ListaggDistinct),
            Box::new(ddl::CreateIndex),
            Box::new(function::Coalesce),
            Box::new(function::Nvl),
            Box::new(function::JsonArrayElement),
            Box::new(datatype::Json),
            Box::new(expression::DanglingComma)
        ];
        let repeat: Vec<Box<dyn Rule>> = vec![
            Box::new(temporal::PriorPeriod),
            Box::new(temporal::Sysdate)
        ];
        let enabled = |rule: &Box<dyn Rule>| {
            !config
                .disabled
                .iter()
                .any(|d| d.eq_ignore_ascii_case(rule.info().id))
        };
        Self {
            rules:  all_rules.into_iter().filter(enabled).collect(),
            repeat: repeat.into_iter().filter(enabled).collect()
        }
    }

    /// Single-pass rules in application order
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Rules re-applied until the line reaches a fixed point
    pub fn repeat_rules(&self) -> &[Box<dyn Rule>] {
        &self.repeat
    }

    /// Ids of all enabled rules, single-pass first, in application order
    pub fn ids(&self) -> Vec<&'static str> {
        self.rules
            .iter()
            .chain(self.repeat.iter())
            .map(|r| r.info().id)
            .collect()
    }

    /// Number of enabled rules
    pub fn len(&self) -> usize {
        self.rules.len() + self.repeat.len()
    }

    /// Returns true when every rule is disabled
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Replace every match of `re` outside literals with the `replacement`
/// template (`$name` expands captures), noting the first match.
fn substitute(line: &str, re: &Regex, replacement: &str) -> Option<Rewrite> {
    lexical::replace_outside_literals(line, re, |caps| {
        let mut expanded = String::new();
        caps.expand(replacement, &mut expanded);
        expanded
    })
    .map(|(rewritten, clause)| Rewrite::new(rewritten, clause))
}

/// Discard the `clause` capture of a standalone statement, keeping `pre`.
///
/// A statement that does not end on this line suppresses the following lines
/// up to its terminator.
fn discard_statement(caps: &Captures) -> Rewrite {
    let clause = &caps["clause"];
    let rewrite = Rewrite::new(&caps["pre"], clause.trim()).discarding_statement();
    if Terminator::STATEMENT.matches(clause) {
        rewrite.terminate()
    } else {
        rewrite.suppress(Terminator::STATEMENT)
    }
}
