//! Type definitions for the rewrite rule system.
//!
//! - [`RuleCategory`] - Rule families (DDL, data types, functions, ...)
//! - [`RuleInfo`] - Rule identification and metadata
//! - [`Rewrite`] - The result of a rule firing on a line
//! - [`Control`] - What the pipeline does after a rule fired
//! - [`Terminator`] - Pattern that ends a suppression region

use serde::Serialize;

use super::lexical::contains_outside_literals;

/// Category of a rule for grouping and listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleCategory {
    /// Table/statement level DDL clauses
    Ddl,
    /// Column data type names
    DataType,
    /// Function names and call shapes
    Function,
    /// Operators, statement shapes and identifiers
    Expression,
    /// Date arithmetic, re-applied until the line stops changing
    Temporal
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ddl => write!(f, "DDL"),
            Self::DataType => write!(f, "DataType"),
            Self::Function => write!(f, "Function"),
            Self::Expression => write!(f, "Expression"),
            Self::Temporal => write!(f, "Temporal")
        }
    }
}

/// Metadata about a rule for identification and configuration.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    /// Unique rule identifier (e.g., "DDL005")
    pub id:       &'static str,
    /// Human-readable rule name
    pub name:     &'static str,
    /// Rule category
    pub category: RuleCategory
}

/// Character that closes a suppression region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminator(char);

impl Terminator {
    /// End of statement (`;`).
    pub const STATEMENT: Self = Self(';');

    /// The terminator character.
    pub fn symbol(&self) -> char {
        self.0
    }

    /// Returns true when `code` contains the terminator outside literals.
    pub fn matches(&self, code: &str) -> bool {
        contains_outside_literals(code, self.0)
    }
}

/// What the pipeline does after a rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep testing subsequent rules
    Continue,
    /// Skip the remaining rules and finalize the line
    TerminateLine,
    /// Finalize the line and divert following lines into annotations until
    /// the terminator is seen
    EnterSuppression(Terminator)
}

/// Result of a rule that matched a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The rewritten line
    pub line:               String,
    /// Explanation fragment for the annotation
    pub note:               String,
    /// Pipeline control signal
    pub control:            Control,
    /// The discarded content was a whole standalone statement
    pub discards_statement: bool
}

impl Rewrite {
    /// Rewrite with an explanation of what was changed or discarded.
    pub fn new(line: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            line:               line.into(),
            note:               note.into(),
            control:            Control::Continue,
            discards_statement: false
        }
    }

    /// Skip the remaining rules for this line.
    #[must_use]
    pub fn terminate(mut self) -> Self {
        self.control = Control::TerminateLine;
        self
    }

    /// Suppress following lines until `terminator`.
    #[must_use]
    pub fn suppress(mut self, terminator: Terminator) -> Self {
        self.control = Control::EnterSuppression(terminator);
        self
    }

    /// Mark the discarded content as a standalone statement.
    #[must_use]
    pub fn discarding_statement(mut self) -> Self {
        self.discards_statement = true;
        self
    }
}
