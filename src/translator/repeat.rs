//! Fixed-point sub-pipeline.
//!
//! Rules in the repeat group rewrite one occurrence per application, so a
//! line with several occurrences needs several passes. A pass applies every
//! rule in order once; the group stops after the first pass in which no rule
//! fired, or at the pass ceiling.

use log::{trace, warn};

use super::{LineContext, annotator::Annotation};
use crate::rules::Rule;

/// Hard ceiling on passes over one line
pub const MAX_REPEAT_PASSES: usize = 256;

/// Result of running the repeat group over one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatOutcome {
    pub line:      String,
    /// Ids of the rules that fired, one entry per firing
    pub hits:      Vec<&'static str>,
    pub passes:    usize,
    /// False when the ceiling stopped the group before a fixed point
    pub converged: bool
}

/// The repeat group of a rule set.
pub struct RepeatGroup<'a> {
    rules: &'a [Box<dyn Rule>]
}

impl<'a> RepeatGroup<'a> {
    pub fn new(rules: &'a [Box<dyn Rule>]) -> Self {
        Self {
            rules
        }
    }

    /// Pass ceiling for a line: every productive pass rewrites at least one
    /// occurrence, and an occurrence spans at least one character per rule.
    pub fn max_passes(&self, line: &str) -> usize {
        if self.rules.is_empty() {
            return 0;
        }
        (line.len() / self.rules.len() + 2).min(MAX_REPEAT_PASSES)
    }

    /// Run the group until the line stops changing, appending one annotation
    /// fragment per firing.
    pub fn run(&self, line: String, ctx: &LineContext, annotation: &mut Annotation) -> RepeatOutcome {
        let limit = self.max_passes(&line);
        let mut outcome = RepeatOutcome {
            line,
            hits: Vec::new(),
            passes: 0,
            converged: true
        };
        if limit == 0 {
            return outcome;
        }
        loop {
            if outcome.passes == limit {
                outcome.converged = false;
                warn!(
                    "line {}: repeat rules still matching after {} passes",
                    ctx.line_number(),
                    limit
                );
                annotation.push(format!("repeat limit of {} passes reached", limit));
                break;
            }
            outcome.passes += 1;
            let mut fired = false;
            for rule in self.rules {
                if let Some(rewrite) = rule.apply(&outcome.line, ctx) {
                    let id = rule.info().id;
                    trace!("line {}: {} (repeat pass {})", ctx.line_number(), id, outcome.passes);
                    annotation.push(rewrite.note);
                    outcome.hits.push(id);
                    outcome.line = rewrite.line;
                    fired = true;
                }
            }
            if !fired {
                break;
            }
        }
        outcome
    }
}
