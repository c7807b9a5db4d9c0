//! Per-document translation.
//!
//! The [`Translator`] feeds each line of a document through the pipeline:
//!
//! ```text
//!  raw line
//!     │  strip backticks / [ident] quoting
//!     ▼
//!  comment or blank? ──yes──▶ written verbatim
//!     │ no
//!     ▼
//!  suppressing? ──yes──▶ annotation-only line (closes region on terminator)
//!     │ no
//!     ▼
//!  RuleSet (in order) ──▶ repeat group ──▶ Annotator ──▶ writer
//! ```
//!
//! State crossing line boundaries lives in one [`LineContext`] per document,
//! so independent documents can be translated in parallel with a shared
//! `Translator`.
//!
//! # Example
//!
//! ```
//! use sql_converter::{rules::RuleSet, translator::Translator};
//!
//! let translator = Translator::new(RuleSet::standard(), true);
//! let mut out = Vec::new();
//! let report = translator
//!     .translate("GRANT SELECT ON t TO bob;\n".as_bytes(), &mut out)
//!     .unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "\t\t--// GRANT SELECT ON t TO bob;\n"
//! );
//! assert_eq!(report.rule_hits["DDL004"], 1);
//! ```

mod annotator;
pub mod context;
mod repeat;

use std::io::{BufRead, Write};

pub use annotator::{ANNOTATION_MARKER, Annotation, Annotator, FRAGMENT_SEPARATOR, FinalLine};
pub use context::{LineContext, Mode, Region, RegionScope};
use indexmap::IndexMap;
use log::{debug, trace, warn};
pub use repeat::{MAX_REPEAT_PASSES, RepeatGroup, RepeatOutcome};
use serde::Serialize;

use crate::{
    error::{AppResult, file_read_error, file_write_error},
    rules::{Control, RuleSet, lexical}
};

/// Counters for one translated document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// Source lines read
    pub lines:             usize,
    /// Lines whose output differs from the source line
    pub changed_lines:     usize,
    /// Lines consumed by suppression regions
    pub suppressed_lines:  usize,
    pub regions_opened:    usize,
    /// Regions closed, including forced closes at end of document
    pub regions_closed:    usize,
    /// Regions still open at end of document
    pub forced_closes:     usize,
    pub repeat_limit_hits: usize,
    /// Rule id to number of firings, in order of first hit
    pub rule_hits:         IndexMap<&'static str, usize>
}

impl DocumentReport {
    fn record_hit(&mut self, id: &'static str) {
        *self.rule_hits.entry(id).or_insert(0) += 1;
    }

    /// Total rule firings
    pub fn total_hits(&self) -> usize {
        self.rule_hits.values().sum()
    }
}

/// What one source line turned into.
struct Outcome {
    text:    Option<String>,
    changed: bool
}

/// Translates documents with an immutable rule set.
pub struct Translator {
    rules:     RuleSet,
    annotator: Annotator
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(RuleSet::standard(), true)
    }
}

impl Translator {
    pub fn new(rules: RuleSet, annotate: bool) -> Self {
        Self {
            rules,
            annotator: Annotator::new(annotate)
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn annotator(&self) -> Annotator {
        self.annotator
    }

    /// Translate one unnamed document.
    pub fn translate(&self, reader: impl BufRead, writer: impl Write) -> AppResult<DocumentReport> {
        self.translate_named(None, reader, writer)
    }

    /// Translate one document.
    ///
    /// `document` is the file stem; unqualified view names are placed in a
    /// schema of that name. I/O failures abort the document.
    pub fn translate_named(
        &self,
        document: Option<&str>,
        reader: impl BufRead,
        mut writer: impl Write
    ) -> AppResult<DocumentReport> {
        let name = document.unwrap_or("<input>");
        let mut ctx = LineContext::new(document);
        let mut report = DocumentReport::default();

        for raw in reader.lines() {
            let raw = raw.map_err(|e| file_read_error(name, e))?;
            let outcome = self.process_line(&raw, &mut ctx, &mut report);
            report.lines += 1;
            if outcome.changed {
                report.changed_lines += 1;
            }
            if let Some(text) = outcome.text {
                writeln!(writer, "{}", text).map_err(|e| file_write_error(name, e))?;
            }
        }

        if let Some(region) = ctx.close_suppression() {
            report.regions_closed += 1;
            report.forced_closes += 1;
            warn!(
                "{}: suppression opened at line {} was still open at end of document",
                name, region.opened_at
            );
            let mut annotation = Annotation::new();
            annotation.push(format!(
                "suppression opened at line {} closed at end of document",
                region.opened_at
            ));
            let line = FinalLine {
                sql:              None,
                annotation:       &annotation,
                keeps_terminator: false,
                comment:          ""
            };
            self.annotator
                .write_line(&mut writer, &line)
                .map_err(|e| file_write_error(name, e))?;
        }

        writer.flush().map_err(|e| file_write_error(name, e))?;
        debug!(
            "{}: {} lines, {} changed, {} suppressed",
            name, report.lines, report.changed_lines, report.suppressed_lines
        );
        Ok(report)
    }

    fn process_line(&self, raw: &str, ctx: &mut LineContext, report: &mut DocumentReport) -> Outcome {
        ctx.advance();
        let source = raw.trim_end();

        if lexical::is_comment_line(source) || lexical::is_blank(source) {
            return Outcome {
                changed: source != raw,
                text:    Some(source.to_string())
            };
        }

        let (source_code, comment) = lexical::split_trailing_comment(source);
        let unquoted = lexical::strip_identifier_quoting(source_code);
        let code = unquoted.as_str();

        if let Mode::Suppressing(region) = ctx.mode() {
            report.suppressed_lines += 1;
            let closes = region.terminator.matches(code);
            if closes {
                ctx.close_suppression();
                report.regions_closed += 1;
                debug!(
                    "line {}: suppression opened at line {} closed",
                    ctx.line_number(),
                    region.opened_at
                );
            }
            let mut annotation = Annotation::new();
            annotation.push(source_code.trim());
            let line = FinalLine {
                sql: None,
                annotation: &annotation,
                keeps_terminator: closes && region.scope == RegionScope::Clause,
                comment
            };
            return Outcome {
                text:    self.annotator.render(&line),
                changed: true
            };
        }

        let mut line = code.to_string();
        let mut annotation = Annotation::new();
        let quoting_removed = code != source_code;
        if quoting_removed {
            let quoted = lexical::quoted_identifiers(source_code);
            if quoted.is_empty() {
                // Stray backticks
                annotation.push(source_code.trim());
            } else {
                annotation.push(quoted.join(" "));
            }
        }
        let mut control = Control::Continue;
        let mut discards_statement = false;
        let mut fired = 0;

        for rule in self.rules.rules() {
            let Some(rewrite) = rule.apply(&line, ctx) else {
                continue;
            };
            let id = rule.info().id;
            trace!("line {}: {}", ctx.line_number(), id);
            report.record_hit(id);
            fired += 1;
            annotation.push(rewrite.note);
            line = rewrite.line;
            discards_statement |= rewrite.discards_statement;
            if rewrite.control != Control::Continue {
                control = rewrite.control;
                break;
            }
        }

        if control == Control::Continue {
            let outcome = RepeatGroup::new(self.rules.repeat_rules()).run(line, ctx, &mut annotation);
            for &id in &outcome.hits {
                report.record_hit(id);
            }
            fired += outcome.hits.len();
            if !outcome.converged {
                report.repeat_limit_hits += 1;
            }
            line = outcome.line;
        }

        let emitted = (!lexical::is_vestigial(&line)).then_some(line.as_str());
        ctx.record_line(code, emitted);

        if let Control::EnterSuppression(terminator) = control {
            let scope = if discards_statement {
                RegionScope::Statement
            } else {
                RegionScope::Clause
            };
            ctx.enter_suppression(terminator, scope);
            report.regions_opened += 1;
            debug!(
                "line {}: suppressing until '{}'",
                ctx.line_number(),
                terminator.symbol()
            );
        }

        let already_annotated = line == code && comment.starts_with(ANNOTATION_MARKER.trim());
        if !quoting_removed && (fired == 0 || already_annotated) {
            // Untouched, or already annotated by an earlier run
            return Outcome {
                changed: source != raw,
                text:    Some(source.to_string())
            };
        }

        let final_line = FinalLine {
            sql: emitted,
            annotation: &annotation,
            keeps_terminator: !discards_statement,
            comment
        };
        Outcome {
            text:    self.annotator.render(&final_line),
            changed: true
        }
    }
}
