//! Per-document line context.
//!
//! The context is the only state that crosses line boundaries: the previous
//! emitted line, whether the next line starts a new statement, and the
//! suppression state machine.
//!
//! ```text
//!             EnterSuppression(t)
//!   NORMAL ─────────────────────────▶ SUPPRESSING(t)
//!     ▲                                    │
//!     └──── line matches t, or EOF ────────┘
//! ```

use crate::rules::Terminator;

/// What a suppression region discards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionScope {
    /// A clause of a statement that continues around it (e.g. `SORTKEY`);
    /// the statement terminator is preserved when the region closes
    Clause,
    /// A whole standalone statement (e.g. `CREATE INDEX`)
    Statement
}

/// An open suppression region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub terminator: Terminator,
    pub scope:      RegionScope,
    /// 1-based line number of the line that opened the region
    pub opened_at:  usize
}

/// Suppression state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Suppressing(Region)
}

/// Per-document state threaded through every line.
#[derive(Debug, Clone)]
pub struct LineContext {
    document:        Option<String>,
    previous_line:   Option<String>,
    statement_start: bool,
    mode:            Mode,
    line_number:     usize
}

impl Default for LineContext {
    fn default() -> Self {
        Self::new(None)
    }
}

impl LineContext {
    /// Fresh context for one document.
    ///
    /// `document` is the document name without extension; it qualifies
    /// unqualified view names.
    pub fn new(document: Option<&str>) -> Self {
        Self {
            document:        document.map(str::to_string),
            previous_line:   None,
            statement_start: true,
            mode:            Mode::Normal,
            line_number:     0
        }
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// The previous line that produced SQL, after transformation.
    pub fn previous_line(&self) -> Option<&str> {
        self.previous_line.as_deref()
    }

    /// True when the previous source statement was terminated, so the
    /// current line begins a new statement.
    pub fn at_statement_start(&self) -> bool {
        self.statement_start
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_suppressing(&self) -> bool {
        matches!(self.mode, Mode::Suppressing(_))
    }

    /// 1-based number of the line being processed.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Move on to the next source line.
    pub fn advance(&mut self) {
        self.line_number += 1;
    }

    /// Open a suppression region at the current line.
    ///
    /// Lines inside a region never reach the rules, so a region cannot be
    /// opened while another one is active.
    pub fn enter_suppression(&mut self, terminator: Terminator, scope: RegionScope) {
        debug_assert!(!self.is_suppressing());
        self.mode = Mode::Suppressing(Region {
            terminator,
            scope,
            opened_at: self.line_number
        });
        self.statement_start = false;
    }

    /// Close the active region, returning it.
    pub fn close_suppression(&mut self) -> Option<Region> {
        match std::mem::take(&mut self.mode) {
            Mode::Suppressing(region) => {
                self.statement_start = true;
                Some(region)
            }
            Mode::Normal => None
        }
    }

    /// Record a finalized line that went through the rules.
    ///
    /// `source` is the code part before transformation and decides whether
    /// the statement was terminated; `emitted` is the surviving SQL, if any.
    pub fn record_line(&mut self, source: &str, emitted: Option<&str>) {
        if let Some(sql) = emitted {
            self.previous_line = Some(sql.to_string());
        }
        self.statement_start = Terminator::STATEMENT.matches(source);
    }
}
