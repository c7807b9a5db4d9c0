//! Annotation collection and output line rendering.
//!
//! Every rule that fires contributes one fragment describing what it changed
//! or discarded. Fragments are joined with `" // "` and appended to the
//! output line after a fixed marker:
//!
//! ```text
//! CREATE SCHEMA s;		--// OWNER TO admin;
//! 		--// GRANT SELECT ON t TO bob;
//! ```

use std::io::{self, Write};

use smallvec::SmallVec;

/// Marker between surviving SQL and its annotation
pub const ANNOTATION_MARKER: &str = "\t\t--// ";

/// Separator between annotation fragments
pub const FRAGMENT_SEPARATOR: &str = " // ";

/// Ordered annotation fragments for one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    fragments: SmallVec<[String; 4]>
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.fragments.push(fragment);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Fragments joined with the separator
    pub fn text(&self) -> String {
        self.fragments.join(FRAGMENT_SEPARATOR)
    }

    /// Returns true when the last fragment was statement-terminated
    pub fn ends_statement(&self) -> bool {
        self.fragments
            .last()
            .is_some_and(|f| f.trim_end().ends_with(';'))
    }
}

/// One finalized line, ready to render.
#[derive(Debug, Clone, Copy)]
pub struct FinalLine<'a> {
    /// Surviving SQL, `None` when nothing is left
    pub sql:              Option<&'a str>,
    pub annotation:       &'a Annotation,
    /// The discarded content ended a statement that continues to exist, so
    /// its terminator must be written
    pub keeps_terminator: bool,
    /// Trailing `--` comment of the source line
    pub comment:          &'a str
}

/// Renders finalized lines, with or without annotations.
#[derive(Debug, Clone, Copy)]
pub struct Annotator {
    enabled: bool
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Annotator {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Render a finalized line.
    ///
    /// Format: `<sql>[;]\t\t--// <annotation>`. Returns `None` when the line
    /// has nothing left to write, which only happens with annotations
    /// disabled.
    pub fn render(&self, line: &FinalLine) -> Option<String> {
        let sql = line.sql.map(str::trim_end).unwrap_or_default();
        let mut out = String::with_capacity(sql.len() + 32);
        out.push_str(sql);
        if line.keeps_terminator && line.annotation.ends_statement() && !sql.ends_with(';') {
            out.push(';');
        }
        if self.enabled && !line.annotation.is_empty() {
            out.push_str(ANNOTATION_MARKER);
            out.push_str(&line.annotation.text());
        }
        if !line.comment.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(line.comment);
        }
        (!out.is_empty()).then_some(out)
    }

    /// Write a finalized line followed by a newline.
    ///
    /// Returns whether anything was written.
    pub fn write_line(&self, writer: &mut impl Write, line: &FinalLine) -> io::Result<bool> {
        match self.render(line) {
            Some(text) => {
                writeln!(writer, "{}", text)?;
                Ok(true)
            }
            None => Ok(false)
        }
    }
}
