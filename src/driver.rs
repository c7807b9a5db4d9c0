//! Batch conversion of a directory tree.
//!
//! The driver finds every file with the configured extension under the source
//! root, maps it into the destination root and translates the documents in
//! parallel with [`rayon`]. Each worker owns its own line context; the
//! [`Translator`] and its rule set are shared read-only.
//!
//! Destination layout keeps one level of directory structure:
//!
//! ```text
//! redshift-sql/a.sql            -> snowflake-sql/a.sql
//! redshift-sql/sales/b.sql      -> snowflake-sql/sales/b.sql
//! redshift-sql/x/sales/c.sql    -> snowflake-sql/sales/c.sql
//! ```
//!
//! A document whose destination is already claimed by an earlier document
//! fails instead of overwriting it. Failures are per document; the batch
//! always runs to the end.

mod decode;

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf}
};

pub use decode::{SourceEncoding, decode};
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::{
    error::{AppResult, destination_conflict_error, file_read_error, file_write_error},
    translator::{DocumentReport, Translator}
};

/// Batch conversion settings.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub source_root:      PathBuf,
    pub destination_root: PathBuf,
    /// File extension to convert, without the dot
    pub extension:        String,
    pub progress:         bool
}

/// Final state of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    Converted { report: DocumentReport },
    Failed { error: String }
}

/// One source document and what happened to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentOutcome {
    pub source:      PathBuf,
    pub destination: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding:    Option<SourceEncoding>,
    pub status:      DocumentStatus
}

impl DocumentOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self.status, DocumentStatus::Converted { .. })
    }

    pub fn report(&self) -> Option<&DocumentReport> {
        match &self.status {
            DocumentStatus::Converted { report } => Some(report),
            DocumentStatus::Failed { .. } => None
        }
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub source_root:      PathBuf,
    pub destination_root: PathBuf,
    pub documents:        Vec<DocumentOutcome>
}

impl BatchReport {
    pub fn converted(&self) -> usize {
        self.documents.iter().filter(|d| d.is_converted()).count()
    }

    pub fn failed(&self) -> usize {
        self.documents.len() - self.converted()
    }

    /// Rule firings summed over converted documents, in order of first hit
    pub fn rule_hits(&self) -> IndexMap<&'static str, usize> {
        let mut hits = IndexMap::new();
        for report in self.documents.iter().filter_map(DocumentOutcome::report) {
            for (&id, &count) in &report.rule_hits {
                *hits.entry(id).or_insert(0) += count;
            }
        }
        hits
    }

    /// Process exit code
    ///
    /// - `0` - every document converted
    /// - `1` - nothing to convert
    /// - `2` - at least one document failed
    pub fn exit_code(&self) -> i32 {
        if self.documents.is_empty() {
            1
        } else if self.failed() > 0 {
            2
        } else {
            0
        }
    }
}

/// A source file paired with its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Job {
    source:      PathBuf,
    destination: PathBuf,
    /// Earlier source already writing to `destination`
    claimed_by:  Option<PathBuf>
}

/// Converts every matching document of a source tree.
pub struct Driver {
    translator: Translator,
    options:    BatchOptions
}

impl Driver {
    pub fn new(translator: Translator, options: BatchOptions) -> Self {
        Self {
            translator,
            options
        }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Matching files under the source root, sorted by path.
    ///
    /// Extensions compare case-insensitively. A missing source root is an
    /// error.
    pub fn discover(&self) -> AppResult<Vec<PathBuf>> {
        let root = &self.options.source_root;
        let extension = self.options.extension.trim_start_matches('.');
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| file_read_error(&root.display().to_string(), e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if let Some(ext) = path.extension()
                && ext.to_string_lossy().eq_ignore_ascii_case(extension)
            {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        debug!("found {} .{} files under {}", files.len(), extension, root.display());
        Ok(files)
    }

    /// Convert the whole tree.
    ///
    /// Only discovery failures are returned as errors; document failures are
    /// recorded in the report.
    pub fn run(&self) -> AppResult<BatchReport> {
        let files = self.discover()?;
        let mut report = BatchReport {
            source_root:      self.options.source_root.clone(),
            destination_root: self.options.destination_root.clone(),
            documents:        Vec::new()
        };

        if files.is_empty() {
            warn!(
                "no .{} files found under {}",
                self.options.extension.trim_start_matches('.'),
                self.options.source_root.display()
            );
            return Ok(report);
        }

        let jobs = self.plan(files);
        let progress = self.progress_bar(jobs.len() as u64);

        report.documents = jobs
            .par_iter()
            .map(|job| {
                let outcome = self.convert(job);
                progress.inc(1);
                outcome
            })
            .collect();

        progress.finish_and_clear();
        info!(
            "converted {} of {} documents into {}",
            report.converted(),
            report.documents.len(),
            self.options.destination_root.display()
        );
        Ok(report)
    }

    fn plan(&self, files: Vec<PathBuf>) -> Vec<Job> {
        let mut claims: HashMap<PathBuf, PathBuf> = HashMap::new();
        files
            .into_iter()
            .map(|source| {
                let destination = destination_for(
                    &self.options.source_root,
                    &self.options.destination_root,
                    &source
                );
                let claimed_by = match claims.get(&destination) {
                    Some(first) => Some(first.clone()),
                    None => {
                        claims.insert(destination.clone(), source.clone());
                        None
                    }
                };
                Job {
                    source,
                    destination,
                    claimed_by
                }
            })
            .collect()
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.options.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message("Converting...");
        pb
    }

    fn convert(&self, job: &Job) -> DocumentOutcome {
        let mut encoding = None;
        let result = match &job.claimed_by {
            Some(first) => Err(destination_conflict_error(
                &job.destination.display().to_string(),
                &first.display().to_string()
            )),
            None => self.convert_document(job, &mut encoding)
        };

        let status = match result {
            Ok(report) => {
                info!(
                    "{} -> {} ({} lines, {} changed)",
                    job.source.display(),
                    job.destination.display(),
                    report.lines,
                    report.changed_lines
                );
                DocumentStatus::Converted {
                    report
                }
            }
            Err(e) => {
                error!("{}: {}", job.source.display(), e);
                DocumentStatus::Failed {
                    error: e.to_string()
                }
            }
        };
        DocumentOutcome {
            source: job.source.clone(),
            destination: job.destination.clone(),
            encoding,
            status
        }
    }

    fn convert_document(
        &self,
        job: &Job,
        encoding: &mut Option<SourceEncoding>
    ) -> AppResult<DocumentReport> {
        let source = job.source.display().to_string();
        let destination = job.destination.display().to_string();

        let bytes = fs::read(&job.source).map_err(|e| file_read_error(&source, e))?;
        let (text, detected) = decode(&source, &bytes)?;
        *encoding = Some(detected);
        if detected == SourceEncoding::ShiftJis {
            debug!("{}: decoded as {}", source, detected.label());
        }

        let name = job.source.file_stem().map(|s| s.to_string_lossy());
        let mut buffer = Vec::with_capacity(text.len() + text.len() / 4);
        let report = self
            .translator
            .translate_named(name.as_deref(), text.as_bytes(), &mut buffer)?;

        if let Some(parent) = job.destination.parent() {
            fs::create_dir_all(parent).map_err(|e| file_write_error(&destination, e))?;
        }
        fs::write(&job.destination, buffer).map_err(|e| file_write_error(&destination, e))?;
        Ok(report)
    }
}

/// Destination of `source` under `destination_root`.
///
/// Files directly in the source root keep their name; deeper files keep their
/// immediate parent directory name.
pub fn destination_for(source_root: &Path, destination_root: &Path, source: &Path) -> PathBuf {
    let file_name = source.file_name().unwrap_or(source.as_os_str());
    let relative = source.strip_prefix(source_root).unwrap_or(source);
    match relative.parent().and_then(Path::file_name) {
        Some(parent) => destination_root.join(parent).join(file_name),
        None => destination_root.join(file_name)
    }
}
