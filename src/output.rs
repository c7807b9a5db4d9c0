use colored::Colorize;
use serde::Serialize;

use crate::{
    driver::{BatchReport, DocumentStatus},
    rules::{RuleCategory, RuleSet}
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// One row of the rule listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleEntry {
    pub position: usize,
    pub id:       &'static str,
    pub name:     &'static str,
    pub category: RuleCategory,
    /// Member of the repeat group
    pub repeat:   bool
}

/// Rules of `rules` in application order, repeat group last
pub fn rule_entries(rules: &RuleSet) -> Vec<RuleEntry> {
    let main = rules.rules().iter().map(|r| (r, false));
    let repeat = rules.repeat_rules().iter().map(|r| (r, true));
    main.chain(repeat)
        .enumerate()
        .map(|(i, (rule, repeat))| {
            let info = rule.info();
            RuleEntry {
                position: i + 1,
                id: info.id,
                name: info.name,
                category: info.category,
                repeat
            }
        })
        .collect()
}

/// Format the rule listing
pub fn format_rule_list(rules: &RuleSet, opts: &OutputOptions) -> String {
    let entries = rule_entries(rules);
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(&entries).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(&entries).unwrap_or_default(),
        OutputFormat::Text => {
            let mut output = String::new();
            let header = format!("=== Conversion Rules ({}) ===\n\n", entries.len());
            if opts.colored {
                output.push_str(&header.bold().to_string());
            } else {
                output.push_str(&header);
            }
            for entry in &entries {
                let id = if opts.colored {
                    entry.id.cyan().to_string()
                } else {
                    entry.id.to_string()
                };
                let marker = if entry.repeat { " (repeat)" } else { "" };
                output.push_str(&format!(
                    "{:>3}. {:<8} [{}] {}{}\n",
                    entry.position, id, entry.category, entry.name, marker
                ));
            }
            output
        }
    }
}

/// Format a batch conversion summary
pub fn format_batch_report(report: &BatchReport, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(report).unwrap_or_default(),
        OutputFormat::Text => format_text_report(report, opts)
    }
}

fn format_text_report(report: &BatchReport, opts: &OutputOptions) -> String {
    let mut output = String::new();
    let header = "=== SQL Conversion ===\n\n";
    if opts.colored {
        output.push_str(&header.bold().to_string());
    } else {
        output.push_str(header);
    }

    if report.documents.is_empty() {
        output.push_str(&format!(
            "No files found under {}\n",
            report.source_root.display()
        ));
        return output;
    }

    for document in &report.documents {
        match &document.status {
            DocumentStatus::Converted {
                report: doc
            } => {
                let label = if opts.colored {
                    "OK".green().bold().to_string()
                } else {
                    "OK".to_string()
                };
                output.push_str(&format!(
                    "{} {} -> {}\n",
                    label,
                    document.source.display(),
                    document.destination.display()
                ));
                if opts.verbose {
                    output.push_str(&format!(
                        "     {} lines, {} changed, {} suppressed",
                        doc.lines, doc.changed_lines, doc.suppressed_lines
                    ));
                    if let Some(encoding) = document.encoding {
                        output.push_str(&format!(", {}", encoding.label()));
                    }
                    output.push('\n');
                }
                if doc.forced_closes > 0 {
                    let warning = format!(
                        "     {} suppression region(s) closed at end of document\n",
                        doc.forced_closes
                    );
                    if opts.colored {
                        output.push_str(&warning.yellow().to_string());
                    } else {
                        output.push_str(&warning);
                    }
                }
            }
            DocumentStatus::Failed {
                error
            } => {
                let label = if opts.colored {
                    "FAILED".red().bold().to_string()
                } else {
                    "FAILED".to_string()
                };
                output.push_str(&format!(
                    "{} {}: {}\n",
                    label,
                    document.source.display(),
                    error
                ));
            }
        }
    }

    if opts.verbose {
        let hits = report.rule_hits();
        if !hits.is_empty() {
            output.push_str("\nRule hits:\n");
            for (id, count) in &hits {
                output.push_str(&format!("  {:<8} {}\n", id, count));
            }
        }
    }

    let summary = format!(
        "\n{} converted, {} failed, {} total\n",
        report.converted(),
        report.failed(),
        report.documents.len()
    );
    if opts.colored {
        if report.failed() > 0 {
            output.push_str(&summary.red().to_string());
        } else {
            output.push_str(&summary.green().to_string());
        }
    } else {
        output.push_str(&summary);
    }

    output
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{driver::DocumentOutcome, translator::DocumentReport};

    fn plain() -> OutputOptions {
        OutputOptions {
            format:  OutputFormat::Text,
            colored: false,
            verbose: true
        }
    }

    #[test]
    fn test_rule_entries_order() {
        let rules = RuleSet::standard();
        let entries = rule_entries(&rules);
        assert_eq!(entries.len(), rules.len());
        assert_eq!(entries[0].position, 1);
        assert!(entries.last().is_some_and(|e| e.repeat));
        assert!(!entries[0].repeat);
    }

    #[test]
    fn test_empty_report_text() {
        let report = BatchReport {
            source_root:      PathBuf::from("redshift-sql"),
            destination_root: PathBuf::from("snowflake-sql"),
            documents:        Vec::new()
        };
        let text = format_batch_report(&report, &plain());
        assert!(text.contains("No files found under redshift-sql"));
    }

    #[test]
    fn test_report_text_lists_failures() {
        let doc = DocumentReport {
            lines: 3,
            ..DocumentReport::default()
        };
        let report = BatchReport {
            source_root:      PathBuf::from("in"),
            destination_root: PathBuf::from("out"),
            documents:        vec![
                DocumentOutcome {
                    source:      PathBuf::from("in/a.sql"),
                    destination: PathBuf::from("out/a.sql"),
                    encoding:    None,
                    status:      DocumentStatus::Converted {
                        report: doc
                    }
                },
                DocumentOutcome {
                    source:      PathBuf::from("in/b.sql"),
                    destination: PathBuf::from("out/b.sql"),
                    encoding:    None,
                    status:      DocumentStatus::Failed {
                        error: "boom".into()
                    }
                }
            ]
        };
        let text = format_batch_report(&report, &plain());
        assert!(text.contains("OK in/a.sql -> out/a.sql"));
        assert!(text.contains("3 lines, 0 changed, 0 suppressed"));
        assert!(text.contains("FAILED in/b.sql: boom"));
        assert!(text.contains("1 converted, 1 failed, 2 total"));
    }
}
