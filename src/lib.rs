//! # SQL Converter Library
//!
//! Line-oriented rewrite engine that converts Amazon Redshift SQL (plus a few
//! Aurora/MySQL DDL idioms) into Snowflake SQL.
//!
//! Each line passes through an ordered [`rules::RuleSet`]; rules can discard
//! clauses or whole statements across several lines, and a small group of
//! rules repeats until the line reaches a fixed point. Everything a rule
//! changes or discards is recorded in a trailing `--//` annotation so that
//! converted files remain reviewable.
//!
//! ```
//! use sql_converter::translator::Translator;
//!
//! let mut out = Vec::new();
//! Translator::default()
//!     .translate("  name NVARCHAR(20),\n".as_bytes(), &mut out)
//!     .unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "  name VARCHAR(20),\t\t--// NVARCHAR\n"
//! );
//! ```
//!
//! # Modules
//!
//! - [`rules`] - Rule trait, ordered rule set and the built-in rules
//! - [`translator`] - Per-document pipeline, line context and annotations
//! - [`driver`] - Parallel conversion of a directory tree
//! - [`config`] - Configuration loading
//! - [`output`] - Summary formatting
//! - [`app`] - CLI command implementations
//! - [`error`] - Error types and constructors

pub mod app;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod output;
pub mod rules;
pub mod translator;
