//! Helper functions for CLI operations.
//!
//! This module provides utility functions used by the command
//! implementations for reading input, merging CLI flags over the loaded
//! configuration and building the translator.

use std::{
    fs,
    io::{self, Read},
    path::Path
};

use super::{convert::convert_format, types::ConvertParams};
use crate::{
    cli::Format,
    config::Config,
    driver::BatchOptions,
    error::{AppResult, file_read_error},
    output::OutputOptions,
    rules::RuleSet,
    translator::Translator
};

/// Reads a document from a file or stdin.
///
/// # Arguments
///
/// * `path` - File path or "-" for stdin
///
/// # Returns
///
/// The raw bytes; decoding happens later so that Shift_JIS input is
/// accepted from both sources.
///
/// # Errors
///
/// Returns an error if the file cannot be read or stdin fails.
pub fn read_input(path: &Path) -> AppResult<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        Ok(buffer)
    } else {
        fs::read(path).map_err(|e| file_read_error(&path.display().to_string(), e))
    }
}

/// Creates output options from CLI parameters.
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}

/// Builds the translator from configuration.
///
/// Annotations are off when either the configuration or the `--no-comments`
/// flag suppresses them.
pub fn build_translator(config: &Config, no_comments: bool) -> Translator {
    let annotate = !(no_comments || config.convert.suppress_annotations);
    Translator::new(RuleSet::with_config(&config.rules), annotate)
}

/// Merges CLI overrides into the configured batch settings.
///
/// # Example
///
/// ```
/// use sql_converter::{
///     app::{ConvertParams, batch_options},
///     cli::Format,
///     config::Config
/// };
///
/// let params = ConvertParams {
///     input_dir:     Some("legacy".into()),
///     output_dir:    None,
///     no_comments:   false,
///     extension:     None,
///     output_format: Format::Text,
///     no_color:      true,
///     verbose:       false,
///     no_progress:   true
/// };
/// let options = batch_options(&params, &Config::default());
/// assert_eq!(options.source_root, std::path::PathBuf::from("legacy"));
/// assert_eq!(options.destination_root, std::path::PathBuf::from("snowflake-sql"));
/// ```
pub fn batch_options(params: &ConvertParams, config: &Config) -> BatchOptions {
    BatchOptions {
        source_root:      params
            .input_dir
            .clone()
            .unwrap_or_else(|| config.convert.source_root.clone()),
        destination_root: params
            .output_dir
            .clone()
            .unwrap_or_else(|| config.convert.destination_root.clone()),
        extension:        params
            .extension
            .clone()
            .unwrap_or_else(|| config.convert.extension.clone()),
        progress:         !params.no_progress
    }
}

/// Document name for a single translated file.
///
/// An explicit name wins; otherwise the input file stem is used. Stdin has
/// no name.
pub fn document_name(input: &Path, name: Option<&str>) -> Option<String> {
    if let Some(name) = name {
        return Some(name.to_string());
    }
    if input.as_os_str() == "-" {
        return None;
    }
    input.file_stem().map(|s| s.to_string_lossy().into_owned())
}
