//! Application types for CLI commands.
//!
//! This module defines the parameter and result structures passed between
//! the CLI entry point and the command implementations.

use std::path::PathBuf;

use crate::cli::Format;

/// Parameters for the convert command.
///
/// Directory and extension fields left as `None` fall back to the loaded
/// configuration.
///
/// # Example
///
/// ```
/// use sql_converter::{app::ConvertParams, cli::Format};
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
/// ```
#[derive(Debug, Clone)]
pub struct ConvertParams {
    /// Source root overriding the configured one.
    pub input_dir:     Option<PathBuf>,
    /// Destination root overriding the configured one.
    pub output_dir:    Option<PathBuf>,
    /// Suppress `--//` annotations.
    pub no_comments:   bool,
    /// File extension overriding the configured one.
    pub extension:     Option<String>,
    /// Output format of the summary.
    pub output_format: Format,
    /// Disable colored terminal output.
    pub no_color:      bool,
    /// Include per-document counters and rule totals in the summary.
    pub verbose:       bool,
    /// Hide the progress bar.
    pub no_progress:   bool
}

/// Parameters for the translate command.
#[derive(Debug, Clone)]
pub struct TranslateParams {
    /// Path to the SQL document or "-" for stdin.
    pub input:       PathBuf,
    /// Output file; stdout when `None`.
    pub output:      Option<PathBuf>,
    /// Suppress `--//` annotations.
    pub no_comments: bool,
    /// Document name; defaults to the input file stem.
    pub name:        Option<String>
}

/// Output from CLI command execution.
///
/// `stdout` is printed as is, so it carries its own trailing newline.
///
/// # Example
///
/// ```
/// use sql_converter::app::CommandOutput;
///
/// let output = CommandOutput {
///     exit_code: 0,
///     stdout:    "SELECT 1;\n".to_string()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code for the process (0=success, 1=nothing to do, 2=failures).
    pub exit_code: i32,
    /// Text to print to stdout.
    pub stdout:    String
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_params_clone() {
        let params = ConvertParams {
            input_dir:     Some(PathBuf::from("in")),
            output_dir:    None,
            no_comments:   true,
            extension:     None,
            output_format: Format::Json,
            no_color:      false,
            verbose:       false,
            no_progress:   true
        };
        let cloned = params.clone();
        assert_eq!(cloned.input_dir, params.input_dir);
        assert!(cloned.no_comments);
    }

    #[test]
    fn test_translate_params_debug() {
        let params = TranslateParams {
            input:       PathBuf::from("-"),
            output:      None,
            no_comments: false,
            name:        Some("sales".into())
        };
        assert!(format!("{:?}", params).contains("TranslateParams"));
    }
}
