//! Command execution logic.
//!
//! Each function runs one CLI subcommand against an already loaded
//! configuration and returns what should be printed, leaving process exit
//! handling to `main`.

use std::fs;

use log::info;

use super::{
    helpers::{batch_options, build_translator, create_output_options, document_name, read_input},
    types::{CommandOutput, ConvertParams, TranslateParams}
};
use crate::{
    cli::Format,
    config::Config,
    driver::{Driver, decode},
    error::{AppResult, file_write_error},
    output::{format_batch_report, format_rule_list},
    rules::RuleSet
};

/// Executes a batch conversion.
///
/// # Returns
///
/// The formatted summary and the batch exit code: `0` when every document
/// converted, `1` when nothing matched, `2` when any document failed.
///
/// # Errors
///
/// Returns an error if the source root cannot be walked. Per-document
/// failures are part of the summary instead.
///
/// # Example
///
/// ```no_run
/// use sql_converter::{
///     app::{ConvertParams, run_convert},
///     cli::Format,
///     config::Config
/// };
///
/// let params = ConvertParams {
///     input_dir:     None,
///     output_dir:    None,
///     no_comments:   false,
///     extension:     None,
///     output_format: Format::Text,
///     no_color:      false,
///     verbose:       false,
///     no_progress:   false
/// };
/// let output = run_convert(&params, &Config::load()?)?;
/// print!("{}", output.stdout);
/// # Ok::<(), sql_converter::error::AppError>(())
/// ```
pub fn run_convert(params: &ConvertParams, config: &Config) -> AppResult<CommandOutput> {
    let translator = build_translator(config, params.no_comments);
    let driver = Driver::new(translator, batch_options(params, config));
    let report = driver.run()?;

    let opts = create_output_options(params.output_format, params.no_color, params.verbose);
    let mut stdout = format_batch_report(&report, &opts);
    if !stdout.ends_with('\n') {
        stdout.push('\n');
    }
    Ok(CommandOutput {
        exit_code: report.exit_code(),
        stdout
    })
}

/// Translates one document.
///
/// The converted SQL goes to `params.output` when given, otherwise it is
/// returned for stdout.
///
/// # Errors
///
/// Returns an error if the input cannot be read or decoded, or the output
/// cannot be written.
pub fn run_translate(params: &TranslateParams, config: &Config) -> AppResult<CommandOutput> {
    let source = params.input.display().to_string();
    let bytes = read_input(&params.input)?;
    let (text, _) = decode(&source, &bytes)?;

    let name = document_name(&params.input, params.name.as_deref());
    let translator = build_translator(config, params.no_comments);
    let mut buffer = Vec::with_capacity(text.len());
    let report = translator.translate_named(name.as_deref(), text.as_bytes(), &mut buffer)?;

    let converted = String::from_utf8_lossy(&buffer).into_owned();
    let stdout = match &params.output {
        Some(path) => {
            let target = path.display().to_string();
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).map_err(|e| file_write_error(&target, e))?;
            }
            fs::write(path, converted).map_err(|e| file_write_error(&target, e))?;
            info!("{} -> {} ({} changed lines)", source, target, report.changed_lines);
            String::new()
        }
        None => converted
    };

    Ok(CommandOutput {
        exit_code: 0,
        stdout
    })
}

/// Lists the enabled rules in application order.
pub fn run_rules(format: Format, no_color: bool, config: &Config) -> CommandOutput {
    let rules = RuleSet::with_config(&config.rules);
    let opts = create_output_options(format, no_color, false);
    let mut stdout = format_rule_list(&rules, &opts);
    if !stdout.ends_with('\n') {
        stdout.push('\n');
    }
    CommandOutput {
        exit_code: 0,
        stdout
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    fn convert_params(input: PathBuf, output: PathBuf) -> ConvertParams {
        ConvertParams {
            input_dir:     Some(input),
            output_dir:    Some(output),
            no_comments:   false,
            extension:     None,
            output_format: Format::Text,
            no_color:      true,
            verbose:       false,
            no_progress:   true
        }
    }

    #[test]
    fn test_run_convert_empty_tree() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        fs::create_dir_all(&input).unwrap();
        let output = run_convert(
            &convert_params(input, dir.path().join("out")),
            &Config::default()
        )
        .unwrap();
        assert_eq!(output.exit_code, 1);
        assert!(output.stdout.contains("No files found"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_run_translate_to_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("sales.sql");
        fs::write(&input, "SELECT SYSDATE;\n").unwrap();
        let target = dir.path().join("converted/sales.sql");

        let params = TranslateParams {
            input,
            output: Some(target.clone()),
            no_comments: true,
            name: None
        };
        let output = run_translate(&params, &Config::default()).unwrap();
        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.is_empty());
        assert_eq!(
            fs::read_to_string(target).unwrap(),
            "SELECT CURRENT_TIMESTAMP();\n"
        );
    }

    #[test]
    fn test_run_rules_json() {
        let output = run_rules(Format::Json, true, &Config::default());
        assert!(output.stdout.trim_start().starts_with('['));
        assert!(output.stdout.contains("\"DDL001\""));
    }
}
