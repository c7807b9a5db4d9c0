//! Application logic for the SQL Converter CLI.
//!
//! This module contains the command implementations separated from the main
//! entry point to enable testing.

mod commands;
mod convert;
mod helpers;
mod types;

pub use commands::{run_convert, run_rules, run_translate};
pub use convert::convert_format;
pub use helpers::{
    batch_options, build_translator, create_output_options, document_name, read_input
};
pub use types::{CommandOutput, ConvertParams, TranslateParams};

use crate::{cli::Commands, config::Config, error::AppResult};

/// Runs a parsed CLI command.
///
/// # Errors
///
/// Returns an error when the command cannot run at all; see the individual
/// commands.
pub fn run_command(command: Commands, config: &Config) -> AppResult<CommandOutput> {
    match command {
        Commands::Convert {
            input_dir,
            output_dir,
            no_comments,
            extension,
            output_format,
            no_color,
            verbose,
            no_progress
        } => {
            let params = ConvertParams {
                input_dir,
                output_dir,
                no_comments,
                extension,
                output_format,
                no_color,
                verbose,
                no_progress
            };
            run_convert(&params, config)
        }
        Commands::Translate {
            input,
            output,
            no_comments,
            name,
            ..
        } => {
            let params = TranslateParams {
                input,
                output,
                no_comments,
                name
            };
            run_translate(&params, config)
        }
        Commands::Rules {
            output_format,
            no_color
        } => Ok(run_rules(output_format, no_color, config))
    }
}
