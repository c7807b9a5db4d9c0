//! # SQL Converter
//!
//! Rewrites Amazon Redshift SQL into Snowflake SQL.
//!
//! `sql-converter` walks a tree of `.sql` files, rewrites every line through
//! an ordered set of pattern rules and writes the result into a mirror tree.
//! Everything a rule changes or discards is kept in a trailing `--//`
//! annotation, so the converted files can be reviewed against the source.
//!
//! # Quick Start
//!
//! ```bash
//! # Convert ./redshift-sql into ./snowflake-sql
//! sql-converter convert
//!
//! # Custom roots, no annotations, JSON summary
//! sql-converter convert -i legacy -o converted --no-comments -f json
//!
//! # One document through stdin
//! cat view.sql | sql-converter translate - --name mart
//!
//! # Show the rules in application order
//! sql-converter rules
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`SQL_CONVERTER_NO_COMMENTS`,
//!    `SQL_CONVERTER_INPUT_DIR`, `SQL_CONVERTER_OUTPUT_DIR`)
//! 3. `.sql-converter.toml` in current directory
//! 4. `~/.config/sql-converter/config.toml`
//!
//! ## Example Configuration
//!
//! ```toml
//! [convert]
//! suppress_annotations = false
//! source_root = "redshift-sql"
//! destination_root = "snowflake-sql"
//!
//! [rules]
//! # Disable specific rules by ID
//! disabled = ["EXPR005"]
//! ```
//!
//! # Logging
//!
//! Diagnostics go to stderr through `env_logger`. `RUST_LOG` selects the
//! level; `-v` raises the default from `warn` to `debug`.
//!
//! # Exit Codes
//!
//! - `0` - Every document converted
//! - `1` - No files matched
//! - `2` - At least one document failed, or the command could not run

use std::process;

use clap::Parser;
use sql_converter::{app::run_command, cli::Cli, config::Config, error::AppResult};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.command.verbose());

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();
}

fn run(cli: Cli) -> AppResult<i32> {
    let config = Config::load()?;
    let output = run_command(cli.command, &config)?;
    print!("{}", output.stdout);
    Ok(output.exit_code)
}
