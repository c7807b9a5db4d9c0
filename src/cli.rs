use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// SQL Converter - Rewrite Redshift SQL into Snowflake SQL
#[derive(Parser, Debug)]
#[command(name = "sql-converter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every SQL file under a directory tree
    Convert {
        /// Source root (default from config: redshift-sql)
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        /// Destination root (default from config: snowflake-sql)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Write converted SQL without --// annotations
        #[arg(long)]
        no_comments: bool,

        /// Extension of the files to convert
        #[arg(short, long)]
        extension: Option<String>,

        /// Output format of the summary
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Enable debug logging and per-rule totals
        #[arg(short, long)]
        verbose: bool,

        /// Do not show the progress bar
        #[arg(long)]
        no_progress: bool
    },

    /// Convert a single document (use - for stdin)
    Translate {
        /// Path to SQL file (use - for stdin)
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write converted SQL without --// annotations
        #[arg(long)]
        no_comments: bool,

        /// Document name used as schema for unqualified views
        #[arg(short, long)]
        name: Option<String>,

        /// Enable debug logging
        #[arg(short, long)]
        verbose: bool
    },

    /// List the conversion rules in application order
    Rules {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

impl Commands {
    pub fn verbose(&self) -> bool {
        match self {
            Self::Convert {
                verbose, ..
            }
            | Self::Translate {
                verbose, ..
            } => *verbose,
            Self::Rules {
                ..
            } => false
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
