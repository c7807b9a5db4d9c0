// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use clap::Parser;
use sql_converter::cli::{Cli, Commands, Format};

#[test]
fn test_format_variants() {
    let _text = Format::Text;
    let _json = Format::Json;
    let _yaml = Format::Yaml;
}

#[test]
fn test_format_clone() {
    let format = Format::Json;
    let cloned = format;
    assert!(matches!(cloned, Format::Json));
}

#[test]
fn test_parse_convert_defaults() {
    let cli = Cli::try_parse_from(["sql-converter", "convert"]).unwrap();
    match cli.command {
        Commands::Convert {
            input_dir,
            output_dir,
            no_comments,
            extension,
            output_format,
            verbose,
            ..
        } => {
            assert!(input_dir.is_none());
            assert!(output_dir.is_none());
            assert!(extension.is_none());
            assert!(!no_comments);
            assert!(!verbose);
            assert!(matches!(output_format, Format::Text));
        }
        other => panic!("unexpected command {:?}", other)
    }
}

#[test]
fn test_parse_convert_flags() {
    let cli = Cli::try_parse_from([
        "sql-converter",
        "convert",
        "-i",
        "legacy",
        "-o",
        "converted",
        "--no-comments",
        "-f",
        "yaml",
        "-v"
    ])
    .unwrap();
    assert!(cli.command.verbose());
    match cli.command {
        Commands::Convert {
            input_dir,
            output_dir,
            no_comments,
            output_format,
            ..
        } => {
            assert_eq!(input_dir, Some(PathBuf::from("legacy")));
            assert_eq!(output_dir, Some(PathBuf::from("converted")));
            assert!(no_comments);
            assert!(matches!(output_format, Format::Yaml));
        }
        other => panic!("unexpected command {:?}", other)
    }
}

#[test]
fn test_parse_translate_stdin() {
    let cli = Cli::try_parse_from(["sql-converter", "translate", "-", "--name", "mart"]).unwrap();
    match cli.command {
        Commands::Translate {
            input,
            output,
            name,
            ..
        } => {
            assert_eq!(input, PathBuf::from("-"));
            assert!(output.is_none());
            assert_eq!(name.as_deref(), Some("mart"));
        }
        other => panic!("unexpected command {:?}", other)
    }
}

#[test]
fn test_translate_requires_input() {
    assert!(Cli::try_parse_from(["sql-converter", "translate"]).is_err());
}

#[test]
fn test_rules_is_never_verbose() {
    let cli = Cli::try_parse_from(["sql-converter", "rules", "-f", "json"]).unwrap();
    assert!(!cli.command.verbose());
}

#[test]
fn test_invalid_format_rejected() {
    assert!(Cli::try_parse_from(["sql-converter", "rules", "-f", "sarif"]).is_err());
}
