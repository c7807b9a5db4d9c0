//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sql-converter.toml` in current directory
//! 4. `~/.config/sql-converter/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [convert]
//! suppress_annotations = false
//! source_root = "redshift-sql"
//! destination_root = "snowflake-sql"
//! extension = "sql"
//!
//! [rules]
//! disabled = ["EXPR005"]
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_CONVERTER_NO_COMMENTS` | `1`/`true` suppresses annotations |
//! | `SQL_CONVERTER_INPUT_DIR` | Source root |
//! | `SQL_CONVERTER_OUTPUT_DIR` | Destination root |

use std::{env, fs, path::PathBuf};

use serde::Deserialize;

use crate::error::{AppResult, config_error};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub rules:   RulesConfig
}

/// Rules configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Disabled rule IDs
    #[serde(default)]
    pub disabled: Vec<String>
}

/// Batch conversion configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Write converted SQL without `--//` annotations
    pub suppress_annotations: bool,
    pub source_root:          PathBuf,
    pub destination_root:     PathBuf,
    /// Extension of the files to convert
    pub extension:            String
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            suppress_annotations: false,
            source_root:          PathBuf::from("redshift-sql"),
            destination_root:     PathBuf::from("snowflake-sql"),
            extension:            String::from("sql")
        }
    }
}

impl Config {
    /// Parse a configuration file body
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.sql-converter.toml)
    /// 3. Config file in home directory (~/.config/sql-converter/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-converter")
                .join("config.toml");

            if home_config.exists() {
                config = Self::read(&home_config)?;
            }
        }

        // Current directory config replaces the home config
        let local_config = PathBuf::from(".sql-converter.toml");
        if local_config.exists() {
            config = Self::read(&local_config)?;
        }

        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    fn read(path: &PathBuf) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            config_error(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Override settings from environment variables, looked up with `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(value) = lookup("SQL_CONVERTER_NO_COMMENTS") {
            self.convert.suppress_annotations = parse_flag("SQL_CONVERTER_NO_COMMENTS", &value)?;
        }

        if let Some(dir) = lookup("SQL_CONVERTER_INPUT_DIR") {
            self.convert.source_root = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("SQL_CONVERTER_OUTPUT_DIR") {
            self.convert.destination_root = PathBuf::from(dir);
        }

        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(config_error(format!("{} must be a boolean, got '{}'", key, other)))
    }
}
