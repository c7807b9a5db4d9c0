use std::path::PathBuf;

use sql_converter::config::{Config, ConvertConfig, RulesConfig};

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(!config.convert.suppress_annotations);
    assert!(config.rules.disabled.is_empty());
}

#[test]
fn test_default_convert_config() {
    let config = ConvertConfig::default();

    assert_eq!(config.source_root, PathBuf::from("redshift-sql"));
    assert_eq!(config.destination_root, PathBuf::from("snowflake-sql"));
    assert_eq!(config.extension, "sql");
}

#[test]
fn test_rules_config_with_disabled() {
    let config = RulesConfig {
        disabled: vec!["EXPR005".to_string(), "TYPE012".to_string()]
    };

    assert_eq!(config.disabled.len(), 2);
    assert!(config.disabled.contains(&"EXPR005".to_string()));
}

#[test]
fn test_full_config_file() {
    let config = Config::from_toml(
        r#"
[convert]
suppress_annotations = true
source_root = "legacy/redshift"
destination_root = "out"
extension = "ddl"

[rules]
disabled = ["EXPR005"]
"#
    )
    .unwrap();

    assert!(config.convert.suppress_annotations);
    assert_eq!(config.convert.source_root, PathBuf::from("legacy/redshift"));
    assert_eq!(config.convert.destination_root, PathBuf::from("out"));
    assert_eq!(config.convert.extension, "ddl");
    assert_eq!(config.rules.disabled, vec!["EXPR005".to_string()]);
}

#[test]
fn test_empty_config_file() {
    assert_eq!(Config::from_toml("").unwrap(), Config::default());
}

#[test]
fn test_invalid_config_file() {
    assert!(Config::from_toml("[convert\nsource_root = 1").is_err());
    assert!(Config::from_toml("[convert]\nsuppress_annotations = \"yes\"").is_err());
}

#[test]
fn test_env_overrides_file() {
    let mut config = Config::from_toml("[convert]\nsource_root = \"from-file\"\n").unwrap();
    config
        .apply_env(|key| match key {
            "SQL_CONVERTER_INPUT_DIR" => Some("from-env".to_string()),
            "SQL_CONVERTER_NO_COMMENTS" => Some("0".to_string()),
            _ => None
        })
        .unwrap();

    assert_eq!(config.convert.source_root, PathBuf::from("from-env"));
    assert!(!config.convert.suppress_annotations);
    assert_eq!(config.convert.destination_root, PathBuf::from("snowflake-sql"));
}

#[test]
fn test_env_without_variables_keeps_config() {
    let mut config = Config::default();
    config.apply_env(|_| None).unwrap();
    assert_eq!(config, Config::default());
}
