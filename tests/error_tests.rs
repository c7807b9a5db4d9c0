// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_converter::error::{
    config_error, decode_error, destination_conflict_error, file_read_error, file_write_error
};

#[test]
fn test_file_read_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = file_read_error("/path/to/file.sql", io_error);
    let _msg = error.to_string();
}

#[test]
fn test_file_write_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error = file_write_error("/out/file.sql", io_error);
    let _msg = error.to_string();
}

#[test]
fn test_decode_error() {
    let error = decode_error("legacy.sql", "Shift_JIS");
    let _msg = error.to_string();
}

#[test]
fn test_config_error() {
    let error = config_error("Invalid configuration value");
    let _msg = error.to_string();
}

#[test]
fn test_destination_conflict_error() {
    let error = destination_conflict_error("out/sales/t.sql", "in/a/sales/t.sql");
    let _msg = error.to_string();
}

#[test]
fn test_error_debug() {
    let error = config_error("bad");
    assert!(!format!("{:?}", error).is_empty());
}
