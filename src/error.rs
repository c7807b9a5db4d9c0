pub use masterror::{AppError, AppResult};

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create file write error
pub fn file_write_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to write file '{}': {}", path, source))
}

/// Create decode error for a document that is neither UTF-8 nor the fallback
/// encoding
pub fn decode_error(path: &str, fallback: &str) -> AppError {
    AppError::bad_request(format!(
        "Failed to decode '{}': not valid UTF-8 or {}",
        path, fallback
    ))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create error for two source documents mapped onto one destination file
pub fn destination_conflict_error(destination: &str, first: &str) -> AppError {
    AppError::bad_request(format!(
        "Destination '{}' is already written by '{}'",
        destination, first
    ))
}
