//! Source text decoding.
//!
//! Documents are read as UTF-8 (a leading byte order mark is dropped). Files
//! that are not valid UTF-8 are retried as Shift_JIS, the encoding legacy
//! Redshift exports on Japanese workstations were saved in.

use std::borrow::Cow;

use encoding_rs::SHIFT_JIS;
use serde::Serialize;

use crate::error::{AppResult, decode_error};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encoding a document was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceEncoding {
    Utf8,
    Utf8Bom,
    ShiftJis
}

impl SourceEncoding {
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf8Bom => "UTF-8 (BOM)",
            Self::ShiftJis => "Shift_JIS"
        }
    }
}

/// Decode document bytes.
///
/// `path` is only used in the error message.
pub fn decode<'a>(path: &str, bytes: &'a [u8]) -> AppResult<(Cow<'a, str>, SourceEncoding)> {
    let (body, encoding) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (rest, SourceEncoding::Utf8Bom),
        None => (bytes, SourceEncoding::Utf8)
    };
    if let Ok(text) = std::str::from_utf8(body) {
        return Ok((Cow::Borrowed(text), encoding));
    }

    let (text, had_errors) = SHIFT_JIS.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(decode_error(path, SHIFT_JIS.name()));
    }
    Ok((text, SourceEncoding::ShiftJis))
}
