//! Canonical JSON text for buffers.
//!
//! Decoding joins buffer lines with `\n`; encoding produces two-space
//! indented JSON without a trailing newline, split back into lines. Object
//! keys come out in sorted order, so the same value always renders to the
//! same text.

use serde_json::Value;

use crate::error::{Error, Result};

/// Parse the lines of a buffer as one JSON document.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the joined text is not valid JSON.
pub fn decode_lines<S: AsRef<str>>(lines: &[S]) -> Result<Value> {
    let text = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    serde_json::from_str(&text).map_err(Error::Decode)
}

/// Render `value` as indented JSON text.
///
/// Non-ASCII characters and HTML-significant characters such as `<`, `>`
/// and `&` are written as-is.
///
/// # Errors
///
/// Returns [`Error::Encode`] if serialization fails.
pub fn encode(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Error::Encode)
}

/// Render `value` as the lines to write into a buffer.
///
/// # Errors
///
/// Returns [`Error::Encode`] if serialization fails.
pub fn encode_lines(value: &Value) -> Result<Vec<String>> {
    Ok(encode(value)?.split('\n').map(ToOwned::to_owned).collect())
}
