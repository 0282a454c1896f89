//! Helpers for sanitizing data before it enters tracing span attributes or
//! user-facing error messages.
//!
//! Traces are safe to share for debugging. These functions keep full source
//! paths and oversized remote payloads out of them.

use std::path::Path;

/// Maximum length of a remote error body kept in an error message.
pub const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Returns only the filename component of a path (no directory).
///
/// Safe for span fields: reveals the file name without exposing the full path.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Truncates a remote response body so error messages stay readable.
///
/// Cuts on a character boundary at or before [`MAX_ERROR_BODY_LENGTH`] bytes.
pub fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &body[..end])
}
