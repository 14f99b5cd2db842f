//! Filename sanitization for storage path construction.

/// Maximum length of a sanitized filename.
const MAX_NAME_LEN: usize = 255;

/// Fallback name when sanitization leaves nothing usable.
const FALLBACK_NAME: &str = "file";

/// Sanitize a client-supplied filename for use as a storage path segment.
///
/// Only alphanumerics, dot, underscore, and hyphen are retained; every run
/// of other characters collapses to a single underscore. Leading and
/// trailing dots/underscores are trimmed so the result can never be a
/// relative-path component like `..`. An empty result falls back to
/// `"file"`, and the length is capped at 255 bytes.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len().min(MAX_NAME_LEN));
    let mut last_was_sub = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            out.push(ch);
            last_was_sub = false;
        } else if !last_was_sub {
            out.push('_');
            last_was_sub = true;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut result = if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    };

    result.truncate(MAX_NAME_LEN);
    result
}
