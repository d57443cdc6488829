//! Basename and title derivation from a URL path.

use percent_encoding::percent_decode_str;

/// Extracts the last non-empty path segment of a URL (query and fragment ignored).
///
/// The segment is returned still percent-encoded. Returns `None` if the URL
/// cannot be parsed or the path is empty/root.
pub fn basename(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    Some(segment.to_string())
}

/// Derives a display title from the URL's file name: percent-decoded
/// (invalid UTF-8 replaced) with one trailing extension removed.
pub fn title_from_url(url: &str) -> String {
    let raw = basename(url).unwrap_or_default();
    let decoded = percent_decode_str(&raw).decode_utf8_lossy();
    split_extension(&decoded).0.to_string()
}

/// Splits `name` into stem and extension (extension includes the dot).
///
/// Leading dots never start an extension, so `.profile` has none.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => name.split_at(idx),
        _ => (name, ""),
    }
}
