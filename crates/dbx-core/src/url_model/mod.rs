//! URL helpers: file-name derivation and query rewriting.

mod path;
mod query;

pub use path::{basename, split_extension, title_from_url};
pub use query::update_url_query;

/// Lower-cased extension (without the dot) of the URL's file name, if any.
///
/// # Examples
///
/// - `extension_from_url("https://www.dropbox.com/s/x/Clip.MP4?dl=0")` → `Some("mp4")`
/// - `extension_from_url("https://www.dropbox.com/s/x")` → `None`
pub fn extension_from_url(url: &str) -> Option<String> {
    let name = basename(url)?;
    let (_, ext) = split_extension(&name);
    let ext = ext.trim_start_matches('.');
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
