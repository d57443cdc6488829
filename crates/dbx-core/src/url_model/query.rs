//! Query-string rewriting.

use anyhow::{Context, Result};
use url::Url;

/// Sets or overwrites query parameters on `url`.
///
/// Existing parameters keep their position; an updated key keeps its first
/// position and loses any duplicates. Keys not present yet are appended in
/// the order given.
pub fn update_url_query(url: &str, updates: &[(&str, &str)]) -> Result<String> {
    let mut parsed = Url::parse(url).with_context(|| format!("invalid URL: {url}"))?;

    let mut pairs: Vec<(String, String)> = Vec::new();
    for (k, v) in parsed.query_pairs() {
        if pairs.iter().any(|(seen, _)| *seen == k) && updates.iter().any(|(u, _)| *u == k) {
            continue;
        }
        let value = updates
            .iter()
            .find(|(u, _)| *u == k)
            .map(|(_, nv)| nv.to_string())
            .unwrap_or_else(|| v.into_owned());
        pairs.push((k.into_owned(), value));
    }
    for (k, v) in updates {
        if !pairs.iter().any(|(seen, _)| seen == k) {
            pairs.push((k.to_string(), v.to_string()));
        }
    }

    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(parsed.into())
}
