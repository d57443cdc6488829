//! Share-link recognition and the identity derived from it.

use regex::Regex;
use std::sync::OnceLock;

use crate::url_model::title_from_url;

/// URL shapes served by this extractor: `/s/`, `/sh/`, `/scl/fi/`, `/e/scl/fi/`.
pub const VALID_URL: &str = r"^https?://(?:www\.)?dropbox\.com/(?:(?:e/)?scl/fi|sh?)/(?P<id>\w+)";

fn valid_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VALID_URL).expect("share URL pattern"))
}

/// A recognized share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRef {
    /// The link exactly as given; every request uses it unchanged.
    pub url: String,
    /// Opaque path segment after the share prefix.
    pub id: String,
    /// Decoded file name without extension.
    pub title: String,
}

impl ShareRef {
    pub fn parse(url: &str) -> Option<Self> {
        let id = valid_url_re().captures(url)?.name("id")?.as_str().to_string();
        Some(Self {
            url: url.to_string(),
            id,
            title: title_from_url(url),
        })
    }
}

pub fn is_share_url(url: &str) -> bool {
    valid_url_re().is_match(url)
}
