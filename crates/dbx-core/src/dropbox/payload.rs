//! Embedded prefetch payloads.
//!
//! The share page registers base64 blobs through inline
//! `registerStreamedPrefetch("<key>", "<blob>")` calls. The newest blob that
//! references an HLS manifest describes the file; every field is pulled out
//! of that decoded blob by its own extraction function.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use regex::Regex;
use std::sync::OnceLock;

const ANONYMOUS_MARKER: &str = "anonymous:\tanonymous";

/// Lenient decoder: padding optional, stray trailing bits accepted.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect(stringify!($name)))
        }
    };
}

cached_regex!(
    registration_re,
    r#"registerStreamedPrefetch\s*\(\s*"[\w/+=]+"\s*,\s*"([\w/+=]+)""#
);
cached_regex!(manifest_re, r"\n.(https://[^\x03\x08\x12\n]+\.m3u8)");
// Payloads are binary; the 0x1c..0x1f separator bytes end a token like whitespace.
cached_regex!(thumbnail_re, r"\Ahttps://.+?thumb[^\s\x1c-\x1f]*?\.jpeg");
cached_regex!(
    storyboard_re,
    r"\Ahttps://.+?scrubber_thumb_vtt[^\s\x1c-\x1f]*?\.vtt"
);
cached_regex!(internal_id_re, r"id:([^\s\x1c-\x1f]+)");

/// Fields taken from the first usable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadFields {
    pub manifest_url: String,
    pub anonymous_download: bool,
    pub thumbnail_url: Option<String>,
    pub storyboard_url: Option<String>,
    pub internal_id: Option<String>,
}

impl PayloadFields {
    /// `None` unless `decoded` references a manifest.
    pub fn from_decoded(decoded: &str) -> Option<Self> {
        let manifest_url = manifest_url(decoded)?;
        Some(Self {
            manifest_url,
            anonymous_download: has_anonymous_download(decoded),
            thumbnail_url: thumbnail_url(decoded),
            storyboard_url: storyboard_url(decoded),
            internal_id: internal_id(decoded),
        })
    }
}

/// Blob arguments of every registration call, in document order.
pub fn registration_tokens(page: &str) -> Vec<&str> {
    registration_re()
        .captures_iter(page)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Scans tokens last to first and stops at the first one with a manifest.
pub fn find_payload(page: &str) -> Option<PayloadFields> {
    let tokens = registration_tokens(page);
    tracing::debug!(count = tokens.len(), "registration tokens found");

    tokens.iter().enumerate().rev().find_map(|(index, token)| {
        let decoded = decode_token(token)?;
        let fields = PayloadFields::from_decoded(&decoded);
        match &fields {
            Some(f) => tracing::debug!(index, manifest = %f.manifest_url, "using prefetch payload"),
            None => tracing::debug!(index, "prefetch payload has no manifest"),
        }
        fields
    })
}

/// Base64-decodes `token` into text. Characters outside the alphabet are
/// skipped and invalid UTF-8 sequences dropped; `None` only if the remaining
/// characters cannot form base64 at all.
pub fn decode_token(token: &str) -> Option<String> {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '+' || *c == '/')
        .collect();
    let bytes = match LENIENT.decode(cleaned.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("skipping undecodable prefetch token: {}", e);
            return None;
        }
    };

    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    Some(text)
}

pub fn manifest_url(decoded: &str) -> Option<String> {
    manifest_re()
        .captures(decoded)
        .map(|c| c[1].to_string())
}

pub fn has_anonymous_download(decoded: &str) -> bool {
    decoded.contains(ANONYMOUS_MARKER)
}

/// First `https` thumbnail `.jpeg` URL that is not a scrubber-VTT URL.
pub fn thumbnail_url(decoded: &str) -> Option<String> {
    first_url_matching(decoded, thumbnail_re(), "scrubber_thumb_vtt")
}

/// First scrubber `.vtt` URL that is not an HLS URL.
pub fn storyboard_url(decoded: &str) -> Option<String> {
    first_url_matching(decoded, storyboard_re(), "hls")
}

pub fn internal_id(decoded: &str) -> Option<String> {
    internal_id_re()
        .captures(decoded)
        .map(|c| c[1].to_string())
}

/// Leftmost `https://` start whose run up to the next token break lacks
/// `excluded` and where `pattern` (anchored with `\A`) matches.
fn first_url_matching(text: &str, pattern: &Regex, excluded: &str) -> Option<String> {
    text.match_indices("https://").find_map(|(start, _)| {
        let rest = &text[start..];
        let run_end = rest.find(is_token_break).unwrap_or(rest.len());
        if rest[..run_end].contains(excluded) {
            return None;
        }
        pattern.find(rest).map(|m| m.as_str().to_string())
    })
}

/// Whitespace or one of the ASCII information separators (0x1c..=0x1f).
fn is_token_break(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}
