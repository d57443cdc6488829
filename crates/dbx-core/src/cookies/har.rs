//! Cookies from a HAR (HTTP Archive) capture.
//!
//! Takes the `Cookie` header of every request (host-only on the request host)
//! and every `Set-Cookie` header of every response, in capture order, so a
//! later value replaces an earlier one.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use url::Url;

use super::jar::Cookie;
use super::set_cookie::parse_set_cookie;

/// Root HAR log (top-level wrapper).
#[derive(Debug, Deserialize)]
struct HarLog {
    log: HarRoot,
}

#[derive(Debug, Deserialize)]
struct HarRoot {
    entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
struct HarEntry {
    request: HarRequest,
    #[serde(default)]
    response: Option<HarResponse>,
}

#[derive(Debug, Deserialize)]
struct HarRequest {
    url: String,
    #[serde(default)]
    headers: Vec<HarHeader>,
}

#[derive(Debug, Deserialize)]
struct HarResponse {
    #[serde(default)]
    headers: Vec<HarHeader>,
}

#[derive(Debug, Deserialize)]
struct HarHeader {
    name: String,
    value: String,
}

/// Reads cookies out of a HAR file.
pub fn load_har_cookies(path: &Path) -> Result<Vec<Cookie>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read HAR file: {}", path.display()))?;
    let har: HarLog = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse HAR JSON: {}", path.display()))?;

    let cookies = cookies_from_entries(&har.log.entries);
    tracing::debug!(path = %path.display(), count = cookies.len(), "loaded HAR cookies");
    Ok(cookies)
}

fn cookies_from_entries(entries: &[HarEntry]) -> Vec<Cookie> {
    let mut out = Vec::new();
    for entry in entries {
        let Ok(url) = Url::parse(&entry.request.url) else {
            continue;
        };
        let Some(host) = url.host_str() else {
            continue;
        };

        for value in header_values(&entry.request.headers, "Cookie") {
            for pair in value.split(';') {
                if let Some((name, val)) = pair.split_once('=') {
                    let name = name.trim();
                    if !name.is_empty() {
                        out.push(Cookie::new(name, val.trim(), host));
                    }
                }
            }
        }

        if let Some(response) = &entry.response {
            // Some exporters fold repeated Set-Cookie headers into one, newline-separated.
            for value in header_values(&response.headers, "Set-Cookie") {
                out.extend(value.lines().filter_map(|line| parse_set_cookie(line, &url)));
            }
        }
    }
    out
}

fn header_values<'a>(headers: &'a [HarHeader], name: &'a str) -> impl Iterator<Item = &'a str> {
    headers
        .iter()
        .filter(move |h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}
