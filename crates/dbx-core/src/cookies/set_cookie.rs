//! `Set-Cookie` header parsing.

use chrono::{DateTime, NaiveDateTime};
use url::Url;

use super::jar::{domain_matches, Cookie};
use super::unix_now;

/// Parses one `Set-Cookie` value received from `request_url`.
///
/// Returns `None` for a nameless cookie or one whose `Domain` does not cover
/// the request host.
pub fn parse_set_cookie(value: &str, request_url: &Url) -> Option<Cookie> {
    let host = request_url.host_str()?.to_ascii_lowercase();
    let mut parts = value.split(';');
    let (name, val) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut cookie = Cookie {
        name: name.to_string(),
        value: val.trim().trim_matches('"').to_string(),
        domain: host.clone(),
        host_only: true,
        path: default_path(request_url.path()),
        secure: false,
        expires: None,
    };
    let mut max_age: Option<i64> = None;

    for attr in parts {
        let (key, arg) = match attr.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (attr.trim(), ""),
        };
        if key.eq_ignore_ascii_case("domain") {
            let domain = arg.trim_start_matches('.').to_ascii_lowercase();
            if domain.is_empty() {
                continue;
            }
            if !domain_matches(&host, &domain, false) {
                return None;
            }
            cookie.domain = domain;
            cookie.host_only = false;
        } else if key.eq_ignore_ascii_case("path") {
            if arg.starts_with('/') {
                cookie.path = arg.to_string();
            }
        } else if key.eq_ignore_ascii_case("secure") {
            cookie.secure = true;
        } else if key.eq_ignore_ascii_case("max-age") {
            if let Ok(secs) = arg.parse::<i64>() {
                max_age = Some(secs);
            }
        } else if key.eq_ignore_ascii_case("expires") {
            if let Some(ts) = parse_cookie_date(arg) {
                cookie.expires = Some(ts);
            }
        }
    }

    if let Some(secs) = max_age {
        cookie.expires = Some(if secs <= 0 { 0 } else { unix_now() + secs });
    }

    Some(cookie)
}

/// Directory part of the request path, per RFC 6265 section 5.1.4.
fn default_path(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

fn parse_cookie_date(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp());
    }
    for fmt in ["%a, %d-%b-%Y %H:%M:%S GMT", "%a, %d-%b-%y %H:%M:%S GMT"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }
    None
}
