//! Password wall handling.
//!
//! A gated page is unlocked either by posting the caller's password to the
//! auth endpoint or, without a password, by an existing `sm_auth` session
//! cookie. Either way the page is fetched exactly once more.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use super::share::ShareRef;
use super::{COOKIE_URL, CSRF_COOKIE};
use crate::error::ExtractError;
use crate::extractor::ExtractContext;
use crate::http::HttpRequest;

pub const AUTH_URL: &str = "https://www.dropbox.com/sm/auth";

const GATE_TITLE: &str = "Dropbox - Password Required";
const GATE_PROMPT: &str = "Enter the password for this link";
const SESSION_COOKIE: &str = "sm_auth";
const SESSION_COOKIE_URL: &str = "https://dropbox.com";

#[derive(Debug, Deserialize)]
struct AuthReply {
    #[serde(default)]
    status: Option<String>,
}

/// True if `page` is the password prompt rather than the file view.
pub fn is_password_gated(page: &str) -> bool {
    og_title(page).as_deref() == Some(GATE_TITLE) || page.contains(GATE_PROMPT)
}

/// Content of the page's `og:title` meta tag, HTML entities decoded.
pub fn og_title(page: &str) -> Option<String> {
    static PROPERTY_FIRST: OnceLock<Regex> = OnceLock::new();
    static CONTENT_FIRST: OnceLock<Regex> = OnceLock::new();

    let property_first = PROPERTY_FIRST.get_or_init(|| {
        Regex::new(
            r#"(?is)<meta[^>]+?(?:property|name)\s*=\s*["']og:title["'][^>]*?\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
        )
        .expect("og:title pattern")
    });
    let content_first = CONTENT_FIRST.get_or_init(|| {
        Regex::new(
            r#"(?is)<meta[^>]+?\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*?(?:property|name)\s*=\s*["']og:title["']"#,
        )
        .expect("og:title pattern")
    });

    [property_first, content_first].iter().find_map(|re| {
        let caps = re.captures(page)?;
        let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
        Some(unescape_html(raw))
    })
}

fn unescape_html(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// The `content_id` token embedded in a gated page.
pub fn content_id(page: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"content_id=(.*?)["']"#).expect("content_id pattern"));
    re.captures(page).map(|c| c[1].to_string())
}

/// Form body for the auth endpoint. Every value is form-encoded.
pub fn auth_form_body(csrf: &str, content_id: &str, password: &str, url: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("is_xhr", "true")
        .append_pair("t", csrf)
        .append_pair("content_id", content_id)
        .append_pair("password", password)
        .append_pair("url", url)
        .finish()
}

/// Returns the usable page: `page` itself if not gated, otherwise the page
/// re-fetched after unlocking.
pub(super) fn unlock(
    ctx: &ExtractContext<'_>,
    share: &ShareRef,
    page: String,
    password: Option<&str>,
) -> Result<String, ExtractError> {
    if !is_password_gated(&page) {
        return Ok(page);
    }

    if let Some(password) = password {
        let content_id = content_id(&page).ok_or(ExtractError::MissingField {
            field: "content_id",
        })?;
        let csrf = ctx
            .cookies
            .cookie(COOKIE_URL, CSRF_COOKIE)
            .ok_or(ExtractError::MissingCookie { name: CSRF_COOKIE })?;

        tracing::info!(id = %share.id, "POSTing video password");
        let body = auth_form_body(&csrf, &content_id, password, &share.url);
        let req = HttpRequest::post(AUTH_URL, body.into_bytes()).header(
            "content-type",
            "application/x-www-form-urlencoded; charset=UTF-8",
        );
        let reply: AuthReply = ctx
            .http
            .fetch(&req)?
            .json()
            .map_err(|source| ExtractError::InvalidResponse {
                what: "password auth",
                source,
            })?;
        if reply.status.as_deref() != Some("authed") {
            return Err(ExtractError::AuthenticationFailed);
        }
    } else if ctx.cookies.cookie(SESSION_COOKIE_URL, SESSION_COOKIE).is_some() {
        tracing::debug!(id = %share.id, "password wall: reusing sm_auth session");
    } else {
        return Err(ExtractError::PasswordRequired);
    }

    Ok(ctx.http.get_text(&share.url)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATED_BY_TITLE: &str = r#"<html><head>
<meta property="og:title" content="Dropbox - Password Required">
</head><body>...</body></html>"#;

    #[test]
    fn gate_detected_by_og_title() {
        assert!(is_password_gated(GATED_BY_TITLE));
        assert_eq!(og_title(GATED_BY_TITLE).as_deref(), Some(GATE_TITLE));
    }

    #[test]
    fn gate_detected_by_prompt() {
        assert!(is_password_gated("<p>Enter the password for this link</p>"));
    }

    #[test]
    fn ordinary_page_not_gated() {
        let page = r#"<meta content="clip.mp4" property="og:title"><p>Download</p>"#;
        assert!(!is_password_gated(page));
        assert_eq!(og_title(page).as_deref(), Some("clip.mp4"));
    }

    #[test]
    fn og_title_entities_and_single_quotes() {
        let page = r#"<meta name='og:title' content='Tom &amp; Jerry &quot;1&quot;'>"#;
        assert_eq!(og_title(page).as_deref(), Some("Tom & Jerry \"1\""));
        assert_eq!(og_title("<html></html>"), None);
    }

    #[test]
    fn content_id_extraction() {
        let page = r#"<form action="/sm/auth?content_id=AbC-123_x"><input>"#;
        assert_eq!(content_id(page).as_deref(), Some("AbC-123_x"));
        assert_eq!(content_id("<html></html>"), None);
    }

    #[test]
    fn auth_body_is_form_encoded() {
        let body = auth_form_body(
            "csrf",
            "cid",
            "p&ss word",
            "https://www.dropbox.com/s/abc/x.mp4?dl=0",
        );
        assert_eq!(
            body,
            "is_xhr=true&t=csrf&content_id=cid&password=p%26ss+word&url=https%3A%2F%2Fwww.dropbox.com%2Fs%2Fabc%2Fx.mp4%3Fdl%3D0"
        );
    }
}
