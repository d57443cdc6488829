//! libcurl-backed [`HttpClient`] with an in-process cookie jar.

use anyhow::{Context, Result};
use std::str;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use url::Url;

use super::parse::parse_header_blocks;
use super::{HttpClient, HttpRequest, HttpResponse, Method};
use crate::config::HttpConfig;
use crate::cookies::{parse_set_cookie, Cookie, CookieJar, CookieSource};

/// Blocking HTTP client. One curl `Easy` handle per request.
///
/// Every `Set-Cookie` received (on any redirect hop) lands in the jar, and
/// matching cookies are attached to later requests.
pub struct CurlClient {
    config: HttpConfig,
    jar: Mutex<CookieJar>,
}

impl CurlClient {
    pub fn new(config: &HttpConfig) -> Self {
        Self::with_cookies(config, CookieJar::new())
    }

    pub fn with_cookies(config: &HttpConfig, jar: CookieJar) -> Self {
        Self {
            config: config.clone(),
            jar: Mutex::new(jar),
        }
    }

    pub fn add_cookies<I: IntoIterator<Item = Cookie>>(&self, cookies: I) {
        self.jar().extend(cookies);
    }

    /// Snapshot of the current jar.
    pub fn cookie_jar(&self) -> CookieJar {
        self.jar().clone()
    }

    fn jar(&self) -> MutexGuard<'_, CookieJar> {
        self.jar.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn configure(&self, easy: &mut curl::easy::Easy, req: &HttpRequest) -> Result<()> {
        easy.url(&req.url).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.max_redirections(self.config.max_redirections)?;
        easy.connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.config.timeout_secs))?;
        easy.useragent(&self.config.user_agent)?;
        easy.accept_encoding("")?;

        match req.method {
            Method::Get => easy.get(true)?,
            Method::Post => {
                easy.post(true)?;
                easy.post_fields_copy(req.body.as_deref().unwrap_or_default())?;
            }
        }

        let has_cookie_header = req.headers.keys().any(|k| k.eq_ignore_ascii_case("cookie"));
        let jar_cookie = if has_cookie_header {
            None
        } else {
            Url::parse(&req.url).ok().and_then(|u| self.jar().header_for(&u))
        };

        // Build curl list for custom headers (e.g. "Name: value").
        let mut list = curl::easy::List::new();
        for (k, v) in &req.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if let Some(cookie) = jar_cookie {
            list.append(&format!("Cookie: {cookie}"))?;
        }
        if req.method == Method::Post {
            list.append("Expect:")?;
        }
        easy.http_headers(list)?;
        Ok(())
    }

    /// Store cookies from every hop. Hop URLs are rebuilt from `Location`.
    fn absorb_cookies(&self, request_url: &str, lines: &[String]) -> Vec<(String, String)> {
        let blocks = parse_header_blocks(lines);
        let mut hop_url = Url::parse(request_url).ok();
        let mut jar = self.jar();

        for block in &blocks {
            if let Some(url) = &hop_url {
                for value in block.get_all("Set-Cookie") {
                    match parse_set_cookie(value, url) {
                        Some(cookie) => jar.insert(cookie),
                        None => tracing::debug!(url = %url, "ignored Set-Cookie"),
                    }
                }
            }
            let next = match (&hop_url, block.get("Location")) {
                (Some(url), Some(location)) => url.join(location).ok(),
                (current, None) => current.clone(),
                (None, Some(_)) => None,
            };
            hop_url = next;
        }

        blocks.last().map(|b| b.headers.clone()).unwrap_or_default()
    }
}

impl HttpClient for CurlClient {
    fn send(&self, req: &HttpRequest) -> Result<HttpResponse> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, req)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer
                .perform()
                .with_context(|| format!("{} request failed", req.method))?;
        }

        let status = easy.response_code().context("no response code")?;
        let url = easy
            .effective_url()
            .ok()
            .flatten()
            .unwrap_or(req.url.as_str())
            .to_string();
        let headers = self.absorb_cookies(&req.url, &header_lines);

        tracing::debug!(method = %req.method, url = %req.url, status, bytes = body.len(), "http exchange");

        Ok(HttpResponse {
            status,
            url,
            headers,
            body,
        })
    }
}

impl CookieSource for CurlClient {
    fn cookie(&self, url: &str, name: &str) -> Option<String> {
        self.jar().cookie(url, name)
    }
}
