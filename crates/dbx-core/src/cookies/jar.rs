use url::Url;

use super::unix_now;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Lower-case, without a leading dot.
    pub domain: String,
    /// Only sent to `domain` itself, not its subdomains.
    pub host_only: bool,
    pub path: String,
    pub secure: bool,
    /// Unix seconds; `None` for a session cookie.
    pub expires: Option<i64>,
}

impl Cookie {
    /// Session cookie for `domain` and path `/`. A leading dot in `domain`
    /// makes it valid for subdomains too.
    pub fn new(name: &str, value: &str, domain: &str) -> Self {
        let host_only = !domain.starts_with('.');
        Self {
            name: name.to_string(),
            value: value.to_string(),
            domain: domain.trim_start_matches('.').to_ascii_lowercase(),
            host_only,
            path: "/".to_string(),
            secure: false,
            expires: None,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires.is_some_and(|e| e <= now)
    }

    /// True if this cookie would be sent with a request to `url`.
    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        if self.secure && url.scheme() != "https" {
            return false;
        }
        domain_matches(&host, &self.domain, self.host_only) && path_matches(url.path(), &self.path)
    }
}

pub(crate) fn domain_matches(host: &str, domain: &str, host_only: bool) -> bool {
    if host == domain {
        return true;
    }
    !host_only
        && host.len() > domain.len()
        && host.ends_with(domain)
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
}

fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}

/// In-memory cookie store keyed by (name, domain, path).
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `cookie`, replacing any cookie with the same name, domain and path.
    /// An already-expired cookie only removes its predecessor.
    pub fn insert(&mut self, cookie: Cookie) {
        self.cookies.retain(|c| {
            !(c.name == cookie.name && c.domain == cookie.domain && c.path == cookie.path)
        });
        if !cookie.is_expired(unix_now()) {
            self.cookies.push(cookie);
        }
    }

    pub fn extend<I: IntoIterator<Item = Cookie>>(&mut self, cookies: I) {
        for c in cookies {
            self.insert(c);
        }
    }

    /// The cookie `name` for `url`; the longest matching path wins.
    pub fn get(&self, url: &Url, name: &str) -> Option<&Cookie> {
        let now = unix_now();
        self.cookies
            .iter()
            .filter(|c| c.name == name && !c.is_expired(now) && c.matches(url))
            .max_by_key(|c| c.path.len())
    }

    /// `Cookie` header value for a request to `url`, or `None` if nothing matches.
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let now = unix_now();
        let mut matching: Vec<&Cookie> = self
            .cookies
            .iter()
            .filter(|c| !c.is_expired(now) && c.matches(url))
            .collect();
        if matching.is_empty() {
            return None;
        }
        matching.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        Some(
            matching
                .iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}
