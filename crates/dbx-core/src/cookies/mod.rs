//! Cookie jar and the read-only accessor handed to extractors.
//!
//! Cookies come from three places: `Set-Cookie` headers seen by the HTTP
//! client, a Netscape `cookies.txt` file, or a HAR capture.

mod har;
mod jar;
mod netscape;
mod set_cookie;

pub use har::load_har_cookies;
pub use jar::{Cookie, CookieJar};
pub use netscape::{load_netscape_file, parse_netscape};
pub use set_cookie::parse_set_cookie;

/// Read-only cookie lookup by URL.
///
/// Extractors receive this instead of reaching into the client; the HTTP
/// layer owns and mutates the underlying jar.
pub trait CookieSource {
    /// Value of the cookie `name` that would be sent with a request to `url`.
    fn cookie(&self, url: &str, name: &str) -> Option<String>;
}

impl CookieSource for CookieJar {
    fn cookie(&self, url: &str, name: &str) -> Option<String> {
        let url = url::Url::parse(url).ok()?;
        self.get(&url, name).map(|c| c.value.clone())
    }
}

/// Seconds since the Unix epoch.
pub(crate) fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
