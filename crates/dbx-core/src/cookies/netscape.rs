//! Netscape `cookies.txt` loading (the format browsers' export tools write).

use anyhow::{Context, Result};
use std::path::Path;

use super::jar::{Cookie, CookieJar};

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

/// Reads a `cookies.txt` file into a new jar.
pub fn load_netscape_file(path: &Path) -> Result<CookieJar> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read cookies file: {}", path.display()))?;
    let mut jar = CookieJar::new();
    jar.extend(parse_netscape(&text));
    tracing::debug!(path = %path.display(), count = jar.len(), "loaded cookies file");
    Ok(jar)
}

/// Parses `cookies.txt` content. Malformed lines are skipped with a warning.
pub fn parse_netscape(text: &str) -> Vec<Cookie> {
    let mut out = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        let line = match line.strip_prefix(HTTP_ONLY_PREFIX) {
            Some(rest) => rest,
            None if line.starts_with('#') || line.trim().is_empty() => continue,
            None => line,
        };

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 7 {
            tracing::warn!(line = lineno + 1, "skipping malformed cookies.txt line");
            continue;
        }
        let [domain, subdomains, path, secure, expires, name, value] = [
            fields[0], fields[1], fields[2], fields[3], fields[4], fields[5], fields[6],
        ];
        let Ok(expires) = expires.parse::<i64>() else {
            tracing::warn!(line = lineno + 1, "skipping cookie with invalid expiry");
            continue;
        };

        out.push(Cookie {
            name: name.to_string(),
            value: value.to_string(),
            domain: domain.trim_start_matches('.').to_ascii_lowercase(),
            host_only: !(domain.starts_with('.') || subdomains.eq_ignore_ascii_case("TRUE")),
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            secure: secure.eq_ignore_ascii_case("TRUE"),
            expires: if expires == 0 { None } else { Some(expires) },
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "# Netscape HTTP Cookie File\n\
\n\
.dropbox.com\tTRUE\t/\tTRUE\t0\tt\tcsrf-token\n\
#HttpOnly_www.dropbox.com\tFALSE\t/\tTRUE\t4102444800\tsm_auth\tyes\n\
broken line\n";

    #[test]
    fn parses_domain_and_http_only_lines() {
        let cookies = parse_netscape(SAMPLE);
        assert_eq!(cookies.len(), 2);

        assert_eq!(cookies[0].name, "t");
        assert_eq!(cookies[0].domain, "dropbox.com");
        assert!(!cookies[0].host_only);
        assert!(cookies[0].secure);
        assert!(cookies[0].expires.is_none());

        assert_eq!(cookies[1].name, "sm_auth");
        assert_eq!(cookies[1].domain, "www.dropbox.com");
        assert!(cookies[1].host_only);
        assert_eq!(cookies[1].expires, Some(4_102_444_800));
    }

    #[test]
    fn expired_cookies_are_dropped_on_load() {
        let text = "example.com\tFALSE\t/\tFALSE\t1\told\tv\n";
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        f.flush().unwrap();
        let jar = load_netscape_file(f.path()).unwrap();
        assert!(jar.is_empty());
    }

    #[test]
    fn missing_file_is_error() {
        assert!(load_netscape_file(Path::new("/nonexistent/cookies.txt")).is_err());
    }
}
