//! `KEY=VALUE,KEY="quoted, value"` attribute lists used by HLS tags.

use std::collections::HashMap;

/// Parses an attribute list; quoted values have their quotes removed.
/// Keys are kept as written (HLS keys are upper-case).
pub(crate) fn parse_attributes(s: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let mut rest = s.trim();

    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else {
            break;
        };
        let key = rest[..eq].trim().to_string();
        let after = &rest[eq + 1..];

        let (value, remaining) = if let Some(quoted) = after.strip_prefix('"') {
            match quoted.find('"') {
                Some(end) => {
                    let tail = &quoted[end + 1..];
                    (&quoted[..end], tail.strip_prefix(',').unwrap_or(tail))
                }
                None => (quoted, ""),
            }
        } else {
            match after.find(',') {
                Some(comma) => (&after[..comma], &after[comma + 1..]),
                None => (after, ""),
            }
        };

        if !key.is_empty() {
            out.insert(key, value.trim().to_string());
        }
        rest = remaining.trim_start();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_values_keep_commas() {
        let a = parse_attributes(r#"BANDWIDTH=1280000,CODECS="avc1.64001f,mp4a.40.2",RESOLUTION=1280x720"#);
        assert_eq!(a["BANDWIDTH"], "1280000");
        assert_eq!(a["CODECS"], "avc1.64001f,mp4a.40.2");
        assert_eq!(a["RESOLUTION"], "1280x720");
    }

    #[test]
    fn trailing_and_empty() {
        assert!(parse_attributes("").is_empty());
        let a = parse_attributes(r#"TYPE=SUBTITLES,NAME="English""#);
        assert_eq!(a.len(), 2);
        assert_eq!(a["NAME"], "English");
        let a = parse_attributes(r#"URI="unterminated"#);
        assert_eq!(a["URI"], "unterminated");
    }
}
