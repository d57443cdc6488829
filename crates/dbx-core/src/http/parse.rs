//! Split raw response header lines into per-response blocks.
//!
//! With redirects followed, libcurl hands us the headers of every hop in one
//! stream. Each block starts at an `HTTP/` status line.

/// Headers of one response in a redirect chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct HeaderBlock {
    pub status: u32,
    pub headers: Vec<(String, String)>,
}

impl HeaderBlock {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Parse collected header lines into blocks. Interim `1xx` responses are dropped.
pub(crate) fn parse_header_blocks(lines: &[String]) -> Vec<HeaderBlock> {
    let mut blocks: Vec<HeaderBlock> = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            let status = line
                .split_whitespace()
                .nth(1)
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(0);
            blocks.push(HeaderBlock {
                status,
                headers: Vec::new(),
            });
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if let Some(block) = blocks.last_mut() {
                block
                    .headers
                    .push((name.trim().to_string(), value.trim().to_string()));
            }
        }
    }

    blocks.retain(|b| !(100..200).contains(&b.status));
    blocks
}
