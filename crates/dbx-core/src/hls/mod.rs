//! HLS manifest resolution: a playlist URL in, stream formats and subtitle
//! tracks out.

mod attrs;
mod parse;

pub use parse::parse_playlist;

use anyhow::{Context, Result};

use crate::http::{HttpClient, HttpRequest};
use crate::model::{Format, Subtitles};

/// Formats and subtitles described by one manifest.
#[derive(Debug, Clone, Default)]
pub struct ManifestFormats {
    pub formats: Vec<Format>,
    pub subtitles: Subtitles,
}

/// Turns a manifest URL into formats. Kept behind a trait so extraction can
/// be tested without playlists.
pub trait ManifestResolver {
    fn resolve(&self, manifest_url: &str, video_id: &str) -> Result<ManifestFormats>;
}

/// Fetches `.m3u8` playlists over an [`HttpClient`] and parses them.
pub struct HlsResolver<'a> {
    http: &'a dyn HttpClient,
}

impl<'a> HlsResolver<'a> {
    pub fn new(http: &'a dyn HttpClient) -> Self {
        Self { http }
    }
}

impl ManifestResolver for HlsResolver<'_> {
    fn resolve(&self, manifest_url: &str, video_id: &str) -> Result<ManifestFormats> {
        tracing::debug!(video_id, manifest_url, "downloading m3u8 information");
        let resp = self.http.fetch(&HttpRequest::get(manifest_url))?;
        let base = if resp.url.is_empty() { manifest_url } else { resp.url.as_str() };
        parse_playlist(&resp.text(), base)
            .with_context(|| format!("{video_id}: failed to parse m3u8 manifest"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;

    struct Playlist(&'static str);

    impl HttpClient for Playlist {
        fn send(&self, req: &HttpRequest) -> Result<HttpResponse> {
            Ok(HttpResponse {
                status: 200,
                url: req.url.clone(),
                headers: Vec::new(),
                body: self.0.as_bytes().to_vec(),
            })
        }
    }

    #[test]
    fn resolver_joins_against_manifest_url() {
        let http = Playlist(
            "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360\nlow/index.m3u8\n",
        );
        let out = HlsResolver::new(&http)
            .resolve("https://cdn.example.com/v/master.m3u8", "abc")
            .unwrap();
        assert_eq!(out.formats.len(), 1);
        assert_eq!(out.formats[0].url, "https://cdn.example.com/v/low/index.m3u8");
        assert_eq!(
            out.formats[0].manifest_url.as_deref(),
            Some("https://cdn.example.com/v/master.m3u8")
        );
    }

    #[test]
    fn resolver_rejects_non_playlist() {
        let http = Playlist("<html>nope</html>");
        let err = HlsResolver::new(&http)
            .resolve("https://cdn.example.com/v/master.m3u8", "abc")
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse m3u8"));
    }
}
