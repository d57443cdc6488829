//! Builds the HTTP client and cookie jar for one extraction and runs it.
//!
//! HAR cookies are added on top of the cookies file.

use anyhow::{Context, Result};
use dbx_core::config::DbxConfig;
use dbx_core::cookies::{load_har_cookies, load_netscape_file, CookieJar};
use dbx_core::hls::HlsResolver;
use dbx_core::http::CurlClient;
use dbx_core::{find_extractor, ExtractContext, ExtractError, ExtractRequest, MediaInfo};

use crate::cli::SourceArgs;

/// Cookie jar from `--cookies`, or the configured cookies file.
pub(super) fn load_cookies(cfg: &DbxConfig, source: &SourceArgs) -> Result<CookieJar> {
    match source.cookies.as_ref().or(cfg.cookies_file.as_ref()) {
        Some(path) => load_netscape_file(path)
            .with_context(|| format!("loading cookies from {}", path.display())),
        None => Ok(CookieJar::new()),
    }
}

/// HTTP client seeded with the file cookies, plus HAR cookies when given.
pub(super) fn open_client(cfg: &DbxConfig, source: &SourceArgs) -> Result<CurlClient> {
    let client = CurlClient::with_cookies(&cfg.http, load_cookies(cfg, source)?);
    if let Some(har) = &source.har {
        let cookies = load_har_cookies(har)?;
        tracing::debug!(count = cookies.len(), "cookies imported from HAR");
        client.add_cookies(cookies);
    }
    tracing::debug!(count = client.cookie_jar().len(), "session cookies ready");
    Ok(client)
}

pub(super) fn extract_media(cfg: &DbxConfig, source: &SourceArgs) -> Result<MediaInfo> {
    let extractor = find_extractor(&source.url)
        .ok_or_else(|| ExtractError::UnsupportedUrl(source.url.clone()))?;

    let client = open_client(cfg, source)?;
    let manifests = HlsResolver::new(&client);
    let ctx = ExtractContext {
        http: &client,
        cookies: &client,
        manifests: &manifests,
    };
    let req = ExtractRequest::new(source.url.as_str()).with_password(source.video_password.clone());

    tracing::info!(extractor = extractor.name(), url = %req.url, "extracting");
    Ok(extractor.extract(&ctx, &req)?)
}
