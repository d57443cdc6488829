//! Extractor interface: a share URL in, a [`MediaInfo`] out.
//!
//! Extractors never own transport or cookie state. The caller hands them an
//! [`ExtractContext`] so tests can substitute every collaborator.

use crate::cookies::CookieSource;
use crate::dropbox::DropboxExtractor;
use crate::error::ExtractError;
use crate::hls::ManifestResolver;
use crate::http::HttpClient;
use crate::model::MediaInfo;

/// What the caller asks for.
#[derive(Debug, Clone, Default)]
pub struct ExtractRequest {
    pub url: String,
    /// Video password, submitted only if the page is gated.
    pub password: Option<String>,
}

impl ExtractRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }
}

/// Collaborators available during one extraction.
#[derive(Clone, Copy)]
pub struct ExtractContext<'a> {
    pub http: &'a dyn HttpClient,
    pub cookies: &'a dyn CookieSource,
    pub manifests: &'a dyn ManifestResolver,
}

pub trait Extractor: Sync {
    fn name(&self) -> &'static str;
    fn suitable(&self, url: &str) -> bool;
    fn extract(&self, ctx: &ExtractContext<'_>, req: &ExtractRequest)
        -> Result<MediaInfo, ExtractError>;
}

static EXTRACTORS: &[&dyn Extractor] = &[&DropboxExtractor];

/// First registered extractor that accepts `url`.
pub fn find_extractor(url: &str) -> Option<&'static dyn Extractor> {
    EXTRACTORS.iter().copied().find(|e| e.suitable(url))
}
