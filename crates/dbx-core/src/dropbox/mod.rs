//! Dropbox share-link extractor.
//!
//! One extraction is a straight line: fetch the share page, get past the
//! password wall if there is one, decode the embedded prefetch payload,
//! resolve its HLS manifest and assemble the [`MediaInfo`]. Only the page
//! fetch, the password wall and the manifest fetch can fail the whole run.

mod gate;
mod metadata;
mod payload;
mod share;
mod thumbnails;

pub use gate::{auth_form_body, content_id, is_password_gated, og_title, AUTH_URL};
pub use metadata::{FileMetadata, METADATA_URL};
pub use payload::{decode_token, find_payload, registration_tokens, PayloadFields};
pub use share::{is_share_url, ShareRef, VALID_URL};
pub use thumbnails::derive_thumbnails;

use crate::date::unified_strdate;
use crate::error::ExtractError;
use crate::extractor::{ExtractContext, ExtractRequest, Extractor};
use crate::model::{Format, MediaInfo};
use crate::url_model::{extension_from_url, update_url_query};

/// Origin whose cookies carry the CSRF token.
pub(crate) const COOKIE_URL: &str = "https://www.dropbox.com";
/// CSRF token cookie, echoed in the auth form and the metadata request.
pub(crate) const CSRF_COOKIE: &str = "t";

#[derive(Debug, Clone, Copy, Default)]
pub struct DropboxExtractor;

impl Extractor for DropboxExtractor {
    fn name(&self) -> &'static str {
        "Dropbox"
    }

    fn suitable(&self, url: &str) -> bool {
        is_share_url(url)
    }

    fn extract(
        &self,
        ctx: &ExtractContext<'_>,
        req: &ExtractRequest,
    ) -> Result<MediaInfo, ExtractError> {
        let share =
            ShareRef::parse(&req.url).ok_or_else(|| ExtractError::UnsupportedUrl(req.url.clone()))?;

        tracing::debug!(id = %share.id, "downloading share page");
        let page = ctx.http.get_text(&share.url)?;
        let page = gate::unlock(ctx, &share, page, req.password.as_deref())?;

        let mut info = MediaInfo {
            id: share.id.clone(),
            title: share.title.clone(),
            webpage_url: share.url.clone(),
            ..MediaInfo::default()
        };

        let Some(fields) = find_payload(&page) else {
            tracing::warn!(id = %share.id, "no embedded payload references a manifest");
            return Ok(info);
        };

        let manifest = ctx.manifests.resolve(&fields.manifest_url, &share.id)?;
        info.formats = manifest.formats;
        info.subtitles = manifest.subtitles;

        if let Some(base) = &fields.thumbnail_url {
            info.thumbnails = derive_thumbnails(base);
        }
        info.storyboard_url = fields.storyboard_url.clone();

        let meta = match &fields.internal_id {
            Some(internal_id) => metadata::fetch_metadata(ctx, &share.url, internal_id),
            None => FileMetadata::default(),
        };

        if fields.anonymous_download {
            info.formats.push(original_format(&share, &meta));
        }

        info.duration = meta.duration;
        info.upload_date = meta.capture_date.as_deref().and_then(unified_strdate);

        tracing::debug!(
            id = %info.id,
            formats = info.formats.len(),
            thumbnails = info.thumbnails.len(),
            "extraction finished"
        );
        Ok(info)
    }
}

/// Direct download of the uploaded file, ranked above every stream.
fn original_format(share: &ShareRef, meta: &FileMetadata) -> Format {
    let url = update_url_query(&share.url, &[("dl", "1")]).unwrap_or_else(|e| {
        tracing::warn!("cannot rewrite share URL query: {:#}", e);
        share.url.clone()
    });
    Format {
        format_id: "original".to_string(),
        url,
        ext: extension_from_url(&share.url).unwrap_or_else(|| "mp4".to_string()),
        protocol: "https".to_string(),
        format_note: Some("Original".to_string()),
        quality: Some(1),
        width: meta.resolution_width,
        height: meta.resolution_height,
        fps: meta.frame_rate,
        vcodec: meta.codec.clone(),
        ..Format::default()
    }
}
