//! File metadata side request. Never fatal: any failure yields an empty record.

use serde_json::{json, Value};

use super::{COOKIE_URL, CSRF_COOKIE};
use crate::error::ExtractError;
use crate::extractor::ExtractContext;
use crate::http::HttpRequest;

pub const METADATA_URL: &str = "https://www.dropbox.com/2/files/get_file_content_metadata";

/// Media properties reported by the metadata endpoint; each may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMetadata {
    pub resolution_width: Option<u32>,
    pub resolution_height: Option<u32>,
    pub frame_rate: Option<f64>,
    pub codec: Option<String>,
    pub duration: Option<f64>,
    pub capture_date: Option<String>,
}

impl FileMetadata {
    /// Reads the `metadata` object of an endpoint reply. Absent or mistyped
    /// fields are left unset.
    pub fn from_reply(reply: &Value) -> Self {
        let Some(m) = reply.get("metadata") else {
            return Self::default();
        };
        let dimension = |key: &str| {
            m.get(key)
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
        };
        let text = |key: &str| m.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            resolution_width: dimension("resolution_width"),
            resolution_height: dimension("resolution_height"),
            frame_rate: m.get("frame_rate").and_then(Value::as_f64),
            codec: text("codec"),
            duration: m.get("duration").and_then(Value::as_f64),
            capture_date: text("capture_date"),
        }
    }
}

/// Fetches metadata for `internal_id`; logs and returns an empty record on failure.
pub(super) fn fetch_metadata(
    ctx: &ExtractContext<'_>,
    share_url: &str,
    internal_id: &str,
) -> FileMetadata {
    match request_metadata(ctx, share_url, internal_id) {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!(internal_id, "file metadata unavailable: {}", e);
            FileMetadata::default()
        }
    }
}

fn request_metadata(
    ctx: &ExtractContext<'_>,
    share_url: &str,
    internal_id: &str,
) -> Result<FileMetadata, ExtractError> {
    let csrf = ctx
        .cookies
        .cookie(COOKIE_URL, CSRF_COOKIE)
        .ok_or(ExtractError::MissingCookie { name: CSRF_COOKIE })?;

    let payload = json!({
        "file_path_or_id": format!("id:{internal_id}"),
        "url": share_url,
    });
    let req = HttpRequest::post(METADATA_URL, payload.to_string().into_bytes())
        .header("Accept", "application/json")
        .header("content-type", "application/json; charset=utf-8")
        .header("x-csrf-token", &csrf)
        .header("x-dropbox-uid", "-1");

    tracing::debug!(internal_id, "requesting file metadata");
    let reply: Value = ctx
        .http
        .fetch(&req)?
        .json()
        .map_err(|source| ExtractError::InvalidResponse {
            what: "file metadata",
            source,
        })?;
    Ok(FileMetadata::from_reply(&reply))
}
