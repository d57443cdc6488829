//! Extraction result records.

use serde::Serialize;
use std::collections::BTreeMap;

/// Subtitle tracks keyed by language code.
pub type Subtitles = BTreeMap<String, Vec<SubtitleTrack>>;

/// Everything extracted from one share link.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaInfo {
    pub id: String,
    pub title: String,
    pub webpage_url: String,
    pub formats: Vec<Format>,
    pub subtitles: Subtitles,
    pub thumbnails: Vec<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storyboard_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Normalized as `YYYYMMDD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
}

/// One downloadable rendition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Format {
    pub format_id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_url: Option<String>,
    pub ext: String,
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_note: Option<String>,
    /// Higher is better; only set on the original file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<i32>,
    /// Total bitrate in kbit/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tbr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcodec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acodec: Option<String>,
}

impl Format {
    /// `WIDTHxHEIGHT`, `audio only`, or `unknown` for display.
    pub fn resolution(&self) -> String {
        match (self.width, self.height) {
            (Some(w), Some(h)) => format!("{w}x{h}"),
            _ if self.vcodec.as_deref() == Some("none") => "audio only".to_string(),
            _ => "unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub preference: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleTrack {
    pub url: String,
    pub ext: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
