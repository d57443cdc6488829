//! Thumbnail variants derived from one preview URL.

use crate::model::Thumbnail;
use crate::url_model::update_url_query;

/// (size label, width, height), smallest first.
const SIZES: [(&str, u32, u32); 7] = [
    ("480x320", 480, 320),
    ("640x480", 640, 480),
    ("800x600", 800, 600),
    ("1024x768", 1024, 768),
    ("1280x960", 1280, 960),
    ("1600x1200", 1600, 1200),
    ("2048x1536", 2048, 1536),
];

const PREFERRED_WIDTH: u32 = 1280;

/// One thumbnail per fixed size, each with `size` and `size_mode=2` set on
/// `base_url`. The 1280-wide variant is preferred.
pub fn derive_thumbnails(base_url: &str) -> Vec<Thumbnail> {
    SIZES
        .iter()
        .map(|&(label, width, height)| Thumbnail {
            url: sized_url(base_url, label),
            width,
            height,
            preference: if width == PREFERRED_WIDTH { 1 } else { -1 },
        })
        .collect()
}

fn sized_url(base_url: &str, label: &str) -> String {
    let params = [("size", label), ("size_mode", "2")];
    update_url_query(base_url, &params).unwrap_or_else(|_| {
        let sep = if base_url.contains('?') { '&' } else { '?' };
        format!("{base_url}{sep}size={label}&size_mode=2")
    })
}
