//! `dbx formats <url>` – list available formats.

use anyhow::Result;
use dbx_core::config::DbxConfig;
use dbx_core::MediaInfo;

use super::session::extract_media;
use crate::cli::SourceArgs;

pub fn run_formats(cfg: &DbxConfig, source: &SourceArgs) -> Result<()> {
    let info = extract_media(cfg, source)?;
    print!("{}", format_table(&info));
    Ok(())
}

pub(super) fn format_table(info: &MediaInfo) -> String {
    let mut out = format!("{} ({})\n", info.title, info.id);
    if info.formats.is_empty() {
        out.push_str("No formats found.\n");
    } else {
        out.push_str(&format!(
            "{:<20} {:<5} {:<12} {:>6} {}\n",
            "ID", "EXT", "RESOLUTION", "TBR", "NOTE"
        ));
        for f in &info.formats {
            let tbr = f
                .tbr
                .map(|t| format!("{t:.0}k"))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "{:<20} {:<5} {:<12} {:>6} {}\n",
                f.format_id,
                f.ext,
                f.resolution(),
                tbr,
                f.format_note.as_deref().unwrap_or("")
            ));
        }
    }
    let subtitle_tracks: usize = info.subtitles.values().map(Vec::len).sum();
    out.push_str(&format!(
        "{} thumbnails, {} subtitle tracks\n",
        info.thumbnails.len(),
        subtitle_tracks
    ));
    out
}
