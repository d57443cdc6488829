//! `dbx extract <url>` – print the extraction result as JSON.

use anyhow::Result;
use dbx_core::config::DbxConfig;

use super::session::extract_media;
use crate::cli::SourceArgs;

pub fn run_extract(cfg: &DbxConfig, source: &SourceArgs, compact: bool) -> Result<()> {
    let info = extract_media(cfg, source)?;
    let json = if compact || !cfg.pretty_json {
        serde_json::to_string(&info)?
    } else {
        serde_json::to_string_pretty(&info)?
    };
    println!("{json}");
    Ok(())
}
