//! `dbx check <url>` – validate a share link offline.

use anyhow::Result;
use dbx_core::dropbox::ShareRef;
use dbx_core::ExtractError;

pub fn run_check(url: &str) -> Result<()> {
    let share = ShareRef::parse(url).ok_or_else(|| ExtractError::UnsupportedUrl(url.to_string()))?;
    println!("id:    {}", share.id);
    println!("title: {}", share.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_foreign_url() {
        let err = run_check("https://example.com/s/abc").unwrap_err();
        assert!(err.downcast_ref::<ExtractError>().unwrap().is_expected());
    }

    #[test]
    fn accepts_share_url() {
        run_check("https://www.dropbox.com/s/abc/clip.mp4?dl=0").unwrap();
    }
}
