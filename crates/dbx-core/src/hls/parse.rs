//! M3U8 playlist parsing (master and media playlists).

use anyhow::{Context, Result};
use std::collections::HashMap;
use url::Url;

use super::attrs::parse_attributes;
use super::ManifestFormats;
use crate::model::{Format, SubtitleTrack};

const PROTOCOL: &str = "m3u8_native";

const VIDEO_CODECS: &[&str] = &[
    "avc1", "avc3", "hvc1", "hev1", "vp09", "vp9", "vp8", "av01", "dvh1", "dvhe",
];
const AUDIO_CODECS: &[&str] = &["mp4a", "ac-3", "ec-3", "opus", "flac", "mp3", "vorbis"];

/// Parses playlist `text` fetched from `manifest_url`.
///
/// Master playlists yield one format per `#EXT-X-STREAM-INF` variant plus
/// audio renditions and subtitle tracks from `#EXT-X-MEDIA`. A media playlist
/// yields a single `hls` format pointing at the manifest itself.
pub fn parse_playlist(text: &str, manifest_url: &str) -> Result<ManifestFormats> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    match lines.next() {
        Some(first) if first.starts_with("#EXTM3U") => {}
        _ => anyhow::bail!("not an M3U8 playlist"),
    }
    let base = Url::parse(manifest_url)
        .with_context(|| format!("invalid manifest URL: {manifest_url}"))?;

    let mut out = ManifestFormats::default();
    let mut pending_variant: Option<HashMap<String, String>> = None;
    let mut has_segments = false;

    for line in lines {
        if let Some(attrs) = line.strip_prefix("#EXT-X-STREAM-INF:") {
            pending_variant = Some(parse_attributes(attrs));
        } else if let Some(attrs) = line.strip_prefix("#EXT-X-MEDIA:") {
            add_rendition(&mut out, &parse_attributes(attrs), &base, manifest_url)?;
        } else if line.starts_with("#EXTINF") || line.starts_with("#EXT-X-TARGETDURATION") {
            has_segments = true;
        } else if line.starts_with('#') {
            continue;
        } else if let Some(attrs) = pending_variant.take() {
            let url = base
                .join(line)
                .with_context(|| format!("invalid variant URI: {line}"))?;
            let index = out.formats.len();
            let format = variant_format(&attrs, url.as_str(), manifest_url, index);
            push_unique(&mut out.formats, format);
        }
    }

    if out.formats.is_empty() && has_segments {
        out.formats.push(Format {
            format_id: "hls".to_string(),
            url: manifest_url.to_string(),
            manifest_url: Some(manifest_url.to_string()),
            ext: "mp4".to_string(),
            protocol: PROTOCOL.to_string(),
            ..Format::default()
        });
    }

    Ok(out)
}

fn variant_format(
    attrs: &HashMap<String, String>,
    url: &str,
    manifest_url: &str,
    index: usize,
) -> Format {
    let bandwidth = attrs
        .get("AVERAGE-BANDWIDTH")
        .or_else(|| attrs.get("BANDWIDTH"))
        .and_then(|b| b.parse::<f64>().ok());
    let tbr = bandwidth.map(|b| b / 1000.0);
    let format_id = match tbr {
        Some(kbps) => format!("hls-{}", kbps.round() as u64),
        None => format!("hls-{index}"),
    };

    let (width, height) = attrs
        .get("RESOLUTION")
        .and_then(|r| r.split_once(['x', 'X']))
        .and_then(|(w, h)| Some((w.parse::<u32>().ok()?, h.parse::<u32>().ok()?)))
        .map_or((None, None), |(w, h)| (Some(w), Some(h)));

    let (vcodec, acodec) = attrs
        .get("CODECS")
        .map(|c| split_codecs(c))
        .unwrap_or((None, None));

    Format {
        format_id,
        url: url.to_string(),
        manifest_url: Some(manifest_url.to_string()),
        ext: "mp4".to_string(),
        protocol: PROTOCOL.to_string(),
        tbr,
        width,
        height,
        fps: attrs.get("FRAME-RATE").and_then(|f| f.parse::<f64>().ok()),
        vcodec,
        acodec,
        ..Format::default()
    }
}

fn add_rendition(
    out: &mut ManifestFormats,
    attrs: &HashMap<String, String>,
    base: &Url,
    manifest_url: &str,
) -> Result<()> {
    let Some(uri) = attrs.get("URI") else {
        return Ok(());
    };
    let url = base
        .join(uri)
        .with_context(|| format!("invalid rendition URI: {uri}"))?;
    let name = attrs.get("NAME").cloned();

    match attrs.get("TYPE").map(String::as_str) {
        Some("SUBTITLES") => {
            let lang = attrs
                .get("LANGUAGE")
                .cloned()
                .unwrap_or_else(|| "und".to_string());
            out.subtitles.entry(lang).or_default().push(SubtitleTrack {
                url: url.into(),
                ext: "vtt".to_string(),
                name,
            });
        }
        Some("AUDIO") => {
            let label = name
                .as_deref()
                .or(attrs.get("GROUP-ID").map(String::as_str))
                .unwrap_or("default")
                .replace(char::is_whitespace, "_");
            let format = Format {
                format_id: format!("hls-audio-{label}"),
                url: url.into(),
                manifest_url: Some(manifest_url.to_string()),
                ext: "mp4".to_string(),
                protocol: PROTOCOL.to_string(),
                format_note: name,
                vcodec: Some("none".to_string()),
                ..Format::default()
            };
            push_unique(&mut out.formats, format);
        }
        _ => {}
    }
    Ok(())
}

/// Classifies a CODECS list into (video, audio). An audio-only list marks
/// the video codec as `none`.
fn split_codecs(codecs: &str) -> (Option<String>, Option<String>) {
    let mut vcodec = None;
    let mut acodec = None;
    for codec in codecs.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let family = codec.split('.').next().unwrap_or(codec).to_ascii_lowercase();
        if vcodec.is_none() && VIDEO_CODECS.contains(&family.as_str()) {
            vcodec = Some(codec.to_string());
        } else if acodec.is_none() && AUDIO_CODECS.contains(&family.as_str()) {
            acodec = Some(codec.to_string());
        }
    }
    if vcodec.is_none() && acodec.is_some() {
        vcodec = Some("none".to_string());
    }
    (vcodec, acodec)
}

/// Appends `format`, suffixing its id if an earlier format already uses it.
fn push_unique(formats: &mut Vec<Format>, mut format: Format) {
    let base_id = format.format_id.clone();
    let mut n = 1;
    while formats.iter().any(|f| f.format_id == format.format_id) {
        format.format_id = format!("{base_id}-{n}");
        n += 1;
    }
    formats.push(format);
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "https://cdn.dropbox.com/hls/abc/master.m3u8?token=x";

    const MASTER: &str = r#"#EXTM3U
#EXT-X-VERSION:4
#EXT-X-MEDIA:TYPE=SUBTITLES,GROUP-ID="subs",NAME="English",LANGUAGE="en",URI="subs/en.m3u8"
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aud",NAME="Main Audio",URI="audio/main.m3u8"
#EXT-X-STREAM-INF:BANDWIDTH=1280000,AVERAGE-BANDWIDTH=1000000,RESOLUTION=1280x720,CODECS="avc1.64001f,mp4a.40.2",FRAME-RATE=29.970,SUBTITLES="subs"
720/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=640000,RESOLUTION=640x360,CODECS="avc1.4d401e"
https://other.example.com/360/index.m3u8
"#;

    #[test]
    fn master_playlist_variants() {
        let out = parse_playlist(MASTER, MANIFEST).unwrap();
        let ids: Vec<&str> = out.formats.iter().map(|f| f.format_id.as_str()).collect();
        assert_eq!(ids, ["hls-audio-Main_Audio", "hls-1000", "hls-640"]);

        let hd = &out.formats[1];
        assert_eq!(hd.url, "https://cdn.dropbox.com/hls/abc/720/index.m3u8");
        assert_eq!(hd.manifest_url.as_deref(), Some(MANIFEST));
        assert_eq!((hd.width, hd.height), (Some(1280), Some(720)));
        assert_eq!(hd.tbr, Some(1000.0));
        assert_eq!(hd.fps, Some(29.97));
        assert_eq!(hd.vcodec.as_deref(), Some("avc1.64001f"));
        assert_eq!(hd.acodec.as_deref(), Some("mp4a.40.2"));
        assert_eq!(hd.protocol, "m3u8_native");

        let sd = &out.formats[2];
        assert_eq!(sd.url, "https://other.example.com/360/index.m3u8");
        assert!(sd.acodec.is_none());

        let audio = &out.formats[0];
        assert_eq!(audio.vcodec.as_deref(), Some("none"));
        assert_eq!(audio.format_note.as_deref(), Some("Main Audio"));
    }

    #[test]
    fn master_playlist_subtitles() {
        let out = parse_playlist(MASTER, MANIFEST).unwrap();
        let en = &out.subtitles["en"];
        assert_eq!(en.len(), 1);
        assert_eq!(en[0].url, "https://cdn.dropbox.com/hls/abc/subs/en.m3u8");
        assert_eq!(en[0].ext, "vtt");
        assert_eq!(en[0].name.as_deref(), Some("English"));
    }

    #[test]
    fn media_playlist_is_single_format() {
        let text = "#EXTM3U\n#EXT-X-TARGETDURATION:6\n#EXTINF:6.0,\nseg0.ts\n#EXTINF:4.0,\nseg1.ts\n#EXT-X-ENDLIST\n";
        let out = parse_playlist(text, MANIFEST).unwrap();
        assert_eq!(out.formats.len(), 1);
        assert_eq!(out.formats[0].format_id, "hls");
        assert_eq!(out.formats[0].url, MANIFEST);
        assert!(out.subtitles.is_empty());
    }

    #[test]
    fn duplicate_bandwidth_ids_are_suffixed() {
        let text = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=500000\na.m3u8\n#EXT-X-STREAM-INF:BANDWIDTH=500000\nb.m3u8\n#EXT-X-STREAM-INF:RESOLUTION=320x180\nc.m3u8\n";
        let out = parse_playlist(text, MANIFEST).unwrap();
        let ids: Vec<&str> = out.formats.iter().map(|f| f.format_id.as_str()).collect();
        assert_eq!(ids, ["hls-500", "hls-500-1", "hls-2"]);
    }

    #[test]
    fn missing_header_is_error() {
        assert!(parse_playlist("#EXT-X-VERSION:3\n", MANIFEST).is_err());
        assert!(parse_playlist("", MANIFEST).is_err());
    }

    #[test]
    fn audio_only_codecs() {
        assert_eq!(
            split_codecs("mp4a.40.2"),
            (Some("none".to_string()), Some("mp4a.40.2".to_string()))
        );
        assert_eq!(split_codecs("hvc1.1.6.L93.90"), (Some("hvc1.1.6.L93.90".to_string()), None));
    }
}
