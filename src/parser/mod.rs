pub mod lines;
pub mod sections;
pub mod title;
pub mod tracks;

use tracing::debug;

use crate::config::Thresholds;
use crate::error::Result;
use crate::model::{Origin, RawDocument, Track};
use sections::Layout;
use tracks::LineContext;

#[derive(Debug, Clone)]
pub struct ParsedPlaylist {
    pub title: String,
    pub description: String,
    pub tracks: Vec<Track>,
    pub layout: Layout,
}

/// Two-pass pipeline: text → sections → tracks.
pub fn parse_document(doc: &RawDocument, origin: Origin, th: &Thresholds) -> Result<ParsedPlaylist> {
    let sections = sections::segment(&doc.text, doc.title_hint.as_deref(), origin, th)?;
    let inferred = title::infer_single_artist(&sections.title);
    if let Some(artist) = &inferred {
        debug!(title = %sections.title, artist = %artist, "single-artist show");
    }

    let tracks = parse_tracks(
        &sections.track_lines,
        &sections.title,
        inferred.as_deref(),
        origin,
        th,
    );

    Ok(ParsedPlaylist {
        title: sections.title,
        description: sections.description,
        tracks,
        layout: sections.layout,
    })
}

/// Run every track-candidate line through the cascade, in order.
pub fn parse_tracks(
    lines: &[String],
    show_title: &str,
    inferred_artist: Option<&str>,
    origin: Origin,
    th: &Thresholds,
) -> Vec<Track> {
    let mut tracks = Vec::new();
    for line in lines {
        if origin == Origin::Web && line.chars().count() < th.min_web_line_len {
            continue;
        }
        let ctx = LineContext {
            show_title,
            inferred_artist,
            tracks_so_far: tracks.len(),
            origin,
            thresholds: th,
        };
        if let Some(track) = tracks::parse_line(line, &ctx) {
            tracks.push(track);
        }
    }
    tracks
}

// ── Tests ──
