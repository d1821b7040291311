use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub artist: String,
    pub song: String,
}

impl Track {
    pub fn new(artist: impl Into<String>, song: impl Into<String>) -> Self {
        Track {
            artist: artist.into(),
            song: song.into(),
        }
    }
}

/// One archived show, keyed by `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub date: Option<String>,
    pub title: String,
    pub description: String,
    pub tracks: Vec<Track>,
    pub source_url: String,
    pub archived_date: String,
}

/// Raw text handed over by a source reader, consumed once per parse.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    pub text: String,
    pub date_hint: Option<String>,
    pub title_hint: Option<String>,
}

/// Where a document came from. Web text is lower-value free text, so its
/// description gets capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    TextFile,
    Web,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditStats {
    pub total_playlists: usize,
    pub total_tracks: usize,
    pub empty_playlists: usize,
    pub tracks_missing_artist: usize,
    pub tracks_missing_song: usize,
    pub duplicate_dates: usize,
    pub playlists_missing_date: usize,
    pub playlists_missing_title: usize,
    pub malformed_records: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: AuditStats,
    pub passed: bool,
}
