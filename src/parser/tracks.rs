use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::lines::{is_byline, is_noise, strip_ordinal};
use crate::config::Thresholds;
use crate::model::{Origin, Track};

static DASH_QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(.+?)\s*[-–—]\s*["“](.+?)["”]"#).unwrap());
static DASH_PLAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*[-–—]\s*(.+?)(?:\s+from\s+.+)?$").unwrap());
static FROM_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+from\s+.+$").unwrap());
static QUOTED_FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["“](.+?)["”]\s+from\s+(.+)$"#).unwrap());
static QUOTED_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["“](.+?)["”]\s*$"#).unwrap());
static COMMA_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+?),\s+(.+)$").unwrap());

const QUOTE_CHARS: &[char] = &['"', '\'', '“', '”', '‘', '’'];
const OPENING_QUOTES: &[char] = &['"', '“'];
const CLOSING_QUOTES: &[char] = &['"', '”'];

/// Per-document context shared by every line of one track zone.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    pub show_title: &'a str,
    /// Performer implied by the title, see [`super::title::infer_single_artist`].
    pub inferred_artist: Option<&'a str>,
    /// Tracks already accepted in this document.
    pub tracks_so_far: usize,
    pub origin: Origin,
    pub thresholds: &'a Thresholds,
}

impl LineContext<'_> {
    fn single_artist(&self) -> &str {
        self.inferred_artist.unwrap_or(self.show_title)
    }

    fn within_bounds(&self, artist: &str, song: &str) -> bool {
        artist.chars().count() < self.thresholds.max_artist_len
            && song.chars().count() < self.thresholds.max_song_len
    }
}

/// One step of the cascade. `apply` returns `None` when the rule does not
/// match, and the line moves on to the next rule.
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&str, &LineContext) -> Option<Track>,
}

/// Most specific shape first.
pub static RULES: &[Rule] = &[
    Rule { name: "dash_quoted", apply: dash_quoted },
    Rule { name: "dash_plain", apply: dash_plain },
    Rule { name: "quoted_from_album", apply: quoted_from_album },
    Rule { name: "quoted_only", apply: quoted_only },
    Rule { name: "open_quote", apply: open_quote },
    Rule { name: "artist_comma_album", apply: artist_comma_album },
    Rule { name: "bare_song", apply: bare_song },
];

/// Parse one track-candidate line. Never fails; noise and leftovers yield `None`.
pub fn parse_line(line: &str, ctx: &LineContext) -> Option<Track> {
    let line = line.trim();
    if line.is_empty() || is_noise(line, ctx.origin, ctx.thresholds) {
        return None;
    }
    let line = strip_ordinal(line).trim();
    if line.is_empty() {
        return None;
    }

    RULES.iter().find_map(|rule| {
        let track = (rule.apply)(line, ctx)?;
        debug!(rule = rule.name, artist = %track.artist, song = %track.song, "track line");
        Some(track)
    })
}

/// `Artist - "Song"`
fn dash_quoted(line: &str, _ctx: &LineContext) -> Option<Track> {
    let caps = DASH_QUOTED_RE.captures(line)?;
    let song = caps[2].trim();
    if song.is_empty() {
        return None;
    }
    Some(Track::new(caps[1].trim(), song))
}

/// `Artist - Song`, optionally followed by `from <album>`.
fn dash_plain(line: &str, ctx: &LineContext) -> Option<Track> {
    let caps = DASH_PLAIN_RE.captures(line)?;
    let artist = caps[1].trim();
    let song = FROM_TAIL_RE.replace(caps[2].trim(), "");
    let song = song.trim();
    if artist.is_empty() || song.is_empty() || !ctx.within_bounds(artist, song) {
        return None;
    }
    Some(Track::new(artist, song))
}

/// `"Song" from Album` on a single-artist show.
fn quoted_from_album(line: &str, ctx: &LineContext) -> Option<Track> {
    let caps = QUOTED_FROM_RE.captures(line)?;
    let song = caps[1].trim();
    if song.is_empty() {
        return None;
    }
    Some(Track::new(ctx.show_title, song))
}

/// `"Song"` and nothing else.
fn quoted_only(line: &str, ctx: &LineContext) -> Option<Track> {
    let caps = QUOTED_ONLY_RE.captures(line)?;
    let song = caps[1].trim();
    if song.is_empty() {
        return None;
    }
    Some(Track::new(ctx.single_artist(), song))
}

/// `"Song` with a missing or odd closing quote, or trailing text after it
/// (`"Song" (live)`).
fn open_quote(line: &str, ctx: &LineContext) -> Option<Track> {
    if !line.starts_with(OPENING_QUOTES) {
        return None;
    }
    let inner = line.trim_start_matches(OPENING_QUOTES);
    let quoted = match inner.find(CLOSING_QUOTES) {
        Some(end) => &inner[..end],
        None => inner,
    };
    let song = quoted.trim().trim_matches(QUOTE_CHARS).trim();
    if song.is_empty() {
        return None;
    }
    Some(Track::new(ctx.single_artist(), song))
}

/// `Artist, Album` from year-end lists, capped so prose with commas doesn't
/// turn into a long fake list.
fn artist_comma_album(line: &str, ctx: &LineContext) -> Option<Track> {
    if ctx.tracks_so_far >= ctx.thresholds.list_track_cap {
        return None;
    }
    let caps = COMMA_PAIR_RE.captures(line)?;
    let artist = caps[1].trim();
    let album = caps[2].trim();
    if artist.is_empty() || album.is_empty() || !ctx.within_bounds(artist, album) {
        return None;
    }
    Some(Track::new(artist, album))
}

/// Whole line as the song title.
fn bare_song(line: &str, ctx: &LineContext) -> Option<Track> {
    if line.chars().count() <= ctx.thresholds.fallback_min_len || is_byline(line) {
        return None;
    }
    Some(Track::new(ctx.show_title, line))
}
