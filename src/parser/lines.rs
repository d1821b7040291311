use std::sync::LazyLock;

use regex::Regex;

use crate::config::Thresholds;
use crate::model::Origin;

static ORDINAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());
static LIST_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^,]+,\s+.+$").unwrap());

/// What a single trimmed line of a document is, before any track parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    Byline(String),
    /// Social-share labels and other fixed page chrome.
    Boilerplate(String),
    /// A line that opens the track zone ("Track List:", "Tonight's playlist").
    Marker(String),
    Text(String),
}

impl Line {
    pub fn is_droppable(&self) -> bool {
        matches!(self, Line::Blank | Line::Byline(_) | Line::Boilerplate(_))
    }
}

pub fn classify_lines(text: &str, th: &Thresholds) -> Vec<Line> {
    text.lines().map(|l| classify_line(l, th)).collect()
}

pub fn classify_line(raw: &str, th: &Thresholds) -> Line {
    let line = raw.trim();
    if line.is_empty() {
        Line::Blank
    } else if is_byline(line) {
        Line::Byline(line.to_string())
    } else if th.boilerplate_lines.iter().any(|b| b == line) {
        Line::Boilerplate(line.to_string())
    } else if contains_marker(line, th) {
        Line::Marker(line.to_string())
    } else {
        Line::Text(line.to_string())
    }
}

pub fn is_byline(line: &str) -> bool {
    line.starts_with("By ")
}

/// Case-insensitive substring hit against any section marker.
pub fn contains_marker(line: &str, th: &Thresholds) -> bool {
    let lower = line.to_lowercase();
    th.markers.iter().any(|m| lower.contains(m.as_str()))
}

/// A line that is nothing but a marker ("Track List", "Playlist:").
pub fn is_marker_heading(line: &str, th: &Thresholds) -> bool {
    let lower = line.trim().to_lowercase();
    let bare = lower.trim_end_matches(':').trim_end();
    th.markers.iter().any(|m| m == bare)
}

/// Photo credits, share buttons and similar page noise. Pasted notes only
/// carry credit lines, so their keyword set is much narrower.
pub fn is_noise(line: &str, origin: Origin, th: &Thresholds) -> bool {
    let lower = line.to_lowercase();
    th.noise_keywords(origin).iter().any(|k| lower.contains(k.as_str()))
}

pub fn is_credit(line: &str) -> bool {
    line.starts_with("CREDIT")
}

/// Drop a leading "12. " list ordinal.
pub fn strip_ordinal(line: &str) -> &str {
    match ORDINAL_RE.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// `<text>, <text>` as used by year-end best-of lists.
pub fn is_list_shaped(line: &str) -> bool {
    LIST_SHAPE_RE.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn th() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn blank_and_byline() {
        assert_eq!(classify_line("   ", &th()), Line::Blank);
        assert!(matches!(classify_line("By Bill Shapiro", &th()), Line::Byline(_)));
        // "By" without the space is a title, not a byline
        assert!(matches!(classify_line("Bye Bye Love", &th()), Line::Text(_)));
    }

    #[test]
    fn boilerplate_is_exact_match() {
        assert!(matches!(classify_line("Tweet", &th()), Line::Boilerplate(_)));
        assert!(matches!(classify_line("Google+", &th()), Line::Boilerplate(_)));
        assert!(classify_line("Email", &th()).is_droppable());
        assert!(!classify_line("Emailed Letters", &th()).is_droppable());
    }

    #[test]
    fn marker_any_case() {
        assert!(matches!(classify_line("TRACK LIST:", &th()), Line::Marker(_)));
        assert!(matches!(classify_line("Here's tonight's Playlist", &th()), Line::Marker(_)));
        assert!(matches!(classify_line("Tracklist", &th()), Line::Marker(_)));
    }

    #[test]
    fn marker_heading_only_bare() {
        assert!(is_marker_heading("Track List:", &th()));
        assert!(is_marker_heading("  playlist ", &th()));
        assert!(!is_marker_heading("The Tracks of My Tears", &th()));
    }

    #[test]
    fn noise_keywords() {
        assert!(is_noise("Photo: Flickr user", Origin::Web, &th()));
        assert!(is_noise("CREDIT Jane Doe", Origin::Web, &th()));
        assert!(is_noise("Share this story", Origin::Web, &th()));
        assert!(!is_noise("Van Morrison - Madame George", Origin::Web, &th()));
    }

    #[test]
    fn text_noise_is_narrow() {
        assert!(is_noise("Credit: Jane Doe", Origin::TextFile, &th()));
        assert!(is_noise("photo via FLICKR", Origin::TextFile, &th()));
        assert!(!is_noise("Ringo Starr - \"Photograph\"", Origin::TextFile, &th()));
        assert!(!is_noise("Al Green - Share Your Love With Me", Origin::TextFile, &th()));
    }

    #[test]
    fn ordinal_prefix() {
        assert_eq!(strip_ordinal("3. \"Kiss\""), "\"Kiss\"");
        assert_eq!(strip_ordinal("12.Song"), "Song");
        assert_eq!(strip_ordinal("1999"), "1999");
        assert_eq!(strip_ordinal("7. "), "");
    }

    #[test]
    fn list_shape() {
        assert!(is_list_shaped("The Beatles, Abbey Road"));
        assert!(!is_list_shaped("The Beatles,Abbey Road"));
        assert!(!is_list_shaped("Abbey Road"));
        assert!(!is_list_shaped(", Abbey Road"));
    }
}
