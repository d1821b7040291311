use tracing::debug;

use super::lines::{classify_lines, is_credit, is_list_shaped, is_marker_heading, Line};
use crate::config::Thresholds;
use crate::error::{Error, Result};
use crate::model::Origin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// A marker line splits description from tracks.
    Marker,
    /// No marker, but the early lines all read `Artist, Album`.
    SimpleList,
    /// Neither; everything is description.
    Unstructured,
}

#[derive(Debug, Clone)]
pub struct Sections {
    pub title: String,
    pub description: String,
    pub track_lines: Vec<String>,
    pub layout: Layout,
}

/// Split a document into title, description and track-candidate lines.
///
/// The title is the hint when one is given, otherwise the first non-empty
/// line. Errors only when there is no text and no hint at all.
pub fn segment(
    text: &str,
    title_hint: Option<&str>,
    origin: Origin,
    th: &Thresholds,
) -> Result<Sections> {
    let lines = classify_lines(text, th);
    let hint = title_hint.map(str::trim).filter(|t| !t.is_empty());

    let (title, body) = match hint {
        Some(t) => (t.to_string(), &lines[..]),
        None => {
            let idx = lines
                .iter()
                .position(|l| *l != Line::Blank)
                .ok_or(Error::EmptyDocument)?;
            (line_text(&lines[idx]).to_string(), &lines[idx + 1..])
        }
    };

    let mut description = Vec::new();
    let mut track_lines = Vec::new();

    let layout = if let Some(pos) = body.iter().position(|l| matches!(l, Line::Marker(_))) {
        for line in &body[..pos] {
            if let Line::Text(t) = line {
                if !is_credit(t) {
                    description.push(t.as_str());
                }
            }
        }
        for line in &body[pos + 1..] {
            match line {
                Line::Marker(t) if is_marker_heading(t, th) => {}
                Line::Text(t) | Line::Marker(t) => track_lines.push(t.clone()),
                _ => {}
            }
        }
        Layout::Marker
    } else if is_simple_list(body, th) {
        for line in body {
            if let Line::Text(t) = line {
                if is_list_shaped(t) {
                    track_lines.push(t.clone());
                } else if !is_credit(t) {
                    description.push(t.as_str());
                }
            }
        }
        Layout::SimpleList
    } else {
        for line in body {
            if let Line::Text(t) = line {
                if !is_credit(t) {
                    description.push(t.as_str());
                }
            }
        }
        Layout::Unstructured
    };

    let mut description = description.join(" ").trim().to_string();
    if origin == Origin::Web {
        description = truncate_chars(&description, th.description_cap);
    }

    debug!(
        ?layout,
        title = %title,
        tracks = track_lines.len(),
        "segmented document"
    );

    Ok(Sections {
        title,
        description,
        track_lines,
        layout,
    })
}

/// Sample the configured window of body lines; every retained line in it must
/// be list-shaped, and there must be at least one.
fn is_simple_list(body: &[Line], th: &Thresholds) -> bool {
    let end = th.simple_list_sample_end.min(body.len());
    let start = th.simple_list_sample_start.min(end);
    let sample: Vec<&Line> = body[start..end]
        .iter()
        .filter(|l| !l.is_droppable())
        .collect();
    !sample.is_empty() && sample.iter().all(|l| is_list_shaped(line_text(l)))
}

fn line_text(line: &Line) -> &str {
    match line {
        Line::Blank => "",
        Line::Byline(t) | Line::Boilerplate(t) | Line::Marker(t) | Line::Text(t) => t,
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str) -> Sections {
        segment(text, None, Origin::TextFile, &Thresholds::default()).unwrap()
    }

    #[test]
    fn marker_splits_description_and_tracks() {
        let s = seg("Prince Tribute\nBy Someone\n\nA night of purple.\nCREDIT: AP\nTrack List:\n\"Purple Rain\"\n\"Kiss\"\nTweet");
        assert_eq!(s.layout, Layout::Marker);
        assert_eq!(s.title, "Prince Tribute");
        assert_eq!(s.description, "A night of purple.");
        assert_eq!(s.track_lines, vec!["\"Purple Rain\"", "\"Kiss\""]);
    }

    #[test]
    fn repeated_marker_heading_skipped_but_titles_kept() {
        let s = seg("Show\nIntro\nPlaylist\nThe Miracles - The Tracks of My Tears\nPlaylist:\nSam Cooke - Wonderful World");
        assert_eq!(
            s.track_lines,
            vec![
                "The Miracles - The Tracks of My Tears",
                "Sam Cooke - Wonderful World"
            ]
        );
    }

    #[test]
    fn simple_list_without_marker() {
        let text = std::fs::read_to_string("tests/fixtures/2009-12-12.txt").unwrap();
        let s = seg(&text);
        assert_eq!(s.layout, Layout::SimpleList);
        assert!(s.track_lines.len() >= 7);
        assert!(s.track_lines.iter().all(|l| is_list_shaped(l)));
    }

    #[test]
    fn broken_sample_is_not_simple_list() {
        let s = seg("Best of 2010\nBy Host\nArcade Fire, The Suburbs\nJanelle Monae, The ArchAndroid\nJust some prose here\nThe National, High Violet\nBeach House, Teen Dream");
        assert_ne!(s.layout, Layout::SimpleList);
        assert!(s.track_lines.is_empty());
    }

    #[test]
    fn simple_list_routes_odd_lines_to_description() {
        let s = seg("Best of 2010\n\nArcade Fire, The Suburbs\nJanelle Monae, The ArchAndroid\nThe National, High Violet\nBeach House, Teen Dream\nVampire Weekend, Contra\nLCD Soundsystem, This Is Happening\nHappy new year everybody");
        assert_eq!(s.layout, Layout::SimpleList);
        assert_eq!(s.description, "Happy new year everybody");
        assert_eq!(s.track_lines.len(), 6);
    }

    #[test]
    fn unstructured_is_all_description() {
        let s = seg("Just a Title\nSome words.\nMore words.");
        assert_eq!(s.layout, Layout::Unstructured);
        assert_eq!(s.description, "Some words. More words.");
        assert!(s.track_lines.is_empty());
    }

    #[test]
    fn title_only_yields_empty_sections() {
        let s = seg("\n\nLonely Title\n\n");
        assert_eq!(s.title, "Lonely Title");
        assert!(s.description.is_empty());
        assert!(s.track_lines.is_empty());
    }

    #[test]
    fn empty_input_is_contract_violation() {
        let err = segment("  \n\n", None, Origin::TextFile, &Thresholds::default());
        assert!(matches!(err, Err(Error::EmptyDocument)));
    }

    #[test]
    fn hint_keeps_first_line_in_body() {
        let s = segment(
            "Opening words.\nTracks\nMiles Davis - \"So What\"",
            Some("Kind of Blue"),
            Origin::Web,
            &Thresholds::default(),
        )
        .unwrap();
        assert_eq!(s.title, "Kind of Blue");
        assert_eq!(s.description, "Opening words.");
        assert_eq!(s.track_lines.len(), 1);
    }

    #[test]
    fn web_description_truncated_text_file_not() {
        let long = "é".repeat(800);
        let text = format!("Title\n{}\nPlaylist\nA - B", long);
        let th = Thresholds::default();

        let web = segment(&text, None, Origin::Web, &th).unwrap();
        assert_eq!(web.description.chars().count(), 500);

        let file = segment(&text, None, Origin::TextFile, &th).unwrap();
        assert_eq!(file.description.chars().count(), 800);
    }

    #[test]
    fn inverted_sample_window_is_empty() {
        let th = Thresholds {
            simple_list_sample_start: 9,
            simple_list_sample_end: 3,
            ..Thresholds::default()
        };
        let text = std::fs::read_to_string("tests/fixtures/2009-12-12.txt").unwrap();
        let s = segment(&text, None, Origin::TextFile, &th).unwrap();
        assert_eq!(s.layout, Layout::Unstructured);
        assert!(s.track_lines.is_empty());
    }
}
