//! Turns a fetched article page into plain text lines for the parser.
//!
//! The page title becomes the title hint and the URL supplies the date hint.
//! Only the article body is kept, with scripts, navigation and page chrome
//! removed. Block elements end a line. When the body has no marker line but
//! does carry a real list (`ul`/`ol` with enough items), a synthetic
//! `Track List` heading is placed in front of it so the segmenter sees the
//! same shape as in a pasted text file.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::assemble::date_from_url;
use crate::config::Thresholds;
use crate::error::{Error, Result};
use crate::model::RawDocument;
use crate::parser::lines::contains_marker;

const TITLE_CSS: &str = "h1";
const FALLBACK_TITLE_CSS: &str = r#"h2[class*="title"], h2[class*="headline"]"#;
const BODY_CSS: &[&str] = &[
    r#"div[class*="article-body"], div[class*="content"], div[class*="description"], div[class*="body"]"#,
    "article",
    "body",
];

const SKIPPED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "noscript", "h1"];
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "br", "h2", "h3", "h4", "h5", "h6", "tr", "table",
    "blockquote", "section", "article", "pre", "figure", "figcaption",
];
const IMPLICIT_MARKER: &str = "Track List";

pub fn html_to_document(html: &str, url: &str, th: &Thresholds) -> Result<RawDocument> {
    let doc = Html::parse_document(html);

    let title = match first_text(&doc, TITLE_CSS)? {
        Some(t) => Some(t),
        None => first_text(&doc, FALLBACK_TITLE_CSS)?,
    }
    .filter(|t| !t.is_empty());

    let body = BODY_CSS
        .iter()
        .map(|css| selector(css))
        .collect::<Result<Vec<_>>>()?
        .iter()
        .find_map(|sel| doc.select(sel).next())
        .unwrap_or_else(|| doc.root_element());

    let mut writer = LineWriter::default();
    walk(body, &mut writer, th);
    let (mut lines, list_start) = writer.finish();

    if !lines.iter().any(|l| contains_marker(l, th)) {
        if let Some(idx) = list_start {
            debug!(url, "using first list as track list");
            lines.insert(idx, IMPLICIT_MARKER.to_string());
        }
    }

    Ok(RawDocument {
        text: lines.join("\n"),
        date_hint: date_from_url(url),
        title_hint: title,
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector(format!("{}: {:?}", css, e)))
}

fn first_text(doc: &Html, css: &str) -> Result<Option<String>> {
    let sel = selector(css)?;
    Ok(doc.select(&sel).next().map(|el| collapse(&el.text().collect::<String>())))
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
struct LineWriter {
    lines: Vec<String>,
    current: String,
    /// Line index where the first qualifying list begins.
    list_start: Option<usize>,
}

impl LineWriter {
    fn push_text(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn break_line(&mut self) {
        let line = collapse(&self.current);
        if !line.is_empty() {
            self.lines.push(line);
        }
        self.current.clear();
    }

    fn finish(mut self) -> (Vec<String>, Option<usize>) {
        self.break_line();
        (self.lines, self.list_start)
    }
}

fn walk(el: ElementRef, out: &mut LineWriter, th: &Thresholds) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if SKIPPED_TAGS.contains(&name) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.break_line();
            }
            if out.list_start.is_none() && is_track_list(child_el, th) {
                out.list_start = Some(out.lines.len());
            }
            walk(child_el, out, th);
            if block {
                out.break_line();
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_text(text);
        }
    }
}

fn is_track_list(el: ElementRef, th: &Thresholds) -> bool {
    let name = el.value().name();
    if name != "ul" && name != "ol" {
        return false;
    }
    let items = el
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|c| c.value().name() == "li")
        .count();
    items >= th.min_list_items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn th() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn article_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/jazz-giants.html").unwrap();
        let doc = html_to_document(&html, "https://www.kcur.org/arts-life/2015-01-03/jazz-giants", &th()).unwrap();
        assert_eq!(doc.title_hint.as_deref(), Some("Jazz Giants"));
        assert_eq!(doc.date_hint.as_deref(), Some("2015-01-03"));
        assert!(doc.text.contains("Miles Davis - \"So What\""));
        assert!(!doc.text.contains("trackPageview"));
        assert!(!doc.text.contains("Site navigation"));
        assert!(!doc.text.contains("Footer links"));
    }

    #[test]
    fn inline_markup_joins_and_blocks_split() {
        let html = "<html><body><div class=\"article-body\"><p><b>Miles</b> Davis - <i>\"So What\"</i></p><p>Next</p></div></body></html>";
        let doc = html_to_document(html, "https://x/2015-01-03/y", &th()).unwrap();
        assert_eq!(doc.text, "Miles Davis - \"So What\"\nNext");
        assert_eq!(doc.title_hint, None);
    }

    #[test]
    fn list_without_marker_gets_heading() {
        let html = "<html><body><article><h1>Soul Night</h1><p>Intro text here.</p><ul><li>Sam Cooke - Wonderful World</li><li>Otis Redding - Try a Little Tenderness</li><li>Aretha Franklin - Respect</li></ul></article></body></html>";
        let doc = html_to_document(html, "https://x/2015-01-03/y", &th()).unwrap();
        assert_eq!(doc.title_hint.as_deref(), Some("Soul Night"));
        let lines: Vec<&str> = doc.text.lines().collect();
        assert_eq!(lines[0], "Intro text here.");
        assert_eq!(lines[1], "Track List");
        assert_eq!(lines[2], "Sam Cooke - Wonderful World");
    }

    #[test]
    fn short_list_is_not_a_track_list() {
        let html = "<html><body><article><p>Words.</p><ul><li>One thing</li><li>Another</li></ul></article></body></html>";
        let doc = html_to_document(html, "https://x/nodate/y", &th()).unwrap();
        assert!(!doc.text.contains("Track List"));
        assert_eq!(doc.date_hint, None);
    }
}
