use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::config::Thresholds;
use crate::error::{Error, Result};
use crate::model::{Origin, PlaylistRecord, RawDocument};
use crate::parser;

static FILENAME_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})\.txt$").unwrap());
static URL_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/(\d{4}-\d{2}-\d{2})/").unwrap());
static STRICT_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// `2015-01-03.txt` → `2015-01-03`.
pub fn date_from_filename(file_name: &str) -> Option<String> {
    let caps = FILENAME_DATE_RE.captures(file_name)?;
    strict_date(&caps[1])
}

/// `https://host/show/2015-01-03/slug` → `2015-01-03`.
pub fn date_from_url(url: &str) -> Option<String> {
    let caps = URL_DATE_RE.captures(url)?;
    strict_date(&caps[1])
}

/// Exactly `YYYY-MM-DD` and a real calendar day.
pub fn strict_date(s: &str) -> Option<String> {
    if !STRICT_DATE_RE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Build the persisted record for one document.
///
/// A document without a usable date is refused with [`Error::MissingDate`];
/// the caller skips it rather than storing a record with no key.
/// `archived` is the capture day, not the broadcast day.
pub fn assemble(
    doc: RawDocument,
    origin: Origin,
    source_url: &str,
    archived: NaiveDate,
    th: &Thresholds,
) -> Result<PlaylistRecord> {
    let date = doc
        .date_hint
        .as_deref()
        .and_then(strict_date)
        .ok_or_else(|| Error::MissingDate {
            input: doc
                .date_hint
                .clone()
                .unwrap_or_else(|| source_url.to_string()),
        })?;

    let parsed = parser::parse_document(&doc, origin, th)?;
    debug!(date = %date, tracks = parsed.tracks.len(), "assembled record");

    Ok(PlaylistRecord {
        date: Some(date),
        title: parsed.title,
        description: parsed.description,
        tracks: parsed.tracks,
        source_url: source_url.to_string(),
        archived_date: archived.format("%Y-%m-%d").to_string(),
    })
}
