use std::collections::HashMap;

use serde_json::Value;

use crate::model::{AuditStats, ValidationReport};

const SHOWN_ISSUES: usize = 20;
const SHOWN_WARNINGS: usize = 10;

/// One persisted record as read back, identified by its file name.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: String,
    /// Parsed JSON, or the reason it could not be read.
    pub content: Result<Value, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consolidated {
    Missing,
    Unreadable(String),
    /// Number of records the consolidated collection declares.
    Loaded(usize),
}

/// A stable, fully written view of the archive.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Where the records came from, for messages.
    pub location: String,
    pub records: Vec<StoredRecord>,
    pub consolidated: Consolidated,
}

/// Run every check over the snapshot. Findings are reported in scan order and
/// nothing short-circuits.
pub fn audit(snapshot: &Snapshot) -> ValidationReport {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut stats = AuditStats::default();
    let mut dates = DateIndex::default();

    if snapshot.records.is_empty() {
        issues.push(format!("No playlist records found in {}", snapshot.location));
    }

    for record in &snapshot.records {
        let id = record.id.as_str();
        let playlist = match &record.content {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                stats.malformed_records += 1;
                issues.push(format!("{}: record is not a JSON object", id));
                continue;
            }
            Err(e) => {
                stats.malformed_records += 1;
                issues.push(format!("{}: Invalid JSON - {}", id, e));
                continue;
            }
        };
        stats.total_playlists += 1;

        match non_empty_str(playlist.get("date")) {
            Some(date) => dates.insert(date, id),
            None => {
                stats.playlists_missing_date += 1;
                issues.push(format!("{}: Missing date", id));
            }
        }

        if non_empty_str(playlist.get("title")).is_none() {
            stats.playlists_missing_title += 1;
            warnings.push(format!("{}: Missing title", id));
        }

        let tracks: &[Value] = match playlist.get("tracks") {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items,
            Some(_) => {
                issues.push(format!("{}: tracks is not a list", id));
                continue;
            }
        };
        stats.total_tracks += tracks.len();

        if tracks.is_empty() {
            stats.empty_playlists += 1;
            issues.push(format!("{}: Empty playlist (0 tracks)", id));
        }

        for (i, track) in tracks.iter().enumerate() {
            let n = i + 1;
            let Value::Object(track) = track else {
                issues.push(format!("{}: Track #{} is not a valid object", id, n));
                continue;
            };
            if ["artist", "song"].iter().any(|k| !is_text_or_absent(track.get(*k))) {
                issues.push(format!("{}: Track #{} has a non-text artist or song", id, n));
                continue;
            }
            if non_empty_str(track.get("artist")).is_none() {
                stats.tracks_missing_artist += 1;
                warnings.push(format!("{}: Track #{} missing artist", id, n));
            }
            if non_empty_str(track.get("song")).is_none() {
                stats.tracks_missing_song += 1;
                warnings.push(format!("{}: Track #{} missing song", id, n));
            }
        }
    }

    for (date, ids) in dates.duplicates() {
        stats.duplicate_dates += 1;
        issues.push(format!("Duplicate date {}: {}", date, ids.join(", ")));
    }

    match &snapshot.consolidated {
        Consolidated::Missing => {
            warnings.push("Consolidated file not found".to_string());
        }
        Consolidated::Unreadable(e) => {
            issues.push(format!("Error reading consolidated file: {}", e));
        }
        Consolidated::Loaded(n) if *n != stats.total_playlists => {
            issues.push(format!(
                "Consolidated file mismatch: Has {} playlists but found {} individual files",
                n, stats.total_playlists
            ));
        }
        Consolidated::Loaded(_) => {}
    }

    ValidationReport {
        passed: issues.is_empty(),
        issues,
        warnings,
        stats,
    }
}

/// Absent, null or a string. Anything else is a malformed field.
fn is_text_or_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null) | Some(Value::String(_)))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

/// Dates in first-seen order, each with every record that claimed it.
#[derive(Default)]
struct DateIndex<'a> {
    order: Vec<&'a str>,
    ids: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> DateIndex<'a> {
    fn insert(&mut self, date: &'a str, id: &'a str) {
        match self.ids.get_mut(date) {
            Some(ids) => ids.push(id),
            None => {
                self.order.push(date);
                self.ids.insert(date, vec![id]);
            }
        }
    }

    fn duplicates(&self) -> Vec<(&'a str, &[&'a str])> {
        self.order
            .iter()
            .filter_map(|d| {
                let ids = self.ids.get(d)?;
                (ids.len() > 1).then_some((*d, ids.as_slice()))
            })
            .collect()
    }
}

/// Human-readable summary, capped at the first few issues and warnings.
pub fn render_report(report: &ValidationReport) -> String {
    let s = &report.stats;
    let mut out = String::new();
    out.push_str("Validation Report\n");
    out.push_str(&"=".repeat(70));
    out.push('\n');
    out.push_str(&format!("Total playlists validated: {}\n", s.total_playlists));
    out.push_str(&format!("Total tracks: {}\n", s.total_tracks));
    if s.total_playlists > 0 {
        out.push_str(&format!(
            "Average tracks per playlist: {:.1}\n",
            s.total_tracks as f64 / s.total_playlists as f64
        ));
    }

    if report.issues.is_empty() {
        out.push_str("\nNo critical issues found.\n");
    } else {
        out.push_str(&format!("\nFound {} critical issues:\n", report.issues.len()));
        push_capped(&mut out, &report.issues, SHOWN_ISSUES, "issues");
    }

    if report.warnings.is_empty() {
        out.push_str("\nNo warnings.\n");
    } else {
        out.push_str(&format!("\nFound {} warnings:\n", report.warnings.len()));
        push_capped(&mut out, &report.warnings, SHOWN_WARNINGS, "warnings");
    }

    let counters = [
        ("Empty playlists", s.empty_playlists),
        ("Tracks missing artist", s.tracks_missing_artist),
        ("Tracks missing song", s.tracks_missing_song),
        ("Duplicate dates", s.duplicate_dates),
        ("Malformed records", s.malformed_records),
    ];
    let nonzero: Vec<_> = counters.iter().filter(|(_, n)| *n > 0).collect();
    if !nonzero.is_empty() {
        out.push('\n');
        for (label, n) in nonzero {
            out.push_str(&format!("{}: {}\n", label, n));
        }
    }

    out.push_str(if report.passed {
        "\nValidation PASSED\n"
    } else {
        "\nValidation FAILED\n"
    });
    out
}

fn push_capped(out: &mut String, items: &[String], max: usize, noun: &str) {
    for item in items.iter().take(max) {
        out.push_str(&format!("  {}\n", item));
    }
    if items.len() > max {
        out.push_str(&format!("  ... and {} more {}\n", items.len() - max, noun));
    }
}

// ── Tests ──
