use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::assemble::date_from_filename;
use crate::audit::{Consolidated, Snapshot, StoredRecord};
use crate::error::{Error, Result};
use crate::model::{PlaylistRecord, RawDocument};

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn json_err(path: &Path) -> impl FnOnce(serde_json::Error) -> Error + '_ {
    move |source| Error::Json {
        path: path.to_path_buf(),
        source,
    }
}

/// Files in `dir` with the given extension, sorted by name.
fn files_with_ext(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_err(dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == ext))
        .collect();
    files.sort();
    Ok(files)
}

pub fn list_txt_files(dir: &Path) -> Result<Vec<PathBuf>> {
    files_with_ext(dir, "txt")
}

/// Read a pasted show-notes file. The date hint comes from the file name;
/// text files carry no title hint.
pub fn load_text_document(path: &Path) -> Result<RawDocument> {
    let text = fs::read_to_string(path).map_err(io_err(path))?;
    let date_hint = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(date_from_filename);
    Ok(RawDocument {
        text,
        date_hint,
        title_hint: None,
    })
}

/// Write `<dir>/<date>.json`, replacing any earlier version of the same show.
pub fn save_record(dir: &Path, record: &PlaylistRecord) -> Result<PathBuf> {
    let date = record.date.as_deref().ok_or_else(|| Error::MissingDate {
        input: record.title.clone(),
    })?;
    fs::create_dir_all(dir).map_err(io_err(dir))?;

    let path = dir.join(format!("{}.json", date));
    let json = serde_json::to_string_pretty(record).map_err(json_err(&path))?;
    fs::write(&path, json).map_err(io_err(&path))?;
    Ok(path)
}

/// Rebuild the consolidated array from every individual record, ordered by
/// date with dateless records first. Unreadable files are left out and
/// logged; the auditor reports the resulting count mismatch.
pub fn rebuild_consolidated(dir: &Path, out: &Path) -> Result<usize> {
    let mut records = Vec::new();
    for path in files_with_ext(dir, "json")? {
        let parsed = fs::read_to_string(&path)
            .map_err(io_err(&path))
            .and_then(|s| serde_json::from_str::<PlaylistRecord>(&s).map_err(json_err(&path)));
        match parsed {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping {} in consolidated rebuild: {}", path.display(), e),
        }
    }

    // None < Some, so dateless records sort first
    records.sort_by(|a, b| a.date.cmp(&b.date));

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    let json = serde_json::to_string_pretty(&records).map_err(json_err(out))?;
    fs::write(out, json).map_err(io_err(out))?;

    info!("Rebuilt {} with {} playlists", out.display(), records.len());
    Ok(records.len())
}

/// Read the archive back for an audit. Never fails: a missing directory
/// yields no records and bad files are carried as per-record errors.
pub fn load_snapshot(dir: &Path, consolidated: &Path) -> Snapshot {
    let records = match files_with_ext(dir, "json") {
        Ok(files) => files.iter().map(|p| read_stored(p)).collect(),
        Err(e) => {
            warn!("{}", e);
            Vec::new()
        }
    };

    Snapshot {
        location: dir.display().to_string(),
        records,
        consolidated: read_consolidated(consolidated),
    }
}

fn read_stored(path: &Path) -> StoredRecord {
    let id = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let content = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str::<Value>(&s).map_err(|e| e.to_string()));
    StoredRecord { id, content }
}

fn read_consolidated(path: &Path) -> Consolidated {
    if !path.exists() {
        return Consolidated::Missing;
    }
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => return Consolidated::Unreadable(e.to_string()),
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(items)) => Consolidated::Loaded(items.len()),
        Ok(_) => Consolidated::Unreadable("not a JSON array".to_string()),
        Err(e) => Consolidated::Unreadable(e.to_string()),
    }
}
