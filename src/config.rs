use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::model::Origin;

const CONFIG_BASENAME: &str = "playlist_archive";
const ENV_PREFIX: &str = "PLAYLIST";

/// Heuristic cut-offs for segmentation and the track cascade. All of these
/// were tuned against the archive, none of them are structural.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Artist segments must be strictly shorter than this (chars).
    pub max_artist_len: usize,
    /// Song / album segments must be strictly shorter than this (chars).
    pub max_song_len: usize,
    /// `Artist, Album` lines only count while fewer tracks than this were found.
    pub list_track_cap: usize,
    /// The bare-song fallback needs strictly more chars than this.
    pub fallback_min_len: usize,
    /// Description cap for web-derived documents (chars).
    pub description_cap: usize,
    /// Raw line window `[start, end)` sampled for the simple-list layout.
    pub simple_list_sample_start: usize,
    pub simple_list_sample_end: usize,
    /// A web `ul`/`ol` needs this many items to be taken as a track list.
    pub min_list_items: usize,
    /// Web track-candidate lines shorter than this are dropped.
    pub min_web_line_len: usize,
    pub markers: Vec<String>,
    /// Track lines from pasted show notes containing any of these are dropped.
    pub text_noise_keywords: Vec<String>,
    /// Same for web pages, where share buttons and image captions leak in.
    pub web_noise_keywords: Vec<String>,
    pub boilerplate_lines: Vec<String>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            max_artist_len: 50,
            max_song_len: 100,
            list_track_cap: 20,
            fallback_min_len: 3,
            description_cap: 500,
            simple_list_sample_start: 2,
            simple_list_sample_end: 7,
            min_list_items: 3,
            min_web_line_len: 5,
            markers: strings(&["track list", "tracklist", "tracks", "playlist"]),
            text_noise_keywords: strings(&["credit", "flickr"]),
            web_noise_keywords: strings(&[
                "credit", "photo", "flickr", "image", "listen", "share", "tweet",
            ]),
            boilerplate_lines: strings(&["Cyprus Avenue", "Tweet", "Share", "Google+", "Email"]),
        }
    }
}

impl Thresholds {
    pub fn noise_keywords(&self, origin: Origin) -> &[String] {
        match origin {
            Origin::TextFile => &self.text_noise_keywords,
            Origin::Web => &self.web_noise_keywords,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub txt_dir: PathBuf,
    pub json_dir: PathBuf,
    pub consolidated_path: PathBuf,
    /// Recorded as `source_url` for text-file documents, which carry no URL.
    pub default_source_url: String,
    /// Pause between consecutive page fetches.
    pub request_delay_ms: u64,
    pub thresholds: Thresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            txt_dir: PathBuf::from("txt"),
            json_dir: PathBuf::from("json/individual"),
            consolidated_path: PathBuf::from("json/playlists.json"),
            default_source_url: "https://www.kcur.org/tags/cyprus-avenue".to_string(),
            request_delay_ms: 1000,
            thresholds: Thresholds::default(),
        }
    }
}

impl Settings {
    /// Defaults, then the config file, then `PLAYLIST_*` env vars
    /// (`__` separates nested keys, e.g. `PLAYLIST_THRESHOLDS__MAX_ARTIST_LEN`).
    ///
    /// Without an explicit path, `playlist_archive.{toml,json,yaml}` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(CONFIG_BASENAME).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
