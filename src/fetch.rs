use std::path::Path;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Thresholds;
use crate::error::{Error, Result};
use crate::html::html_to_document;
use crate::model::RawDocument;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One show the archive is known to be missing.
#[derive(Debug, Clone, Deserialize)]
pub struct GapEntry {
    pub url: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl GapEntry {
    pub fn from_url(url: impl Into<String>) -> Self {
        GapEntry {
            url: url.into(),
            date: None,
            title: None,
        }
    }

    /// `2015-01-03 - Jazz Giants` for progress output, the URL when neither is known.
    pub fn label(&self) -> String {
        match (self.date.as_deref(), self.title.as_deref()) {
            (Some(d), Some(t)) => format!("{} - {}", d, t),
            (Some(s), None) | (None, Some(s)) => s.to_string(),
            (None, None) => self.url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GapAnalysis {
    #[serde(default)]
    missing: Vec<GapEntry>,
}

/// Read the `missing` list of a gap-analysis file.
pub fn load_gap_list(path: &Path) -> Result<Vec<GapEntry>> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let gaps: GapAnalysis = serde_json::from_str(&text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(gaps.missing)
}

pub fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

/// GET a page and return its body. Non-2xx statuses are errors.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    info!("Fetching {}", url);
    let start = Instant::now();
    let result = async {
        let resp = client.get(url).send().await?.error_for_status()?;
        resp.text().await
    }
    .await;

    match result {
        Ok(body) => {
            info!(
                "Fetched {} ({} bytes, {} ms)",
                url,
                body.len(),
                start.elapsed().as_millis()
            );
            Ok(body)
        }
        Err(e) => {
            warn!("Failed to fetch {}: {}", url, e);
            Err(e.into())
        }
    }
}

/// Fetch an article and reduce it to a web-origin document.
pub async fn fetch_document(
    client: &reqwest::Client,
    url: &str,
    th: &Thresholds,
) -> Result<RawDocument> {
    let html = fetch_page(client, url).await?;
    html_to_document(&html, url, th)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_list_reads_missing_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gap_analysis.json");
        std::fs::write(
            &path,
            r#"{
  "total_found": 3,
  "missing": [
    {"url": "https://www.kcur.org/arts-life/2015-01-03/jazz-giants", "date": "2015-01-03", "title": "Jazz Giants"},
    {"url": "https://www.kcur.org/arts-life/2016-04-23/prince"}
  ]
}"#,
        )
        .unwrap();

        let gaps = load_gap_list(&path).unwrap();
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].title.as_deref(), Some("Jazz Giants"));
        assert_eq!(gaps[1].date, None);
    }

    #[test]
    fn gap_labels() {
        let mut entry = GapEntry::from_url("https://www.kcur.org/arts-life/2015-01-03/jazz-giants");
        assert_eq!(entry.label(), "https://www.kcur.org/arts-life/2015-01-03/jazz-giants");
        entry.date = Some("2015-01-03".to_string());
        assert_eq!(entry.label(), "2015-01-03");
        entry.title = Some("Jazz Giants".to_string());
        assert_eq!(entry.label(), "2015-01-03 - Jazz Giants");
    }

    #[test]
    fn gap_list_without_missing_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gap_analysis.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(load_gap_list(&path).unwrap().is_empty());
    }

    #[test]
    fn gap_list_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = load_gap_list(&tmp.path().join("nope.json"));
        assert!(matches!(missing, Err(Error::Io { .. })));

        let bad = tmp.path().join("bad.json");
        std::fs::write(&bad, "[").unwrap();
        assert!(matches!(load_gap_list(&bad), Err(Error::Json { .. })));
    }

    #[test]
    fn client_builds() {
        assert!(client().is_ok());
    }
}
