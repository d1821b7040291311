use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use playlist_archive::assemble::assemble;
use playlist_archive::audit::{audit, render_report};
use playlist_archive::config::Settings;
use playlist_archive::error::Error;
use playlist_archive::model::{Origin, PlaylistRecord};
use playlist_archive::{fetch, store};

#[derive(Parser)]
#[command(name = "playlist_archive", about = "Cyprus Avenue playlist archive builder")]
struct Cli {
    /// Settings file (default: ./playlist_archive.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse every .txt show file into JSON records
    Parse {
        /// Directory of YYYY-MM-DD.txt files
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Directory for individual JSON records
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Consolidated JSON file to rebuild
        #[arg(long)]
        consolidated: Option<PathBuf>,
    },
    /// Fetch article pages and add them to the archive
    Fetch {
        /// Article URLs
        urls: Vec<String>,
        /// Gap-analysis JSON whose `missing` entries are fetched
        #[arg(long)]
        gaps: Option<PathBuf>,
    },
    /// Audit the stored archive (exit code 1 on critical issues)
    Validate {
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        consolidated: Option<PathBuf>,
    },
    /// Parse one text file and print the record, without saving
    Show {
        file: PathBuf,
        /// Use this show title instead of the first line
        #[arg(long)]
        title: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    let result = match cli.command {
        Commands::Parse {
            input,
            output,
            consolidated,
        } => {
            let input = input.unwrap_or_else(|| settings.txt_dir.clone());
            let output = output.unwrap_or_else(|| settings.json_dir.clone());
            let consolidated = consolidated.unwrap_or_else(|| settings.consolidated_path.clone());
            parse_all(&settings, &input, &output, &consolidated).map(|_| ExitCode::SUCCESS)
        }
        Commands::Fetch { urls, gaps } => fetch_all(&settings, urls, gaps.as_deref())
            .await
            .map(|_| ExitCode::SUCCESS),
        Commands::Validate { dir, consolidated } => {
            let dir = dir.unwrap_or_else(|| settings.json_dir.clone());
            let consolidated = consolidated.unwrap_or_else(|| settings.consolidated_path.clone());
            let report = audit(&store::load_snapshot(&dir, &consolidated));
            print!("{}", render_report(&report));
            Ok(if report.passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Show { file, title } => {
            let mut doc = store::load_text_document(&file)?;
            if title.is_some() {
                doc.title_hint = title;
            }
            let record = assemble(
                doc,
                Origin::TextFile,
                &settings.default_source_url,
                today(),
                &settings.thresholds,
            )
            .with_context(|| format!("Cannot build a record from {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(ExitCode::SUCCESS)
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Default)]
struct ParseSummary {
    playlists: usize,
    tracks: usize,
    first_date: Option<String>,
    last_date: Option<String>,
    skipped: Vec<String>,
    failed: usize,
}

impl ParseSummary {
    fn add(&mut self, record: &PlaylistRecord) {
        self.playlists += 1;
        self.tracks += record.tracks.len();
        if let Some(date) = &record.date {
            if self.first_date.as_ref().map_or(true, |d| date < d) {
                self.first_date = Some(date.clone());
            }
            if self.last_date.as_ref().map_or(true, |d| date > d) {
                self.last_date = Some(date.clone());
            }
        }
    }

    fn print(&self) {
        println!("Total playlists: {}", self.playlists);
        println!("Total tracks:    {}", self.tracks);
        if self.playlists > 0 {
            println!(
                "Average tracks:  {:.1}",
                self.tracks as f64 / self.playlists as f64
            );
        }
        if let (Some(first), Some(last)) = (&self.first_date, &self.last_date) {
            println!("Date range:      {} to {}", first, last);
        }
        if !self.skipped.is_empty() {
            println!(
                "Skipped {} files without a date: {}",
                self.skipped.len(),
                self.skipped.join(", ")
            );
        }
        if self.failed > 0 {
            println!("Failed to read {} files (see log)", self.failed);
        }
    }
}

fn parse_all(settings: &Settings, input: &Path, output: &Path, consolidated: &Path) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let files = store::list_txt_files(input)
        .with_context(|| format!("Cannot list show files in {}", input.display()))?;
    if files.is_empty() {
        println!("No .txt files in {}.", input.display());
        return Ok(());
    }
    println!("Parsing {} files...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let archived = today();
    let mut summary = ParseSummary::default();

    for chunk in files.chunks(500) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|path| {
                let doc = store::load_text_document(path)?;
                assemble(
                    doc,
                    Origin::TextFile,
                    &settings.default_source_url,
                    archived,
                    &settings.thresholds,
                )
            })
            .collect();

        for (path, result) in chunk.iter().zip(results) {
            match result {
                Ok(record) => {
                    store::save_record(output, &record)?;
                    summary.add(&record);
                }
                Err(Error::MissingDate { .. }) => {
                    warn!("No date in {}, skipping", path.display());
                    summary
                        .skipped
                        .push(path.file_name().unwrap_or_default().to_string_lossy().into_owned());
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    summary.failed += 1;
                }
            }
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    store::rebuild_consolidated(output, consolidated)?;
    summary.print();
    Ok(())
}

async fn fetch_all(settings: &Settings, urls: Vec<String>, gaps: Option<&Path>) -> Result<()> {
    let mut targets: Vec<fetch::GapEntry> = urls.into_iter().map(fetch::GapEntry::from_url).collect();
    if let Some(path) = gaps {
        let missing = fetch::load_gap_list(path)
            .with_context(|| format!("Cannot read gap list {}", path.display()))?;
        targets.extend(missing);
    }
    if targets.is_empty() {
        println!("Nothing to fetch. Pass URLs or --gaps FILE.");
        return Ok(());
    }

    let client = fetch::client()?;
    let delay = Duration::from_millis(settings.request_delay_ms);
    let archived = today();
    let mut fetched = 0usize;
    let mut failed = 0usize;

    for (i, target) in targets.iter().enumerate() {
        let url = target.url.as_str();
        println!("[{}/{}] {}", i + 1, targets.len(), target.label());
        match fetch_one(&client, url, settings, archived).await {
            Ok(record) => {
                fetched += 1;
                println!(
                    "  Saved {} ({} tracks)",
                    record.date.as_deref().unwrap_or("-"),
                    record.tracks.len()
                );
            }
            Err(e) => {
                failed += 1;
                warn!("Skipping {}: {}", url, e);
            }
        }

        if i + 1 < targets.len() {
            tokio::time::sleep(delay).await;
        }
    }

    if fetched > 0 {
        store::rebuild_consolidated(&settings.json_dir, &settings.consolidated_path)?;
    }
    info!("Fetch finished: {} ok, {} failed", fetched, failed);
    println!("Fetched: {}", fetched);
    println!("Failed:  {}", failed);
    Ok(())
}

async fn fetch_one(
    client: &reqwest::Client,
    url: &str,
    settings: &Settings,
    archived: NaiveDate,
) -> playlist_archive::error::Result<PlaylistRecord> {
    let doc = fetch::fetch_document(client, url, &settings.thresholds).await?;
    let record = assemble(doc, Origin::Web, url, archived, &settings.thresholds)?;
    store::save_record(&settings.json_dir, &record)?;
    Ok(record)
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
