//! `siteharvest` binary: crawl a site's sitemaps and export page metadata.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use siteharvest::export;
use siteharvest::harvester::{HarvestConfig, Harvester};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Crawl website sitemaps and extract per-page metadata.
#[derive(Debug, Parser)]
#[command(name = "siteharvest", version, about)]
struct Args {
    /// Base URL of the website (e.g. https://example.com).
    #[arg(long)]
    url: String,

    /// Output file (default: sitemap_links-<timestamp>.<ext>).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Maximum page fetches in flight during extraction (1 = sequential).
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Output format.
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("siteharvest=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = HarvestConfig {
        timeout: Duration::from_secs(args.timeout),
        concurrency: args.concurrency,
    };
    let harvester = Harvester::new(&args.url, config).context("building HTTP client")?;

    let urls = harvester.discover_urls().await;

    let bar = progress_bar(urls.len() as u64);
    let records = harvester
        .extract_all(&urls, |_, record| {
            bar.set_message(record.url.clone());
            bar.inc(1);
        })
        .await;
    bar.finish_and_clear();

    if records.is_empty() {
        eprintln!("no results to write");
        std::process::exit(1);
    }

    let output = args
        .output
        .unwrap_or_else(|| default_output_path(args.format));
    match args.format {
        OutputFormat::Csv => export::write_csv(&output, &records)?,
        OutputFormat::Json => export::write_json(&output, &records)?,
    }
    eprintln!("results written to {}", output.display());

    Ok(())
}

fn default_output_path(format: OutputFormat) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    PathBuf::from(format!("sitemap_links-{ts}.{}", format.extension()))
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("  {bar:30.cyan/238} {pos}/{len} {wide_msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    bar
}
