//! End-to-end harvest orchestration.

use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::info;

use crate::http::HttpClient;
use crate::locator::SitemapLocator;
use crate::metadata::{MetadataExtractor, PageRecord};
use crate::resolver::SitemapResolver;

/// Tuning knobs for a harvest run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Page fetches allowed in flight during extraction. `1` reproduces
    /// strictly sequential behavior; higher values keep result order.
    pub concurrency: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            concurrency: 1,
        }
    }
}

/// Orchestrates one harvest over a site root: locate sitemaps, resolve
/// them, deduplicate the discovered URLs, and extract metadata per page.
///
/// The harvester owns the HTTP client and hands it to each component;
/// the visited set and result accumulation live for one run only.
pub struct Harvester {
    client: HttpClient,
    root: String,
    config: HarvestConfig,
}

impl Harvester {
    pub fn new(root: &str, config: HarvestConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: HttpClient::new(config.timeout)?,
            root: root.trim_end_matches('/').to_string(),
            config,
        })
    }

    /// Locate and resolve every sitemap, returning the deduplicated leaf
    /// URL list in first-occurrence order. Empty when the site publishes
    /// no reachable sitemap.
    pub async fn discover_urls(&self) -> Vec<String> {
        let locator = SitemapLocator::new(&self.client, &self.root);
        let candidates = locator.locate().await;
        if candidates.is_empty() {
            info!("no sitemaps found");
            return Vec::new();
        }

        let mut resolver = SitemapResolver::new(&self.client);
        let mut all_urls: Vec<String> = Vec::new();
        for candidate in &candidates {
            all_urls.extend(resolver.resolve(candidate).await);
        }

        let unique = dedup_preserving_order(all_urls);
        info!(
            "resolved {} sitemap documents, {} unique urls",
            resolver.visited_count(),
            unique.len()
        );
        unique
    }

    /// Extract metadata for each URL, yielding records in input order.
    ///
    /// At most `concurrency` fetches are in flight at once. `on_record`
    /// is called with the 1-based index as each record completes, for
    /// progress reporting.
    pub async fn extract_all<F>(&self, urls: &[String], mut on_record: F) -> Vec<PageRecord>
    where
        F: FnMut(usize, &PageRecord),
    {
        let extractor = MetadataExtractor::new(&self.client);
        let total = urls.len();
        let mut results = Vec::with_capacity(total);

        let mut records = stream::iter(urls.iter().map(|url| extractor.extract(url)))
            .buffered(self.config.concurrency.max(1));

        while let Some(record) = records.next().await {
            let index = results.len() + 1;
            info!("processed {index}/{total}: {}", record.url);
            on_record(index, &record);
            results.push(record);
        }

        results
    }

    /// Full pipeline: locate, resolve, dedup, extract.
    pub async fn run(&self) -> Vec<PageRecord> {
        let urls = self.discover_urls().await;
        self.extract_all(&urls, |_, _| {}).await
    }
}

/// Remove duplicates keeping the first occurrence of each URL.
fn dedup_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(urls.len());
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
