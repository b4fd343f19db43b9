//! Discovery of candidate sitemap endpoints for a site root.

use tracing::{debug, info};
use url::Url;

use crate::http::HttpClient;
use crate::robots;

/// Well-known sitemap locations, probed in this order.
const WELL_KNOWN_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-index.xml",
    "/sitemap1.xml",
    "/sitemaps.xml",
    "/sitemap/",
];

/// Discovers candidate sitemap URLs via well-known paths and robots.txt.
pub struct SitemapLocator<'a> {
    client: &'a HttpClient,
    root: String,
}

impl<'a> SitemapLocator<'a> {
    /// `root` is normalized by stripping any trailing slash.
    pub fn new(client: &'a HttpClient, root: &str) -> Self {
        Self {
            client,
            root: root.trim_end_matches('/').to_string(),
        }
    }

    /// Probe the well-known paths, then append robots.txt declarations.
    ///
    /// A well-known path is accepted iff it answers HTTP 200 after
    /// redirects. Candidates are deduplicated by exact match, preserving
    /// discovery order. Per-candidate failures are logged and skipped.
    /// An empty result means the site publishes no sitemap we can find,
    /// which is a reportable outcome, not an error.
    pub async fn locate(&self) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();

        for path in WELL_KNOWN_PATHS {
            let url = self.join(path);
            match self.client.head(&url).await {
                Ok(200) => {
                    info!("found sitemap: {url}");
                    if !candidates.contains(&url) {
                        candidates.push(url);
                    }
                }
                Ok(status) => debug!("no sitemap at {url} (HTTP {status})"),
                Err(e) => debug!("probe failed: {e}"),
            }
        }

        match self.client.get_text(&self.join("/robots.txt")).await {
            Ok(body) => {
                for declared in robots::sitemap_declarations(&body) {
                    if !candidates.contains(&declared) {
                        info!("found sitemap in robots.txt: {declared}");
                        candidates.push(declared);
                    }
                }
            }
            Err(e) => debug!("robots.txt unavailable: {e}"),
        }

        candidates
    }

    fn join(&self, path: &str) -> String {
        match Url::parse(&self.root).and_then(|u| u.join(path)) {
            Ok(joined) => joined.to_string(),
            Err(_) => format!("{}{}", self.root, path),
        }
    }
}
