//! Cycle-safe resolution of sitemap documents into leaf page URLs.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::http::HttpClient;
use crate::sitemap::{self, SitemapDocument};

/// Flattens sitemap indexes into leaf page URLs using an explicit
/// worklist instead of call-stack recursion.
///
/// The visited set lives for one harvest run and is shared across every
/// `resolve` call on the same resolver. A document URL is marked visited
/// before it is fetched, so cyclic index references and repeated
/// references resolve to nothing instead of looping or re-fetching.
pub struct SitemapResolver<'a> {
    client: &'a HttpClient,
    visited: HashSet<String>,
}

impl<'a> SitemapResolver<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self {
            client,
            visited: HashSet::new(),
        }
    }

    /// Resolve one sitemap URL into the leaf page URLs reachable from it,
    /// in depth-first document order.
    ///
    /// Fetch and parse failures are logged and contribute zero URLs;
    /// sibling documents are unaffected. No dedup happens here, the
    /// harvester dedups once across all candidates.
    pub async fn resolve(&mut self, sitemap_url: &str) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        let mut work = vec![sitemap_url.to_string()];

        while let Some(current) = work.pop() {
            if !self.visited.insert(current.clone()) {
                continue;
            }

            let body = match self.client.get_text(&current).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("request error: {e}");
                    continue;
                }
            };

            match sitemap::parse_document(&current, &body) {
                Ok(SitemapDocument::Index(nested)) => {
                    info!("found sitemap index with {} sitemaps", nested.len());
                    // Pushed in reverse so the LIFO pop order matches
                    // document order.
                    for child in nested.into_iter().rev() {
                        work.push(child);
                    }
                }
                Ok(SitemapDocument::UrlSet(leaves)) => {
                    info!("extracted {} urls from {current}", leaves.len());
                    urls.extend(leaves);
                }
                Err(e) => warn!("{e}"),
            }
        }

        urls
    }

    /// Number of sitemap documents resolved so far in this run.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
