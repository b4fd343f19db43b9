//! Sitemap-driven website metadata harvesting.
//!
//! Discovers a site's sitemap endpoints (well-known paths plus robots.txt
//! declarations), flattens sitemap indexes into a deduplicated,
//! order-preserving list of page URLs, and extracts per-page metadata
//! into flat records ready for CSV or JSON export.
//!
//! The pipeline is strictly top-down: [`locator::SitemapLocator`] runs
//! once, [`resolver::SitemapResolver`] flattens each candidate with a
//! shared visited set, then [`metadata::MetadataExtractor`] produces one
//! [`PageRecord`] per unique URL. [`harvester::Harvester`] composes the
//! phases and owns the HTTP client for the run.

pub mod error;
pub mod export;
pub mod harvester;
pub mod http;
pub mod locator;
pub mod metadata;
pub mod resolver;
pub mod robots;
pub mod sitemap;

pub use error::Error;
pub use harvester::{HarvestConfig, Harvester};
pub use metadata::PageRecord;
