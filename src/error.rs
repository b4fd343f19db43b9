//! Error taxonomy for harvest operations.

use thiserror::Error;

/// Failures that can occur while probing, fetching, or parsing documents.
///
/// Every variant is caught at the call site that produced it: candidate
/// and document errors contribute nothing to the run, page errors degrade
/// the record instead of dropping it. Nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure reaching a host (DNS, connect, timeout).
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    NotFound { url: String, status: u16 },

    /// Malformed sitemap XML.
    #[error("failed to parse {url}: {message}")]
    Parse { url: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
