//! HTTP client shared by every component that issues requests.
//!
//! The client is built once by the harvester and passed by reference to
//! the locator, resolver, and extractor. There is no ambient global
//! session; configuration lives on the value.

use std::time::Duration;

use crate::error::{Error, Result};

/// User-agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; siteharvest/0.1)";

/// Thin wrapper around `reqwest::Client` with a fixed user-agent and a
/// per-request timeout. Redirects are followed (up to the reqwest
/// default of 10 hops).
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Build a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> std::result::Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { inner })
    }

    /// Issue a HEAD request and return the final status code after
    /// redirects. Used for lightweight existence checks.
    pub async fn head(&self, url: &str) -> Result<u16> {
        let resp = self
            .inner
            .head(url)
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.to_string(),
                source,
            })?;
        Ok(resp.status().as_u16())
    }

    /// GET a URL and return the body as text.
    ///
    /// Non-success statuses become [`Error::NotFound`]; transport and
    /// body-read failures become [`Error::Transport`].
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::NotFound {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })
    }
}
