//! Page metadata records and HTML extraction.

use std::collections::BTreeMap;

use scraper::{Html, Selector};
use serde::Serialize;
use tracing::warn;

use crate::http::HttpClient;

/// Meta keys that are presentation noise, never stored.
const IGNORED_KEYS: &[&str] = &["viewport", "charset"];

/// Metadata extracted from one page.
///
/// The known semantic slots are explicit fields with an explicit write
/// rule: `description`, `og_title`, and `image` are set-once (first
/// writer wins, so og/twitter duplicates cannot flicker the value),
/// while `keywords`, `author`, and `og_type` take the last tag seen.
/// Anything else a page declares lands in `extra` under its own
/// lowercased key, last writer wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageRecord {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl PageRecord {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }

    /// Apply one meta tag's key/value according to the merge policy.
    fn apply_meta(&mut self, key: &str, content: &str) {
        match key {
            "description" | "og:description" | "twitter:description" => {
                if self.description.is_none() {
                    self.description = Some(content.to_string());
                }
            }
            "keywords" => self.keywords = Some(content.to_string()),
            "author" => self.author = Some(content.to_string()),
            "og:title" | "twitter:title" => {
                if self.og_title.is_none() {
                    self.og_title = Some(content.to_string());
                }
            }
            "og:image" | "twitter:image" => {
                if self.image.is_none() {
                    self.image = Some(content.to_string());
                }
            }
            "og:type" => self.og_type = Some(content.to_string()),
            _ if IGNORED_KEYS.contains(&key) => {}
            other => {
                self.extra.insert(other.to_string(), content.to_string());
            }
        }
    }

    /// Look up a field value by name, for serialization.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "url" => Some(&self.url),
            "title" => self.title.as_deref(),
            "description" => self.description.as_deref(),
            "keywords" => self.keywords.as_deref(),
            "author" => self.author.as_deref(),
            "og_title" => self.og_title.as_deref(),
            "image" => self.image.as_deref(),
            "og_type" => self.og_type.as_deref(),
            "canonical" => self.canonical.as_deref(),
            "error" => self.error.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Names of every field populated on this record.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names = vec!["url"];
        let slots: [(&str, &Option<String>); 9] = [
            ("title", &self.title),
            ("description", &self.description),
            ("keywords", &self.keywords),
            ("author", &self.author),
            ("og_title", &self.og_title),
            ("image", &self.image),
            ("og_type", &self.og_type),
            ("canonical", &self.canonical),
            ("error", &self.error),
        ];
        for (name, value) in slots {
            if value.is_some() {
                names.push(name);
            }
        }
        names.extend(self.extra.keys().map(String::as_str));
        names
    }
}

/// Extracts per-page metadata. Never fails: every failure mode is
/// captured on the returned record's `error` field.
pub struct MetadataExtractor<'a> {
    client: &'a HttpClient,
}

impl<'a> MetadataExtractor<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Fetch a page and derive its metadata record.
    ///
    /// On fetch failure the record carries only `url` and `error`. HTML
    /// is parsed tolerantly, so malformed markup degrades to whatever
    /// could be read instead of aborting.
    pub async fn extract(&self, url: &str) -> PageRecord {
        let mut record = PageRecord::new(url);

        match self.client.get_text(url).await {
            Ok(body) => populate_from_html(&mut record, &body),
            Err(e) => {
                warn!("error fetching {url}: {e}");
                record.error = Some(e.to_string());
            }
        }

        record
    }
}

/// Fill a record from an HTML body.
pub fn populate_from_html(record: &mut PageRecord, html: &str) {
    let doc = Html::parse_document(html);

    if let Ok(sel) = Selector::parse("title") {
        let title = doc
            .select(&sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        record.title = Some(title);
    }

    if let Ok(sel) = Selector::parse("meta") {
        for el in doc.select(&sel) {
            let tag = el.value();
            // `name` wins over `property`; an empty name falls through.
            let Some(key) = tag
                .attr("name")
                .filter(|name| !name.is_empty())
                .or_else(|| tag.attr("property"))
                .map(|key| key.to_ascii_lowercase())
                .filter(|key| !key.is_empty())
            else {
                continue;
            };
            let content = tag.attr("content").unwrap_or("");
            if content.is_empty() {
                continue;
            }
            record.apply_meta(&key, content);
        }
    }

    if let Ok(sel) = Selector::parse(r#"link[rel="canonical"]"#) {
        if let Some(href) = doc
            .select(&sel)
            .next()
            .and_then(|el| el.value().attr("href"))
            .filter(|href| !href.is_empty())
        {
            record.canonical = Some(href.to_string());
        }
    }
}
