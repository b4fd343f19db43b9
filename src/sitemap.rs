//! Namespace-aware parsing of sitemap and sitemap-index documents.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::error::{Error, Result};

/// The sitemap protocol namespace.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// A parsed sitemap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// A sitemap index: the `<sitemap><loc>` references it contains.
    Index(Vec<String>),
    /// A urlset: the `<url><loc>` leaf page URLs it contains.
    UrlSet(Vec<String>),
}

/// Which sitemap-namespace container the cursor is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Sitemap,
    Url,
}

/// Parse a sitemap XML document, classifying it as an index or a urlset.
///
/// All element lookups are qualified against [`SITEMAP_NS`]; elements in
/// foreign namespaces are ignored. A document counts as an index iff it
/// contains at least one `sitemap/loc` entry, otherwise its `url/loc`
/// entries are the leaf URLs. Empty or whitespace-only `loc` text is
/// skipped. Malformed XML is an [`Error::Parse`].
pub fn parse_document(url: &str, xml: &str) -> Result<SitemapDocument> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut nested: Vec<String> = Vec::new();
    let mut leaves: Vec<String> = Vec::new();
    let mut container: Option<Container> = None;
    let mut in_loc = false;

    loop {
        let event = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| Error::Parse {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        match event {
            (ns, Event::Start(e)) => {
                if in_sitemap_ns(&ns) {
                    match e.local_name().as_ref() {
                        b"sitemap" => container = Some(Container::Sitemap),
                        b"url" => container = Some(Container::Url),
                        b"loc" if container.is_some() => in_loc = true,
                        _ => {}
                    }
                }
            }
            (ns, Event::End(e)) => {
                if in_sitemap_ns(&ns) {
                    match e.local_name().as_ref() {
                        b"sitemap" | b"url" => container = None,
                        b"loc" => in_loc = false,
                        _ => {}
                    }
                }
            }
            (_, Event::Text(t)) => {
                if in_loc {
                    let text = t.unescape().map_err(|e| Error::Parse {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
                    push_loc(&mut nested, &mut leaves, container, text.trim());
                }
            }
            (_, Event::CData(t)) => {
                if in_loc {
                    let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    push_loc(&mut nested, &mut leaves, container, text.trim());
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }

        buf.clear();
    }

    if nested.is_empty() {
        Ok(SitemapDocument::UrlSet(leaves))
    } else {
        Ok(SitemapDocument::Index(nested))
    }
}

fn in_sitemap_ns(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(n)) if *n == SITEMAP_NS.as_bytes())
}

fn push_loc(
    nested: &mut Vec<String>,
    leaves: &mut Vec<String>,
    container: Option<Container>,
    text: &str,
) {
    if text.is_empty() {
        return;
    }
    match container {
        Some(Container::Sitemap) => nested.push(text.to_string()),
        Some(Container::Url) => leaves.push(text.to_string()),
        None => {}
    }
}
