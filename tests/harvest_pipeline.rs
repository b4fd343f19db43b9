//! End-to-end harvest tests against a mock HTTP server.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use siteharvest::harvester::{HarvestConfig, Harvester};

fn config() -> HarvestConfig {
    HarvestConfig {
        timeout: Duration::from_secs(5),
        concurrency: 1,
    }
}

fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{u}</loc></url>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{entries}</urlset>"#
    )
}

fn sitemap_index(sitemaps: &[String]) -> String {
    let entries: String = sitemaps
        .iter()
        .map(|u| format!("<sitemap><loc>{u}</loc></sitemap>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{entries}</sitemapindex>"#
    )
}

async fn mount_xml(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn end_to_end_index_resolution_and_extraction() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    mount_xml(
        &server,
        "/sitemap_index.xml",
        sitemap_index(&[format!("{base}/s1.xml"), format!("{base}/s2.xml")]),
    )
    .await;
    mount_xml(
        &server,
        "/s1.xml",
        urlset(&[format!("{base}/a"), format!("{base}/b")]),
    )
    .await;
    mount_xml(
        &server,
        "/s2.xml",
        urlset(&[format!("{base}/b"), format!("{base}/c")]),
    )
    .await;

    mount_html(
        &server,
        "/a",
        r#"<html><head><title>Page A</title>
        <meta name="description" content="about a"></head></html>"#,
    )
    .await;
    mount_html(
        &server,
        "/b",
        r#"<html><head><title>Page B</title>
        <meta property="og:description" content="about b"></head></html>"#,
    )
    .await;
    mount_html(
        &server,
        "/c",
        r#"<html><head><title>Page C</title>
        <meta name="description" content="about c"></head></html>"#,
    )
    .await;

    let harvester = Harvester::new(&base, config()).unwrap();
    let records = harvester.run().await;

    // s1 yields a, b; s2 yields b, c; global dedup keeps first occurrences.
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].url, format!("{base}/a"));
    assert_eq!(records[1].url, format!("{base}/b"));
    assert_eq!(records[2].url, format!("{base}/c"));

    assert_eq!(records[0].title.as_deref(), Some("Page A"));
    assert_eq!(records[0].description.as_deref(), Some("about a"));
    assert_eq!(records[1].title.as_deref(), Some("Page B"));
    assert_eq!(records[1].description.as_deref(), Some("about b"));
    assert_eq!(records[2].title.as_deref(), Some("Page C"));
    assert!(records.iter().all(|r| r.error.is_none()));
}

#[tokio::test]
async fn cyclic_sitemap_index_terminates_with_each_document_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // A -> B, B -> A (cycle) and C, C is a leaf urlset. The expect(1)
    // guards inside mount_xml verify no document is fetched twice.
    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{base}/b.xml")]),
    )
    .await;
    mount_xml(
        &server,
        "/b.xml",
        sitemap_index(&[format!("{base}/sitemap.xml"), format!("{base}/c.xml")]),
    )
    .await;
    mount_xml(
        &server,
        "/c.xml",
        urlset(&[format!("{base}/x"), format!("{base}/y")]),
    )
    .await;

    let harvester = Harvester::new(&base, config()).unwrap();
    let urls = harvester.discover_urls().await;

    assert_eq!(urls, vec![format!("{base}/x"), format!("{base}/y")]);
}

#[tokio::test]
async fn failed_sibling_sitemap_does_not_abort_run() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{base}/bad.xml"), format!("{base}/good.xml")]),
    )
    .await;
    mount_xml(&server, "/bad.xml", "this is not xml <".to_string()).await;
    mount_xml(&server, "/good.xml", urlset(&[format!("{base}/page")])).await;

    let harvester = Harvester::new(&base, config()).unwrap();
    let urls = harvester.discover_urls().await;

    assert_eq!(urls, vec![format!("{base}/page")]);
}

#[tokio::test]
async fn robots_txt_declarations_are_discovered() {
    let server = MockServer::start().await;
    let base = server.uri();

    // No well-known path answers 200; robots.txt points at the sitemap.
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow: /private\nSitemap: {base}/from_robots.xml\n"
        )))
        .mount(&server)
        .await;
    mount_xml(
        &server,
        "/from_robots.xml",
        urlset(&[format!("{base}/p1")]),
    )
    .await;
    mount_html(&server, "/p1", "<html><head><title>P1</title></head></html>").await;

    let harvester = Harvester::new(&base, config()).unwrap();
    let records = harvester.run().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, format!("{base}/p1"));
    assert_eq!(records[0].title.as_deref(), Some("P1"));
}

#[tokio::test]
async fn no_sitemaps_yields_empty_result_set() {
    let server = MockServer::start().await;

    let harvester = Harvester::new(&server.uri(), config()).unwrap();
    let records = harvester.run().await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn failed_page_fetch_becomes_error_record() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    mount_xml(&server, "/sitemap.xml", urlset(&[format!("{base}/broken")])).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let harvester = Harvester::new(&base, config()).unwrap();
    let records = harvester.run().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, format!("{base}/broken"));
    assert!(records[0].error.as_deref().unwrap().contains("500"));
    assert!(records[0].title.is_none());
}

#[tokio::test]
async fn concurrent_extraction_preserves_discovery_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let urls: Vec<String> = (0..8).map(|i| format!("{base}/page/{i}")).collect();
    mount_xml(&server, "/sitemap.xml", urlset(&urls)).await;
    for (i, _) in urls.iter().enumerate() {
        // Earlier pages respond slower; order must still hold.
        let delay = Duration::from_millis(40u64.saturating_sub(i as u64 * 5));
        Mock::given(method("GET"))
            .and(path(format!("/page/{i}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(delay)
                    .set_body_raw(
                        format!("<html><head><title>Page {i}</title></head></html>"),
                        "text/html",
                    ),
            )
            .mount(&server)
            .await;
    }

    let harvester = Harvester::new(
        &base,
        HarvestConfig {
            timeout: Duration::from_secs(5),
            concurrency: 4,
        },
    )
    .unwrap();
    let records = harvester.run().await;

    assert_eq!(records.len(), 8);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.url, format!("{base}/page/{i}"));
        assert_eq!(record.title.as_deref(), Some(&*format!("Page {i}")));
    }
}
