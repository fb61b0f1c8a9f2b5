//! End-to-end crawls against a local HTTP server.

use std::sync::Arc;
use std::time::Duration;

use sitemappy::{crawl_website, CrawlConfig, CrawlError, FailurePolicy, HttpLinkExtractor};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn html_page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .enumerate()
        .map(|(i, link)| format!("<a href=\"{}\">{}</a>", link, i))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}

async fn serve(server: &MockServer, route: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(links)))
        .mount(server)
        .await;
}

fn extractor(server: &MockServer) -> Arc<HttpLinkExtractor> {
    Arc::new(HttpLinkExtractor::new(&server.uri(), Duration::from_secs(5)).unwrap())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn maps_every_same_host_page() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/",
        &["/about", "/careers", "https://other.com/x", "mailto:hi@a.com"],
    )
    .await;
    serve(&server, "/about", &["/", "/careers"]).await;
    serve(&server, "/careers", &["/about"]).await;

    let base = server.uri();
    let report = crawl_website(extractor(&server), &base, CrawlConfig::default().with_workers(4))
        .await
        .unwrap();

    let about = format!("{}/about", base);
    let careers = format!("{}/careers", base);
    let root = format!("{}/", base);

    // The base URL as typed, plus "/" reached through a link back to it
    let mut keys: Vec<_> = report.pages.keys().cloned().collect();
    keys.sort();
    let mut expected = vec![base.clone(), root, about.clone(), careers.clone()];
    expected.sort();
    assert_eq!(keys, expected);

    assert_eq!(
        report.pages[&base],
        vec![
            about.clone(),
            careers.clone(),
            "https://other.com/x".to_string(),
            "mailto:hi@a.com".to_string()
        ]
    );
    assert!(report.is_complete());
}

#[tokio::test]
async fn depth_one_fetches_only_the_base_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&["/child"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let base = server.uri();
    let report = crawl_website(extractor(&server), &base, CrawlConfig::default().with_max_depth(1))
        .await
        .unwrap();

    assert_eq!(report.page_count(), 1);
    assert_eq!(report.pages[&base], vec![format!("{}/child", base)]);
    // MockServer verifies the .expect() counts when dropped
}

#[tokio::test]
async fn broken_page_is_recorded_or_aborts() {
    let server = MockServer::start().await;
    serve(&server, "/", &["/missing"]).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let base = server.uri();
    let missing = format!("{}/missing", base);

    let report = crawl_website(extractor(&server), &base, CrawlConfig::default())
        .await
        .unwrap();
    assert!(report.failures[&missing].contains("404"));
    assert!(report.pages[&missing].is_empty());

    let config = CrawlConfig::default().with_failure_policy(FailurePolicy::Abort);
    let err = crawl_website(extractor(&server), &base, config).await.unwrap_err();
    assert!(matches!(err, CrawlError::Fetch { url, .. } if url == missing));
}

#[tokio::test]
async fn fragment_on_base_page_is_not_crawled() {
    let server = MockServer::start().await;
    serve(&server, "/", &["#top", "/about"]).await;
    serve(&server, "/about", &[]).await;

    let base = server.uri();
    let report = crawl_website(extractor(&server), &base, CrawlConfig::default())
        .await
        .unwrap();

    let about = format!("{}/about", base);
    let keys: Vec<_> = report.pages.keys().cloned().collect();
    assert_eq!(keys, vec![base.clone(), about.clone()]);
    assert_eq!(report.pages[&base], vec![format!("{}#top", base), about]);
}
