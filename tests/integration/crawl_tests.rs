//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use crawldex::config::CrawlerConfig;
use crawldex::crawler::{crawl_and_index, CrawlEngine};
use crawldex::index::MemorySink;
use crawldex::output::CrawlSummary;
use crawldex::Document;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given depth limit
fn create_test_config(max_depth: u32) -> CrawlerConfig {
    CrawlerConfig {
        max_depth,
        max_workers: 5,
        request_timeout_secs: 5,
        user_agent: "crawldex-test".to_string(),
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

/// Mounts an HTML page at `route` that must be fetched exactly `times` times
async fn mount_page(server: &MockServer, route: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .expect(times)
        .mount(server)
        .await;
}

fn find<'a>(documents: &'a [Document], suffix: &str) -> Option<&'a Document> {
    documents.iter().find(|d| d.url.ends_with(suffix))
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2/">Page 2</a>
            </body></html>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        "<html><head><title>Page 1</title></head><body>Content 1</body></html>",
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        "<html><head><title>Page 2</title></head><body>Content 2</body></html>",
        1,
    )
    .await;

    let engine = CrawlEngine::new(create_test_config(2)).expect("Failed to create engine");
    let report = engine
        .crawl_seed(&format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(report.documents.len(), 3);
    assert_eq!(report.stats.pages_dispatched, 3);
    assert_eq!(report.stats.waves, 2);

    let domain = base_url.trim_start_matches("http://");
    assert_eq!(report.domain, domain);

    let home = find(&report.documents, domain).expect("home page missing");
    assert_eq!(home.title, "Home");
    assert_eq!(home.path, "/");

    let page2 = find(&report.documents, "/page2").expect("page2 missing");
    assert_eq!(page2.title, "Page 2");
    assert_eq!(page2.content, "Content 2");
    assert_eq!(page2.id, format!("{}:{}/page2", domain, base_url));
}

#[tokio::test]
async fn test_links_to_other_domains_are_not_followed() {
    let seed_server = MockServer::start().await;
    let other_server = MockServer::start().await;

    mount_page(
        &seed_server,
        "/",
        &format!(
            r#"<a href="{}/page">elsewhere</a><a href="/other">here</a>"#,
            other_server.uri()
        ),
        1,
    )
    .await;
    mount_page(&seed_server, "/other", "<p>same domain</p>", 1).await;
    mount_page(&other_server, "/page", "<p>other domain</p>", 0).await;

    let engine = CrawlEngine::new(create_test_config(3)).unwrap();
    let documents = engine.crawl(&seed_server.uri()).await.unwrap();

    assert_eq!(documents.len(), 2);
    assert!(find(&documents, "/other").is_some());
    assert!(documents
        .iter()
        .all(|d| !d.url.starts_with(&other_server.uri())));
}

/// Mounts a permanent redirect from `route` on `server` to `target`
async fn mount_redirect(server: &MockServer, route: &str, target: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_seed_redirecting_to_another_host_keeps_crawling() {
    let bare = MockServer::start().await;
    let canonical = MockServer::start().await;

    mount_redirect(&bare, "/", format!("{}/", canonical.uri())).await;
    mount_redirect(&bare, "/about", format!("{}/about", canonical.uri())).await;
    mount_page(
        &canonical,
        "/",
        r#"<html><head><title>Landing</title></head><body><a href="/about">About</a></body></html>"#,
        1,
    )
    .await;
    mount_page(&canonical, "/about", "<p>about us</p>", 1).await;

    let engine = CrawlEngine::new(create_test_config(2)).unwrap();
    let report = engine.crawl_seed(&bare.uri()).await.unwrap();

    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.stats.pages_dispatched, 2);
    assert!(report
        .documents
        .iter()
        .all(|d| d.url.starts_with(&bare.uri())));

    let about = find(&report.documents, "/about").expect("about missing");
    assert_eq!(about.content, "about us");
}

#[tokio::test]
async fn test_depth_bound_stops_two_hop_chain() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/hop1">one</a>"#, 1).await;
    mount_page(&mock_server, "/hop1", r#"<a href="/hop2">two</a>"#, 1).await;
    mount_page(&mock_server, "/hop2", "<p>too deep</p>", 0).await;

    let engine = CrawlEngine::new(create_test_config(1)).unwrap();
    let documents = engine.crawl(&mock_server.uri()).await.unwrap();

    assert_eq!(documents.len(), 2);
    assert!(find(&documents, "/hop2").is_none());
}

#[tokio::test]
async fn test_page_linked_from_two_siblings_fetched_once() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">a</a><a href="/b">b</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/a", r#"<a href="/shared">s</a><a href="/">home</a>"#, 1).await;
    mount_page(&mock_server, "/b", r#"<a href="/shared/#x">s</a>"#, 1).await;
    mount_page(&mock_server, "/shared", "<p>shared</p>", 1).await;

    let engine = CrawlEngine::new(create_test_config(3)).unwrap();
    let report = engine.crawl_seed(&mock_server.uri()).await.unwrap();

    assert_eq!(report.documents.len(), 4);
    assert_eq!(report.stats.pages_dispatched, 4);

    let shared: Vec<_> = report
        .documents
        .iter()
        .filter(|d| d.url.ends_with("/shared"))
        .collect();
    assert_eq!(shared.len(), 1);
}

#[tokio::test]
async fn test_banned_extensions_never_fetched() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/logo.png">logo</a><a href="/bundle.zip">zip</a><a href="/docs">docs</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/docs", "<p>docs</p>", 1).await;
    for route in ["/logo.png", "/bundle.zip"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let engine = CrawlEngine::new(create_test_config(3)).unwrap();
    let documents = engine.crawl(&mock_server.uri()).await.unwrap();

    assert_eq!(documents.len(), 2);
}

#[tokio::test]
async fn test_failed_fetches_do_not_stop_the_run() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">gone</a><a href="/broken">500</a><a href="/ok">ok</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "<p>fine</p>", 1).await;

    let engine = CrawlEngine::new(create_test_config(2)).unwrap();
    let report = engine.crawl_seed(&mock_server.uri()).await.unwrap();

    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.stats.fetch_failures, 2);
    assert!(find(&report.documents, "/ok").is_some());
}

#[tokio::test]
async fn test_unreadable_pdf_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/report.pdf">report</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.4 truncated".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = CrawlEngine::new(create_test_config(2)).unwrap();
    let report = engine.crawl_seed(&mock_server.uri()).await.unwrap();

    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.stats.extract_skips, 1);
}

#[tokio::test]
async fn test_unreachable_seed_yields_no_documents() {
    let engine = CrawlEngine::new(create_test_config(3)).unwrap();

    // Port 1 is reserved and nothing listens there in test environments
    let documents = engine.crawl("http://127.0.0.1:1/").await.unwrap();
    assert!(documents.is_empty());
}

#[tokio::test]
async fn test_popularity_includes_link_priority() {
    let mock_server = MockServer::start().await;
    let long_post = format!("<p>{}</p>", vec!["word"; 600].join(" "));

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/blog/post">post</a><a href="/about">about</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/blog/post", &long_post, 1).await;
    mount_page(&mock_server, "/about", "<p>short</p>", 1).await;

    let engine = CrawlEngine::new(create_test_config(1)).unwrap();
    let documents = engine.crawl(&mock_server.uri()).await.unwrap();

    let post = find(&documents, "/blog/post").expect("post missing");
    assert_eq!(post.word_count, 600);
    assert_eq!(post.popularity, 3);

    // about (+1) reached via a tier-1 link (+2)
    let about = find(&documents, "/about").expect("about missing");
    assert_eq!(about.popularity, 3);

    // the seed root is tier 3 and earns nothing
    let home = find(&documents, mock_server.uri().trim_start_matches("http://"))
        .expect("home missing");
    assert_eq!(home.popularity, 0);
}

#[tokio::test]
async fn test_crawl_and_index_publishes_each_seed() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    mount_page(&first, "/", r#"<a href="/next">next</a>"#, 1).await;
    mount_page(&first, "/next", "<p>next</p>", 1).await;
    mount_page(&second, "/", "<p>alone</p>", 1).await;

    let engine = CrawlEngine::new(create_test_config(3)).unwrap();
    let sink = MemorySink::new();
    let seeds = vec![
        first.uri(),
        "mailto:nobody@example.com".to_string(),
        format!("{}/", second.uri()),
    ];
    let mut summary = CrawlSummary::start(None, true);

    crawl_and_index(&engine, &sink, &seeds, false, &mut summary).await;

    assert_eq!(sink.len(), 3);
    assert_eq!(summary.seeds.len(), 3);
    assert_eq!(summary.total_indexed(), 3);
    assert_eq!(summary.failed_seeds(), 1);
    assert_eq!(summary.seeds[0].indexed, 2);
    assert!(summary.seeds[1].index_error.is_some());
    assert_eq!(summary.seeds[2].indexed, 1);
}
