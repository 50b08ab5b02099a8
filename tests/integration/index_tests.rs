//! Integration tests for the index sinks
//!
//! The Typesense sink is exercised against a wiremock server standing in for
//! the Typesense HTTP API.

use crawldex::config::IndexConfig;
use crawldex::index::{IndexError, IndexSink, MemorySink, TypesenseSink};
use crawldex::Document;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn document(url: &str, content: &str) -> Document {
    Document {
        id: Document::make_id("a.example", url),
        url: url.to_string(),
        title: "Title".to_string(),
        content: content.to_string(),
        domain: "a.example".to_string(),
        path: "/".to_string(),
        last_crawled: 1_700_000_000,
        word_count: content.split_whitespace().count(),
        popularity: 0,
        headers: vec![],
        keywords: vec![],
        language: "en".to_string(),
        is_pdf: false,
    }
}

/// Creates an index configuration pointing at the mock server
fn create_test_config(server: &MockServer) -> IndexConfig {
    let address = server.address();
    IndexConfig {
        protocol: "http".to_string(),
        host: address.ip().to_string(),
        port: address.port(),
        api_key: API_KEY.to_string(),
        collection: "webpages".to_string(),
        connection_timeout_secs: 2,
        request_timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_memory_upsert_is_idempotent() {
    let sink = MemorySink::new();
    sink.ensure_schema().await.unwrap();

    let first = document("https://a.example/", "old content");
    let second = document("https://a.example/", "new content");
    assert_eq!(first.id, second.id);

    sink.upsert_batch(&[first]).await.unwrap();
    sink.upsert_batch(&[second.clone()]).await.unwrap();

    assert_eq!(sink.len(), 1);
    assert_eq!(sink.get(&second.id).unwrap().content, "new content");
}

#[tokio::test]
async fn test_memory_reset_and_empty_batch() {
    let sink = MemorySink::new();
    assert_eq!(sink.upsert_batch(&[]).await.unwrap(), 0);

    sink.upsert_batch(&[document("https://a.example/x", "x")])
        .await
        .unwrap();
    assert!(!sink.is_empty());

    sink.reset().await.unwrap();
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_ensure_schema_creates_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collections"))
        .and(header("x-typesense-api-key", API_KEY))
        .and(body_string_contains("\"default_sorting_field\":\"popularity\""))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sink = TypesenseSink::new(&create_test_config(&mock_server)).unwrap();
    sink.ensure_schema().await.unwrap();
}

#[tokio::test]
async fn test_ensure_schema_tolerates_existing_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collections"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_string(r#"{"message":"A collection with name `webpages` already exists."}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let sink = TypesenseSink::new(&create_test_config(&mock_server)).unwrap();
    assert!(sink.ensure_schema().await.is_ok());
}

#[tokio::test]
async fn test_ensure_schema_reports_other_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Forbidden"))
        .mount(&mock_server)
        .await;

    let sink = TypesenseSink::new(&create_test_config(&mock_server)).unwrap();
    match sink.ensure_schema().await {
        Err(IndexError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "Forbidden");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upsert_batch_imports_jsonl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collections/webpages/documents/import"))
        .and(query_param("action", "upsert"))
        .and(header("x-typesense-api-key", API_KEY))
        .and(body_string_contains("\"url\":\"https://a.example/one\""))
        .and(body_string_contains("\"url\":\"https://a.example/two\""))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "{\"success\":true}\n{\"success\":false,\"error\":\"Bad\",\"document\":\"{}\"}",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sink = TypesenseSink::new(&create_test_config(&mock_server)).unwrap();
    let imported = sink
        .upsert_batch(&[
            document("https://a.example/one", "one"),
            document("https://a.example/two", "two"),
        ])
        .await
        .unwrap();

    assert_eq!(imported, 1);
}

#[tokio::test]
async fn test_empty_batch_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let sink = TypesenseSink::new(&create_test_config(&mock_server)).unwrap();
    assert_eq!(sink.upsert_batch(&[]).await.unwrap(), 0);
}

#[tokio::test]
async fn test_reset_ignores_missing_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/collections/webpages"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sink = TypesenseSink::new(&create_test_config(&mock_server)).unwrap();
    sink.reset().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_index_is_http_error() {
    let config = IndexConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        api_key: API_KEY.to_string(),
        ..IndexConfig::default()
    };

    let sink = TypesenseSink::new(&config).unwrap();
    assert!(matches!(
        sink.ensure_schema().await,
        Err(IndexError::Http(_))
    ));
}
