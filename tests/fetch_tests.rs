//! Integration tests for the HTTP fetcher
//!
//! These tests use wiremock to exercise GET classification, the HEAD
//! fallback and the failure path against a real HTTP server.

use origin_walker::config::FetchConfig;
use origin_walker::crawler::{Fetch, FetchOutcome, HttpFetcher};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fetch configuration with short timeouts for testing
fn create_test_fetch_config() -> FetchConfig {
    FetchConfig {
        timeout_ms: 500,
        fallback_timeout_ms: 300,
        ..FetchConfig::default()
    }
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&create_test_fetch_config()).expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_html_page_returns_body() {
    let mock_server = MockServer::start().await;
    let html = r#"<html><body><a href="/next">next</a></body></html>"#;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = fetcher().fetch(&format!("{}/", mock_server.uri())).await;

    assert_eq!(outcome.content_type, "text/html");
    assert_eq!(outcome.body.as_deref(), Some(html));
}

#[tokio::test]
async fn test_non_html_has_no_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"))
        .mount(&mock_server)
        .await;

    let outcome = fetcher()
        .fetch(&format!("{}/logo.png", mock_server.uri()))
        .await;

    assert_eq!(outcome, FetchOutcome::metadata("image/png"));
}

#[tokio::test]
async fn test_server_error_falls_back_to_head() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/asset"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/asset"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = fetcher().fetch(&format!("{}/asset", mock_server.uri())).await;

    assert_eq!(outcome.content_type, "image/png");
    assert!(outcome.body.is_none());
}

#[tokio::test]
async fn test_head_fallback_never_yields_body_for_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&mock_server)
        .await;

    let outcome = fetcher().fetch(&format!("{}/page", mock_server.uri())).await;

    assert_eq!(outcome, FetchOutcome::metadata("text/html"));
}

#[tokio::test]
async fn test_both_attempts_fail() {
    let mock_server = MockServer::start().await;

    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    let outcome = fetcher()
        .fetch(&format!("{}/missing", mock_server.uri()))
        .await;

    assert_eq!(outcome, FetchOutcome::error());
}

#[tokio::test]
async fn test_get_timeout_falls_back_to_head() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html></html>", "text/html")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = fetcher().fetch(&format!("{}/slow", mock_server.uri())).await;

    assert_eq!(outcome, FetchOutcome::metadata("text/html"));
}

#[tokio::test]
async fn test_missing_content_type_is_unknown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bare"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let outcome = fetcher().fetch(&format!("{}/bare", mock_server.uri())).await;

    assert_eq!(outcome, FetchOutcome::metadata("unknown"));
}

#[tokio::test]
async fn test_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("body { }", "text/css"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = fetcher().fetch(&format!("{}/old", mock_server.uri())).await;

    assert_eq!(outcome, FetchOutcome::metadata("text/css"));
}

#[tokio::test]
async fn test_unreachable_host_is_error() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let outcome = fetcher().fetch(&format!("{}/gone", uri)).await;

    assert_eq!(outcome, FetchOutcome::error());
}
