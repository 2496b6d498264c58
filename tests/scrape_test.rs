use std::sync::Arc;

use hypemcli::error::HypemError;
use hypemcli::hypem::scrape::{parse_display_list, parse_track_tags};
use hypemcli::hypem::{HypemClient, MemoCache};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Helper function to create a track page with tags and an optional display list
fn track_page(tags: &[&str], display_list: Option<serde_json::Value>) -> String {
    let tags: String = tags
        .iter()
        .map(|t| format!("<li><a href=\"/tags/{t}\">{t}</a></li>"))
        .collect();
    let script = display_list
        .map(|json| format!("<script type=\"application/json\" id=\"displayList-data\">\n{json}\n</script>"))
        .unwrap_or_default();

    format!(
        "<html><head><title>Track</title></head><body>\
         <ul class=\"tags\">{tags}</ul>\
         <ul class=\"menu\"><li>Not a tag</li></ul>\
         {script}</body></html>"
    )
}

fn client_for(server: &MockServer) -> HypemClient {
    HypemClient::builder()
        .api_url(server.uri())
        .site_url(server.uri())
        .cache(Arc::new(MemoCache::new()))
        .build()
        .unwrap()
}

#[test]
fn test_parse_track_tags() {
    let html = track_page(&["electronic", "house", "chillout"], None);
    assert_eq!(parse_track_tags(&html), vec!["electronic", "house", "chillout"]);

    // Pages without a tag list yield nothing
    assert!(parse_track_tags("<html><body></body></html>").is_empty());
}

#[test]
fn test_parse_display_list() {
    let html = track_page(
        &[],
        Some(json!({"page_name": "track", "tracks": [
            {"id": "2fv7a", "key": "abc123", "type": "normal"},
            {"id": "2g1b4", "key": "def456", "type": "normal"}
        ]})),
    );

    let track = parse_display_list(&html).unwrap();
    assert_eq!(track.id, "2fv7a");
    assert_eq!(track.key, "abc123");
    assert_eq!(track.kind, json!("normal"));
}

#[test]
fn test_parse_display_list_missing_or_broken() {
    assert!(parse_display_list(&track_page(&["house"], None)).is_none());
    assert!(parse_display_list(&track_page(&[], Some(json!({"tracks": []})))).is_none());

    let broken = "<script id=\"displayList-data\">{not json</script>";
    assert!(parse_display_list(broken).is_none());
}

#[tokio::test]
async fn test_get_track_tags_is_memoized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/track/2fv7a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(track_page(&["house", "deep"], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.get_track_tags("2fv7a").await.unwrap(), vec!["house", "deep"]);
    assert_eq!(client.get_track_tags("2fv7a").await.unwrap(), vec!["house", "deep"]);
}

#[tokio::test]
async fn test_get_track_stream() {
    let mock_server = MockServer::start().await;

    let page = track_page(
        &[],
        Some(json!({"tracks": [{"id": "2fv7a", "key": "abc123", "type": "normal"}]})),
    );
    Mock::given(method("GET"))
        .and(path("/track/2fv7a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/serve/source/2fv7a/abc123"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"itemid": "2fv7a", "url": "https://cdn.example.com/2fv7a.mp3"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let url = client.get_track_stream("2fv7a").await.unwrap();
    assert_eq!(url, "https://cdn.example.com/2fv7a.mp3");

    // Served from the cache the second time
    let again = client.get_track_stream("2fv7a").await.unwrap();
    assert_eq!(again, url);
}

#[tokio::test]
async fn test_unstreamable_track_has_empty_url() {
    let mock_server = MockServer::start().await;

    let page = track_page(
        &[],
        Some(json!({"tracks": [{"id": "old1", "key": "k", "type": false}]})),
    );
    Mock::given(method("GET"))
        .and(path("/track/old1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/serve/source/old1/k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "nope"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.get_track_stream("old1").await.unwrap(), "");
}

#[tokio::test]
async fn test_missing_track_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/track/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_track_tags("gone").await.unwrap_err();
    assert!(matches!(err, HypemError::UnhandledStatus { status: 404, .. }));
}
