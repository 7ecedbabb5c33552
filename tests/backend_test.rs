//! Backend client tests
//!
//! Tests endpoint paths, request bodies, decoding and the error taxonomy
//! against a mockito server.

use mockito::{Matcher, Server};
use seriestui::api::{BackendClient, GatewayError};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn show_body(id: u64, search_term: Option<&str>, hits: &[&str]) -> String {
    let hits: Vec<_> = hits
        .iter()
        .map(|pk| {
            json!({
                "pk": pk,
                "title": format!("Release {}", pk),
                "age": 2,
                "grabs": 4,
                "seeders": 12,
                "leechers": 1,
                "info_url": format!("https://indexer/{}", pk),
                "size": 1073741824u64,
                "indexer": "rutracker"
            })
        })
        .collect();

    json!({
        "id": id,
        "tvdb_data": {
            "title": "Breaking Bad",
            "title_en": "Breaking Bad",
            "year": 2008,
            "image_url": null,
            "overview": "A chemistry teacher turns to crime.",
            "country": "usa",
            "genres": ["Drama"]
        },
        "sonarr_data": {"seasons": [{"season_number": 1, "total_episodes_count": 7}]},
        "releases": [],
        "prowlarr_data": hits,
        "prowlarr_search": search_term
    })
    .to_string()
}

// =============================================================================
// Show Fetch Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_show_parses_aggregate() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/shows/42")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(show_body(42, Some("Breaking Bad S01"), &["abc", "xyz"]))
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let show = client.fetch_show("42").await.unwrap();

    mock.assert_async().await;

    assert_eq!(show.id, "42");
    assert_eq!(show.title(), "Breaking Bad");
    assert_eq!(show.search_results.len(), 2);
    assert_eq!(show.search_results[1].primary_key, "xyz");
    assert_eq!(show.default_query(), "Breaking Bad S01");
}

#[tokio::test]
async fn test_fetch_show_404_is_not_found() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/shows/999")
        .with_status(404)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let err = client.fetch_show("999").await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound), "got {:?}", err);
}

#[tokio::test]
async fn test_fetch_show_null_body_is_not_found() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/shows/7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("null")
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let err = client.fetch_show("7").await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn test_fetch_show_server_error_is_rejected() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/shows/42")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let err = client.fetch_show("42").await.unwrap_err();
    assert!(matches!(err, GatewayError::RequestRejected(500)));
}

#[tokio::test]
async fn test_fetch_show_shape_mismatch_is_decode_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/shows/42")
        .with_status(200)
        .with_body(r#"{"id": 42, "tvdb_data": "not an object"}"#)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let err = client.fetch_show("42").await.unwrap_err();
    match err {
        GatewayError::Decode(msg) => assert!(msg.contains("JSON parse error")),
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Nothing listens on port 1
    let client = BackendClient::new("http://127.0.0.1:1");
    let err = client.fetch_show("42").await.unwrap_err();
    assert_eq!(err.kind(), "network");
}

// =============================================================================
// Action Tests
// =============================================================================

#[tokio::test]
async fn test_search_release_posts_query() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/shows/42/search_release")
        .match_body(Matcher::Json(json!({"query": "Breaking Bad S01"})))
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    assert_ok!(client.search_release("42", "Breaking Bad S01").await);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_release_ignores_response_body() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/shows/42/search_release")
        .with_status(202)
        .with_body("queued, not json")
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    assert_ok!(client.search_release("42", "").await);
}

#[tokio::test]
async fn test_grab_release_posts_release_pk() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/shows/42/grab")
        .match_body(Matcher::Json(json!({"release_pk": "abc"})))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    assert_ok!(client.grab_release("42", "abc").await);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_grab_release_rejected() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/shows/42/grab")
        .with_status(409)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let err = assert_err!(client.grab_release("42", "abc").await);
    assert!(matches!(err, GatewayError::RequestRejected(409)));
}

// =============================================================================
// Peripheral Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_list_shows_only_missing_query() {
    let mut server = Server::new_async().await;

    let missing = server
        .mock("GET", "/api/shows/")
        .match_query(Matcher::UrlEncoded("only_missing".into(), "1".into()))
        .with_status(200)
        .with_body(r#"[{"id": 1, "tvdb_data": {"title": "Dark", "year": 2017}, "missing_seasons": [3]}]"#)
        .expect(1)
        .create_async()
        .await;

    let all = server
        .mock("GET", "/api/shows/")
        .match_query(Matcher::UrlEncoded("only_missing".into(), "0".into()))
        .with_status(200)
        .with_body(r#"[]"#)
        .expect(1)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let shows = client.list_shows(true).await.unwrap();
    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0].missing_seasons, vec![3]);

    assert!(client.list_shows(false).await.unwrap().is_empty());

    missing.assert_async().await;
    all.assert_async().await;
}

#[tokio::test]
async fn test_list_logs_unwraps_records() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/logs")
        .with_status(200)
        .with_body(
            r#"{"records": [
                {"time": "2024-05-01T12:34:56+00:00", "level": "INFO", "component": "sync", "message": "started"},
                {"time": "garbage", "level": "ERROR", "component": "grab", "message": "failed"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let records = client.list_logs().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].time_display(), "2024-05-01 12:34:56");
    assert_eq!(records[1].time_display(), "garbage");
    assert!(records[1].is_error());
}

#[tokio::test]
async fn test_sync_all_posts() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/tasks/sync_all")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let client = BackendClient::new(format!("{}/", server.url()));
    assert_ok!(client.sync_all().await);

    mock.assert_async().await;
}
