//! Plex client tests against a local mock server
//!
//! The mock answers the handful of endpoints the dashboard uses and rejects
//! any request without the expected `X-Plex-Token` header.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;

use plex_dedupe::dedupe::UNKNOWN;
use plex_dedupe::error::DedupeError;
use plex_dedupe::plex::{MediaServer, MediaServerConnector, PlexClient, PlexConnector, PlexSession};

const TOKEN: &str = "mock-token";

// ============================================================================
// Mock Plex
// ============================================================================

#[derive(Clone, Default)]
struct MockPlex {
    deleted: Arc<Mutex<Vec<(String, String)>>>,
    refuse_delete: bool,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("X-Plex-Token")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == TOKEN)
}

async fn identity(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "MediaContainer": { "machineIdentifier": "abc123", "version": "1.40.0" }
    }))
    .into_response()
}

async fn sections(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "MediaContainer": {
            "size": 2,
            "Directory": [
                { "key": "1", "title": "Movies", "type": "movie" },
                { "key": 2, "title": "TV Shows", "type": "show" }
            ]
        }
    }))
    .into_response()
}

fn dune() -> serde_json::Value {
    json!({
        "ratingKey": "101",
        "title": "Dune",
        "year": 2021,
        "Media": [
            {
                "id": 5001,
                "audioCodec": "truehd",
                "videoCodec": "hevc",
                "videoResolution": "4k",
                "Part": [{ "file": "/movies/Dune.2021.Remux.mkv", "size": 2048 }]
            },
            {
                "id": "5002",
                "videoResolution": "1080",
                "Part": [{ "file": "/movies/Dune.2021.mkv", "size": 1024 }]
            }
        ]
    })
}

async fn section_items(headers: HeaderMap, Path(key): Path<String>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let metadata = match key.as_str() {
        "1" => vec![dune(), json!({ "ratingKey": 102, "title": "Heat" })],
        _ => vec![],
    };
    Json(json!({ "MediaContainer": { "Metadata": metadata } })).into_response()
}

async fn metadata(headers: HeaderMap, Path(rating_key): Path<String>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if rating_key != "101" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({ "MediaContainer": { "Metadata": [dune()] } })).into_response()
}

async fn delete_media(
    State(mock): State<MockPlex>,
    headers: HeaderMap,
    Path((rating_key, media_id)): Path<(String, String)>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    if mock.refuse_delete {
        return StatusCode::FORBIDDEN;
    }
    mock.deleted.lock().unwrap().push((rating_key, media_id));
    StatusCode::OK
}

async fn spawn_mock(mock: MockPlex) -> SocketAddr {
    let app = Router::new()
        .route("/identity", get(identity))
        .route("/library/sections", get(sections))
        .route("/library/sections/{key}/all", get(section_items))
        .route("/library/metadata/{rating_key}", get(metadata))
        .route(
            "/library/metadata/{rating_key}/media/{media_id}",
            delete(delete_media),
        )
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn session(addr: SocketAddr, token: &str) -> PlexSession {
    PlexSession::new(
        Url::parse(&format!("http://{addr}")).unwrap(),
        token.to_string(),
        Duration::from_secs(5),
    )
}

// ============================================================================
// Connection
// ============================================================================

#[tokio::test]
async fn test_connect_with_valid_token() {
    let addr = spawn_mock(MockPlex::default()).await;
    let server = PlexConnector.connect(session(addr, TOKEN)).await.unwrap();

    let sections = server.sections().await.unwrap();
    assert_eq!(sections.len(), 2);
}

#[tokio::test]
async fn test_rejected_token_is_unreachable() {
    let addr = spawn_mock(MockPlex::default()).await;
    let result = PlexClient::connect(session(addr, "wrong")).await;

    assert_matches!(
        result,
        Err(DedupeError::MediaServiceUnreachable { reason, .. }) if reason.contains("token rejected")
    );
}

#[tokio::test]
async fn test_refused_connection_is_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = PlexClient::connect(session(addr, TOKEN)).await;
    assert_matches!(result, Err(DedupeError::MediaServiceUnreachable { .. }));
}

// ============================================================================
// Library Snapshots
// ============================================================================

#[tokio::test]
async fn test_sections_are_indexed_in_server_order() {
    let addr = spawn_mock(MockPlex::default()).await;
    let client = PlexClient::connect(session(addr, TOKEN)).await.unwrap();

    let sections = client.sections().await.unwrap();
    assert_eq!(sections[0].index, 0);
    assert_eq!(sections[0].title, "Movies");
    assert_eq!(sections[1].index, 1);
    assert_eq!(sections[1].key, "2");
    assert_eq!(sections[1].kind, "show");
}

#[tokio::test]
async fn test_items_with_media_versions() {
    let addr = spawn_mock(MockPlex::default()).await;
    let client = PlexClient::connect(session(addr, TOKEN)).await.unwrap();
    let movies = client.section(0).await.unwrap();

    let items = client.items(&movies).await.unwrap();
    assert_eq!(items.len(), 2);

    let dune = &items[0];
    assert_eq!(dune.media.len(), 2);
    assert_eq!(dune.media[0].id, "5001");
    assert_eq!(dune.media[0].item_key, "101");
    assert_eq!(dune.media[0].audio_codec, "truehd");
    assert_eq!(dune.media[0].size, 2048);
    assert_eq!(dune.media[1].id, "5002");
    assert_eq!(dune.media[1].audio_codec, UNKNOWN);
    assert_eq!(dune.media[1].filename(), Some("Dune.2021.mkv"));

    let heat = &items[1];
    assert_eq!(heat.rating_key, "102");
    assert_eq!(heat.year, None);
    assert!(heat.media.is_empty());
}

#[tokio::test]
async fn test_unknown_section_index() {
    let addr = spawn_mock(MockPlex::default()).await;
    let client = PlexClient::connect(session(addr, TOKEN)).await.unwrap();

    assert_matches!(client.section(7).await, Err(DedupeError::LibraryNotFound(7)));
}

#[tokio::test]
async fn test_fetch_missing_item() {
    let addr = spawn_mock(MockPlex::default()).await;
    let client = PlexClient::connect(session(addr, TOKEN)).await.unwrap();

    assert_matches!(
        client.fetch_item("999").await,
        Err(DedupeError::ItemNotFound(key)) if key == "999"
    );
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_resolved_media() {
    let mock = MockPlex::default();
    let deleted = mock.deleted.clone();
    let addr = spawn_mock(mock).await;
    let client = PlexClient::connect(session(addr, TOKEN)).await.unwrap();

    let media = client.resolve_media("101", "5002").await.unwrap();
    client.delete_media(&media).await.unwrap();

    assert_eq!(
        *deleted.lock().unwrap(),
        vec![("101".to_string(), "5002".to_string())]
    );
}

#[tokio::test]
async fn test_resolve_unknown_media() {
    let addr = spawn_mock(MockPlex::default()).await;
    let client = PlexClient::connect(session(addr, TOKEN)).await.unwrap();

    assert_matches!(
        client.resolve_media("101", "4242").await,
        Err(DedupeError::MediaNotFound { media_id, .. }) if media_id == "4242"
    );
}

#[tokio::test]
async fn test_refused_delete() {
    let mock = MockPlex {
        refuse_delete: true,
        ..Default::default()
    };
    let deleted = mock.deleted.clone();
    let addr = spawn_mock(mock).await;
    let client = PlexClient::connect(session(addr, TOKEN)).await.unwrap();

    let media = client.resolve_media("101", "5001").await.unwrap();
    let result = client.delete_media(&media).await;

    assert_matches!(
        result,
        Err(DedupeError::DeleteFailure { media_id, reason, .. })
            if media_id == "5001" && reason.contains("403")
    );
    assert!(deleted.lock().unwrap().is_empty());
}

// ============================================================================
// Id Encoding
// ============================================================================

#[tokio::test]
async fn test_item_id_cannot_leave_metadata_path() {
    let addr = spawn_mock(MockPlex::default()).await;
    let client = PlexClient::connect(session(addr, TOKEN)).await.unwrap();

    for key in ["../sections/1/all", "101?x=", "101#frag", "..", ""] {
        assert_matches!(
            client.fetch_item(key).await,
            Err(DedupeError::ItemNotFound(k)) if k == key,
            "rating key {key:?}"
        );
    }
}

#[tokio::test]
async fn test_crafted_item_id_deletes_nothing() {
    let mock = MockPlex::default();
    let deleted = mock.deleted.clone();
    let addr = spawn_mock(mock).await;
    let client = PlexClient::connect(session(addr, TOKEN)).await.unwrap();

    assert_matches!(
        client.resolve_media("../sections/1/all", "5002").await,
        Err(DedupeError::ItemNotFound(_))
    );
    assert!(deleted.lock().unwrap().is_empty());
}
