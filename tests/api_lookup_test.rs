//! Tests for the read-only lookup endpoint.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use gridmatch::{session, DocumentStore, MemoryStore};
use std::sync::Arc;
use tower::ServiceExt;

async fn request(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, json)
}

#[tokio::test]
async fn test_lookup_returns_record() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let id = session::create_session(&store, "host").await.expect("create");
    let app = gridmatch::router(store);

    let (status, json) = request(app, &format!("/api/tictactoe?id={}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "waiting");
    assert_eq!(json["createdBy"], "host");
    assert_eq!(json["players"]["X"], "host");
    assert!(json["board"].is_string());
}

#[tokio::test]
async fn test_lookup_without_id_is_bad_request() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let app = gridmatch::router(store);

    let (status, json) = request(app, "/api/tictactoe").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Game ID is required");
}

#[tokio::test]
async fn test_lookup_unknown_id_is_not_found() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let app = gridmatch::router(store);

    let (status, json) = request(app, "/api/tictactoe?id=missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Game not found");
}
