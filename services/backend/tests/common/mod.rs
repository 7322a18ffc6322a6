//! Shared helpers for HTTP-level tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use song_service::{app, db::MemoryStore, models::Song, seed::seed_if_empty};
use tower::util::ServiceExt;

pub fn song(value: Value) -> Song {
    value.as_object().cloned().expect("song fixtures are objects")
}

/// Router backed by a fresh in-memory store seeded with `seed`.
pub async fn create_test_app(seed: Vec<Value>) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    seed_if_empty(store.as_ref(), seed.into_iter().map(song).collect())
        .await
        .unwrap();
    (app(store.clone()), store)
}

/// Sends one request and returns the status with the raw body bytes.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// Sends one request and decodes the response body as JSON (`Null` when empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let body = body.map(|b| b.to_string());
    let (status, bytes) = send_raw(app, method, uri, body.as_deref()).await;
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&bytes).unwrap())
}
