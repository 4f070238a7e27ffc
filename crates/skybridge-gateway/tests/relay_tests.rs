// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the relay router over the full HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use skybridge_gateway::{router, AppState};
use skybridge_openai::{CompletionClient, CompletionSettings};
use skybridge_queue::{ManualClock, MessageQueue, DEFAULT_LEASE_SECS};

const KEY: &str = "mysecret";

fn test_router(upstream: &str, clock: Arc<ManualClock>) -> Router {
    let completions = CompletionClient::new(CompletionSettings {
        api_key: "test-key".into(),
        model: "gpt-4o-mini".into(),
        base_url: upstream.to_string(),
        system_prompt: "You are terse.".into(),
        include_history: false,
    })
    .unwrap();

    router(AppState {
        queue: Arc::new(MessageQueue::new(
            clock,
            chrono::Duration::seconds(DEFAULT_LEASE_SECS),
        )),
        completions,
        detector_key: KEY.into(),
        history_limit: 8,
        heartbeat: Duration::from_secs(25),
    })
}

fn detector_router() -> (Router, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    // Upstream address that is never dialed by detector tests.
    (test_router("http://127.0.0.1:1/", clock.clone()), clock)
}

fn post_json(uri: &str, key: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _) = detector_router();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn push_requires_the_key() {
    let (app, _) = detector_router();

    let response = app
        .clone()
        .oneshot(post_json("/push", None, json!({"text": "hi"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({"ok": false, "err": "auth"}));

    let response = app
        .oneshot(post_json("/push", Some("wrong"), json!({"text": "hi"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn push_accepts_the_key_in_the_body() {
    let (app, _) = detector_router();

    let response = app
        .oneshot(post_json("/push", None, json!({"text": "hi", "key": KEY})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert!(body.get("id").is_some());
}

#[tokio::test]
async fn push_rejects_empty_text() {
    let (app, _) = detector_router();

    let response = app
        .oneshot(post_json("/push", Some(KEY), json!({"text": "   "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"ok": false, "err": "empty"}));
}

#[tokio::test]
async fn detector_round_trip() {
    let (app, _) = detector_router();

    let response = app
        .clone()
        .oneshot(post_json("/push", Some(KEY), json!({"text": "hello world"})))
        .await
        .unwrap();
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    // First poller claims the message.
    let response = app
        .clone()
        .oneshot(get("/latest?clientId=glasses-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let claimed = body_json(response).await;
    assert_eq!(claimed["id"], id);
    assert_eq!(claimed["text"], "hello world");
    assert!(claimed.get("ts").is_some());
    assert!(claimed.get("claimExpiry").is_some());

    // A second poller sees the nothing shape while the lease is live.
    let response = app
        .clone()
        .oneshot(get("/latest?clientId=glasses-2"))
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await,
        json!({"id": null, "text": "", "ts": null})
    );

    // The holder acks; the queue is drained.
    let response = app
        .clone()
        .oneshot(post_json(
            "/ack",
            Some(KEY),
            json!({"id": id, "clientId": "glasses-1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"ok": true}));

    let response = app.oneshot(get("/latest?clientId=glasses-1")).await.unwrap();
    assert_eq!(body_json(response).await["id"], Value::Null);
}

#[tokio::test]
async fn duplicate_push_reports_dup() {
    let (app, _) = detector_router();

    let response = app
        .clone()
        .oneshot(post_json("/push", Some(KEY), json!({"text": "again"})))
        .await
        .unwrap();
    let first = body_json(response).await;
    assert!(first.get("dup").is_none());

    let response = app
        .oneshot(post_json("/push", Some(KEY), json!({"text": "again"})))
        .await
        .unwrap();
    let second = body_json(response).await;
    assert_eq!(second["dup"], true);
    assert_eq!(second["id"], first["id"]);
}

#[tokio::test]
async fn expired_lease_moves_on_and_stale_ack_conflicts() {
    let (app, clock) = detector_router();

    let response = app
        .clone()
        .oneshot(post_json("/push", Some(KEY), json!({"text": "work"})))
        .await
        .unwrap();
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(get("/latest?clientId=slow-client"))
        .await
        .unwrap();

    clock.advance(chrono::Duration::seconds(DEFAULT_LEASE_SECS + 1));

    // Lease expired; a second client takes over.
    let response = app
        .clone()
        .oneshot(get("/latest?clientId=fast-client"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["id"], id);

    // The original holder's ack is rejected and names the new holder.
    let response = app
        .clone()
        .oneshot(post_json(
            "/ack",
            Some(KEY),
            json!({"id": id, "clientId": "slow-client"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["err"], "not-claimed-by-client");
    assert_eq!(body["claimedBy"], "fast-client");

    let response = app
        .oneshot(post_json(
            "/ack",
            Some(KEY),
            json!({"id": id, "clientId": "fast-client"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn ack_validates_its_arguments() {
    let (app, _) = detector_router();

    let response = app
        .clone()
        .oneshot(post_json("/ack", Some(KEY), json!({"id": "abc"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["err"], "badargs");

    // Unknown and malformed ids both land on notfound.
    let response = app
        .clone()
        .oneshot(post_json(
            "/ack",
            Some(KEY),
            json!({"id": uuid::Uuid::new_v4().to_string(), "clientId": "c1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(post_json(
            "/ack",
            Some(KEY),
            json!({"id": "not-a-uuid", "clientId": "c1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["err"], "notfound");
}

#[tokio::test]
async fn debug_list_shows_everything() {
    let (app, _) = detector_router();

    app.clone()
        .oneshot(post_json("/push", Some(KEY), json!({"text": "one"})))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json("/push", Some(KEY), json!({"text": "two"})))
        .await
        .unwrap();
    app.clone()
        .oneshot(get("/latest?clientId=c1"))
        .await
        .unwrap();

    let response = app.oneshot(get("/_debug/list")).await.unwrap();
    let body = body_json(response).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["claimedBy"], "c1");
    assert_eq!(list[1]["claimedBy"], Value::Null);
}

#[tokio::test]
async fn chat_returns_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"output_text": "Hello aloud."})),
        )
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let app = test_router(&server.uri(), clock);

    let response = app
        .oneshot(post_json("/chat", None, json!({"text": "greet me"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Hello aloud.");
}

#[tokio::test]
async fn chat_rejects_missing_text() {
    let (app, _) = detector_router();

    let response = app
        .oneshot(post_json("/chat", None, json!({"text": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "No text");
}

#[tokio::test]
async fn chat_propagates_upstream_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let app = test_router(&server.uri(), clock);

    let response = app
        .oneshot(post_json("/chat", None, json!({"text": "hi"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_text(response).await, "rate limited");
}

#[tokio::test]
async fn chat_sse_streams_deltas_then_done() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(concat!(
                    "data: {\"delta\":\"Hel\"}\n\n",
                    "data: {\"delta\":\"lo\"}\n\n",
                    "data: [DONE]\n\n",
                )),
        )
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let app = test_router(&server.uri(), clock);

    let response = app.oneshot(get("/chat-sse?q=say+hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"));

    let body = body_text(response).await;
    let hel = body.find("data: \"Hel\"").unwrap();
    let lo = body.find("data: \"lo\"").unwrap();
    let done = body.find("data: [DONE]").unwrap();
    assert!(hel < lo && lo < done, "frames out of order: {body}");
}

#[tokio::test]
async fn chat_sse_rejects_missing_q() {
    let (app, _) = detector_router();

    let response = app.oneshot(get("/chat-sse")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing q");
}

#[tokio::test]
async fn chat_sse_reports_upstream_open_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let app = test_router(&server.uri(), clock);

    let response = app.oneshot(get("/chat-sse?q=hi")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_text(response).await, "Upstream error: boom");
}

#[tokio::test]
async fn cors_preflight_is_permissive() {
    let (app, _) = detector_router();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/push")
        .header("origin", "https://example.test")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "x-api-key")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
