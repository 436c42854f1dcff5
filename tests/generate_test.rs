//! Functional tests for the generation endpoint
//!
//! The upstream image provider is faked with wiremock; cooldown behavior is
//! exercised by replaying the token headers the endpoint hands back.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use gallery_gateway::{
    api::generate::{IDENTITY_HEADER, LAST_REQUEST_HEADER},
    config::Settings,
    feed::FeedService,
    gateway::{CooldownGate, GenerationGateway},
    provider::OpenAiProvider,
    store::MemoryStore,
    AppState,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn test_app(provider_base: &str) -> Router {
    let mut settings = Settings::default();
    settings.provider.base_url = provider_base.to_string();
    settings.provider.api_key = "test-key".to_string();
    settings.provider.timeout_ms = 5_000;

    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(OpenAiProvider::new(&settings.provider).unwrap());
    let gate = CooldownGate::new(Duration::from_secs(settings.generation.cooldown_secs));

    let state = Arc::new(AppState {
        feed: FeedService::new(store),
        gateway: GenerationGateway::new(provider, gate),
        settings,
    });
    gallery_gateway::api::routes::create_router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn generate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn generate_request_with_tokens(body: Value, identity: &str, last_request: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header("content-type", "application/json")
        .header(IDENTITY_HEADER, identity)
        .header(LAST_REQUEST_HEADER, last_request)
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn mount_provider_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1_700_000_000,
            "data": [{ "url": "https://img.example/fox.png" }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_missing_prompt_is_rejected() {
    let app = test_app("http://127.0.0.1:9");

    for body in [json!({}), json!({ "prompt": "" }), json!({ "prompt": "   " })] {
        let response = app.clone().oneshot(generate_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        // A fresh identity is still minted and handed back
        assert!(response.headers().contains_key(IDENTITY_HEADER));
        let error = body_json(response).await;
        assert!(error["error"].as_str().unwrap().contains("Prompt"));
    }
}

#[tokio::test]
async fn test_success_returns_image_url_and_trimmed_prompt() {
    let server = MockServer::start().await;
    mount_provider_success(&server).await;
    let app = test_app(&server.uri());

    let response = app
        .oneshot(generate_request(json!({ "prompt": "  a red fox  " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let identity = response
        .headers()
        .get(IDENTITY_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(Uuid::parse_str(&identity).is_ok(), "minted identity: {identity}");

    let last_request: i64 = response
        .headers()
        .get(LAST_REQUEST_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(last_request > 0);

    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({ "imageUrl": "https://img.example/fox.png", "prompt": "a red fox" })
    );
}

#[tokio::test]
async fn test_second_call_within_cooldown_is_rejected() {
    let server = MockServer::start().await;
    mount_provider_success(&server).await;
    let app = test_app(&server.uri());

    let first = app
        .clone()
        .oneshot(generate_request(json!({ "prompt": "a red fox" })))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let identity = first.headers()[IDENTITY_HEADER].to_str().unwrap().to_string();
    let last_request = first.headers()[LAST_REQUEST_HEADER]
        .to_str()
        .unwrap()
        .to_string();

    let second = app
        .oneshot(generate_request_with_tokens(
            json!({ "prompt": "a red fox" }),
            &identity,
            &last_request,
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    let wait: u64 = second.headers()["retry-after"].to_str().unwrap().parse().unwrap();
    assert!((1..=30).contains(&wait), "wait {wait} out of range");

    // Identity is echoed and the timestamp is not advanced by a rejection
    assert_eq!(second.headers()[IDENTITY_HEADER].to_str().unwrap(), identity);
    assert_eq!(
        second.headers()[LAST_REQUEST_HEADER].to_str().unwrap(),
        last_request
    );

    let body = body_json(second).await;
    assert!(body["error"].as_str().unwrap().contains(&wait.to_string()));
}

#[tokio::test]
async fn test_call_after_cooldown_window_succeeds() {
    let server = MockServer::start().await;
    mount_provider_success(&server).await;
    let app = test_app(&server.uri());

    let last_request = (Utc::now().timestamp_millis() - 31_000).to_string();
    let response = app
        .oneshot(generate_request_with_tokens(
            json!({ "prompt": "a red fox" }),
            "caller-1",
            &last_request,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[IDENTITY_HEADER].to_str().unwrap(), "caller-1");
}

#[tokio::test]
async fn test_future_timestamp_waits_at_most_the_window() {
    let app = test_app("http://127.0.0.1:9");

    let forged = (Utc::now().timestamp_millis() + 600_000).to_string();
    let response = app
        .oneshot(generate_request_with_tokens(
            json!({ "prompt": "a red fox" }),
            "caller-1",
            &forged,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let wait: u64 = response.headers()["retry-after"].to_str().unwrap().parse().unwrap();
    assert!(wait <= 30, "wait {wait} exceeds window");
}

#[tokio::test]
async fn test_garbage_timestamp_counts_as_no_previous_request() {
    let server = MockServer::start().await;
    mount_provider_success(&server).await;
    let app = test_app(&server.uri());

    let response = app
        .oneshot(generate_request_with_tokens(
            json!({ "prompt": "a red fox" }),
            "caller-1",
            "yesterday",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upstream_rate_limit_maps_to_429() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached for images per minute" }
        })))
        .mount(&server)
        .await;
    let app = test_app(&server.uri());

    let response = app
        .oneshot(generate_request(json!({ "prompt": "a red fox" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_upstream_auth_failure_is_generic_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided: test-key" }
        })))
        .mount(&server)
        .await;
    let app = test_app(&server.uri());

    let response = app
        .oneshot(generate_request(json!({ "prompt": "a red fox" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(!message.contains("test-key"), "credential leaked: {message}");
    assert!(!message.contains("Incorrect API key"));
}

#[tokio::test]
async fn test_upstream_error_message_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "model overloaded" }
        })))
        .mount(&server)
        .await;
    let app = test_app(&server.uri());

    let response = app
        .oneshot(generate_request(json!({ "prompt": "a red fox" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["error"], "model overloaded");
}

#[tokio::test]
async fn test_failed_provider_call_still_consumes_the_cooldown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "model overloaded" }
        })))
        .mount(&server)
        .await;
    let app = test_app(&server.uri());

    let first = app
        .clone()
        .oneshot(generate_request(json!({ "prompt": "a red fox" })))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);
    // The attempt was admitted, so a fresh timestamp is handed back
    let identity = first.headers()[IDENTITY_HEADER].to_str().unwrap().to_string();
    let last_request = first.headers()[LAST_REQUEST_HEADER]
        .to_str()
        .unwrap()
        .to_string();

    let second = app
        .oneshot(generate_request_with_tokens(
            json!({ "prompt": "a red fox" }),
            &identity,
            &last_request,
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}
