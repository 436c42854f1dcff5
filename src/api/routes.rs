//! Route table for the gallery API

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{feed, generate, my_images, publish};
use crate::AppState;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/feed", get(feed::list_feed).put(feed::update_hearts))
        .route("/generate", post(generate::generate))
        .route("/publish", post(publish::publish))
        .route("/my-images", get(my_images::my_images))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
