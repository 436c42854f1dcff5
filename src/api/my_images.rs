//! Per-owner image listing

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::publish::PublishedBody;
use crate::error::Result;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MyImagesQuery {
    email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MyImagesBody {
    pub images: Vec<PublishedBody>,
}

/// GET /my-images
pub async fn my_images(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MyImagesQuery>,
) -> Result<Json<MyImagesBody>> {
    let Some(email) = query
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        // No owner to look up; an empty list, not an error
        return Ok(Json(MyImagesBody { images: Vec::new() }));
    };

    let images = state.feed.images_for_owner(email).await?;
    Ok(Json(MyImagesBody {
        images: images.iter().map(PublishedBody::from).collect(),
    }))
}
