//! Feed handlers - paginated listing and heart updates

use axum::{
    extract::rejection::JsonRejection,
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::feed::{resolve_limit, resolve_page};
use crate::store::PublishedImage;
use crate::AppState;

/// Raw query parameters; resolution handles absent and non-numeric input
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    page: Option<String>,
    limit: Option<String>,
}

/// Wire form of a feed item
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    pub id: i64,
    pub image_url: String,
    pub prompt: String,
    pub hearts: i64,
    pub created_at: String,
}

impl From<&PublishedImage> for ImageBody {
    fn from(image: &PublishedImage) -> Self {
        Self {
            id: image.id,
            image_url: image.image_url.clone(),
            prompt: image.prompt.clone(),
            hearts: image.hearts,
            created_at: image.created_at_text(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedBody {
    pub images: Vec<ImageBody>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

/// GET /feed
pub async fn list_feed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedBody>> {
    let page = resolve_page(query.page.as_deref());
    let limit = resolve_limit(query.limit.as_deref());

    let feed = state.feed.list_feed(page, limit).await?;
    Ok(Json(FeedBody {
        images: feed.images.iter().map(ImageBody::from).collect(),
        total: feed.total,
        page: feed.page,
        total_pages: feed.total_pages,
    }))
}

/// PUT /feed body; options so missing fields get a 400, not a parse panic.
/// Non-integer numbers fail i64 deserialization and land in the rejection.
#[derive(Debug, Deserialize)]
pub struct UpdateHeartsBody {
    id: Option<i64>,
    hearts: Option<i64>,
}

/// PUT /feed
pub async fn update_hearts(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<UpdateHeartsBody>, JsonRejection>,
) -> Result<Json<ImageBody>> {
    let Json(body) = body.map_err(|_| {
        AppError::InvalidRequest(
            "Request body must be a JSON object with integer id and hearts".to_string(),
        )
    })?;

    let id = body
        .id
        .ok_or_else(|| AppError::InvalidRequest("id is required and must be a number".to_string()))?;
    let hearts = body.hearts.ok_or_else(|| {
        AppError::InvalidRequest("hearts is required and must be a non-negative integer".to_string())
    })?;

    let updated = state.feed.update_hearts(id, hearts).await?;
    Ok(Json(ImageBody::from(&updated)))
}
