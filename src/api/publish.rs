//! Publish handler - add a generated image to the public feed

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::store::{NewPublishedImage, PublishedImage};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishBody {
    image_url: Option<String>,
    prompt: Option<String>,
    user_id: Option<String>,
    user_name: Option<String>,
}

/// Wire form of a published record, owner fields included
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedBody {
    pub id: i64,
    pub image_url: String,
    pub prompt: String,
    pub hearts: i64,
    pub created_at: String,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

impl From<&PublishedImage> for PublishedBody {
    fn from(image: &PublishedImage) -> Self {
        Self {
            id: image.id,
            image_url: image.image_url.clone(),
            prompt: image.prompt.clone(),
            hearts: image.hearts,
            created_at: image.created_at_text(),
            user_id: image.user_id.clone(),
            user_name: image.user_name.clone(),
        }
    }
}

/// POST /publish
pub async fn publish(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<PublishBody>, JsonRejection>,
) -> Result<Json<PublishedBody>> {
    let Json(body) = body
        .map_err(|_| AppError::InvalidRequest("Request body must be a JSON object".to_string()))?;

    let image_url = body
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::InvalidRequest(
                "imageUrl is required and must be a non-empty string".to_string(),
            )
        })?;

    // Prompt must be present but may be empty
    let prompt = body.prompt.ok_or_else(|| {
        AppError::InvalidRequest("prompt is required and must be a string".to_string())
    })?;

    // Missing owner identity is an authorization failure, not a bad request
    let user_id = body
        .user_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("userId is required and must be a string".to_string())
        })?;

    let created = state
        .feed
        .publish(NewPublishedImage {
            image_url: image_url.to_string(),
            prompt,
            user_id: user_id.to_string(),
            user_name: body.user_name.filter(|s| !s.is_empty()),
        })
        .await?;

    Ok(Json(PublishedBody::from(&created)))
}
