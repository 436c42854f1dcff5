//! Common trait and record types for the published-image store

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A published gallery image
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PublishedImage {
    /// Server-assigned identity
    pub id: i64,

    /// URL of the generated image
    pub image_url: String,

    /// Prompt the image was generated from; may be empty
    pub prompt: String,

    /// Heart count; never negative
    pub hearts: i64,

    /// Set once at creation, immutable afterwards
    pub created_at: DateTime<Utc>,

    /// Owner account identifier (email)
    pub user_id: Option<String>,

    /// Owner display name
    pub user_name: Option<String>,
}

impl PublishedImage {
    /// Canonical wire form of the creation timestamp: RFC 3339 with
    /// millisecond precision and a `Z` suffix.
    pub fn created_at_text(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Fields supplied by the publish operation
#[derive(Debug, Clone)]
pub struct NewPublishedImage {
    pub image_url: String,
    pub prompt: String,
    pub user_id: String,
    pub user_name: Option<String>,
}

/// Trait for published-image persistence
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Total number of published images
    async fn count(&self) -> Result<u64>;

    /// A page of published images, newest first
    async fn list(&self, skip: u64, limit: u32) -> Result<Vec<PublishedImage>>;

    /// Atomically set the heart count; `None` when no record has that id
    async fn set_hearts(&self, id: i64, hearts: i64) -> Result<Option<PublishedImage>>;

    /// Persist a new image with a server-assigned id and `hearts = 0`
    async fn insert(&self, image: NewPublishedImage) -> Result<PublishedImage>;

    /// All images owned by the given user, newest first
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<PublishedImage>>;
}
