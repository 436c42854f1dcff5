//! PostgreSQL store implementation

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::store::traits::{FeedStore, NewPublishedImage, PublishedImage};

const IMAGE_COLUMNS: &str = "id, image_url, prompt, hearts, created_at, user_id, user_name";

/// sqlx-backed store over a shared connection pool
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect a pool and run pending migrations
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }
}

#[async_trait]
impl FeedStore for PostgresStore {
    async fn count(&self) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM published_images")
            .fetch_one(&self.pool)
            .await?;
        Ok(total as u64)
    }

    async fn list(&self, skip: u64, limit: u32) -> Result<Vec<PublishedImage>> {
        let images = sqlx::query_as::<_, PublishedImage>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM published_images \
             ORDER BY created_at DESC, id DESC OFFSET $1 LIMIT $2"
        ))
        .bind(skip as i64)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(images)
    }

    async fn set_hearts(&self, id: i64, hearts: i64) -> Result<Option<PublishedImage>> {
        // Single statement, so the update is atomic and a missing row is
        // observable as a distinct condition rather than a generic error.
        let updated = sqlx::query_as::<_, PublishedImage>(&format!(
            "UPDATE published_images SET hearts = $2 WHERE id = $1 RETURNING {IMAGE_COLUMNS}"
        ))
        .bind(id)
        .bind(hearts)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn insert(&self, image: NewPublishedImage) -> Result<PublishedImage> {
        let created = sqlx::query_as::<_, PublishedImage>(&format!(
            "INSERT INTO published_images (image_url, prompt, hearts, user_id, user_name) \
             VALUES ($1, $2, 0, $3, $4) RETURNING {IMAGE_COLUMNS}"
        ))
        .bind(&image.image_url)
        .bind(&image.prompt)
        .bind(&image.user_id)
        .bind(&image.user_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<PublishedImage>> {
        let images = sqlx::query_as::<_, PublishedImage>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM published_images \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(images)
    }
}
