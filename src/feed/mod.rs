//! Feed service - pagination, heart updates, publishing, per-owner listing

pub mod pagination;

pub use pagination::{resolve_limit, resolve_page, total_pages};

use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::store::{FeedStore, NewPublishedImage, PublishedImage};

/// A resolved page of the public feed
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub images: Vec<PublishedImage>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

/// Read/write operations over the published-image store
pub struct FeedService {
    store: Arc<dyn FeedStore>,
}

impl FeedService {
    pub fn new(store: Arc<dyn FeedStore>) -> Self {
        Self { store }
    }

    /// Paginated feed, newest first. Expects `page` and `limit` already
    /// resolved through [`resolve_page`] / [`resolve_limit`].
    pub async fn list_feed(&self, page: u32, limit: u32) -> Result<FeedPage> {
        let page = page.max(1);
        let limit = limit.max(1);
        let skip = u64::from(page - 1) * u64::from(limit);

        let total = self.store.count().await?;
        let images = self.store.list(skip, limit).await?;
        debug!(page, limit, total, "Fetched feed page");

        Ok(FeedPage {
            images,
            total,
            page,
            total_pages: total_pages(total, limit),
        })
    }

    /// Atomic heart-count update. Negative values are rejected; an unknown
    /// id is a not-found failure, kept distinct from datastore errors.
    pub async fn update_hearts(&self, id: i64, hearts: i64) -> Result<PublishedImage> {
        if hearts < 0 {
            return Err(AppError::InvalidRequest(
                "hearts is required and must be a non-negative integer".to_string(),
            ));
        }

        self.store
            .set_hearts(id, hearts)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))
    }

    /// Persist a new published image; the store assigns id, hearts and
    /// creation time.
    pub async fn publish(&self, image: NewPublishedImage) -> Result<PublishedImage> {
        let created = self.store.insert(image).await?;
        debug!(id = created.id, "Published image");
        Ok(created)
    }

    pub async fn images_for_owner(&self, user_id: &str) -> Result<Vec<PublishedImage>> {
        self.store.list_by_owner(user_id).await
    }
}
