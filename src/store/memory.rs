//! In-memory store implementation, used by tests and local development

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::error::Result;
use crate::store::traits::{FeedStore, NewPublishedImage, PublishedImage};

/// Vec-backed store; not durable
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    images: Vec<PublishedImage>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; ties on the timestamp fall back to the higher id, matching
/// insertion order within the same millisecond.
fn sorted_desc(mut images: Vec<PublishedImage>) -> Vec<PublishedImage> {
    images.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    images
}

#[async_trait]
impl FeedStore for MemoryStore {
    async fn count(&self) -> Result<u64> {
        Ok(self.inner.read().images.len() as u64)
    }

    async fn list(&self, skip: u64, limit: u32) -> Result<Vec<PublishedImage>> {
        let images = sorted_desc(self.inner.read().images.clone());
        Ok(images
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn set_hearts(&self, id: i64, hearts: i64) -> Result<Option<PublishedImage>> {
        let mut inner = self.inner.write();
        Ok(inner.images.iter_mut().find(|img| img.id == id).map(|img| {
            img.hearts = hearts;
            img.clone()
        }))
    }

    async fn insert(&self, image: NewPublishedImage) -> Result<PublishedImage> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let created = PublishedImage {
            id: inner.next_id,
            image_url: image.image_url,
            prompt: image.prompt,
            hearts: 0,
            created_at: Utc::now(),
            user_id: Some(image.user_id),
            user_name: image.user_name,
        };
        inner.images.push(created.clone());
        Ok(created)
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<PublishedImage>> {
        let images = self
            .inner
            .read()
            .images
            .iter()
            .filter(|img| img.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        Ok(sorted_desc(images))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_image(prompt: &str, user_id: &str) -> NewPublishedImage {
        NewPublishedImage {
            image_url: format!("https://img.example/{prompt}.png"),
            prompt: prompt.to_string(),
            user_id: user_id.to_string(),
            user_name: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids_and_zero_hearts() {
        let store = MemoryStore::new();
        let first = store.insert(new_image("a", "u@example.com")).await.unwrap();
        let second = store.insert(new_image("b", "u@example.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.hearts, 0);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemoryStore::new();
        store.insert(new_image("old", "u@example.com")).await.unwrap();
        store.insert(new_image("new", "u@example.com")).await.unwrap();

        let images = store.list(0, 10).await.unwrap();
        assert_eq!(images[0].prompt, "new");
        assert_eq!(images[1].prompt, "old");
    }

    #[tokio::test]
    async fn test_set_hearts_missing_id_is_none() {
        let store = MemoryStore::new();
        assert!(store.set_hearts(42, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_owner_filters() {
        let store = MemoryStore::new();
        store.insert(new_image("mine", "me@example.com")).await.unwrap();
        store.insert(new_image("theirs", "other@example.com")).await.unwrap();

        let mine = store.list_by_owner("me@example.com").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].prompt, "mine");
    }
}
