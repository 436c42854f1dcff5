//! Common trait for image-generation providers

use async_trait::async_trait;

use crate::error::Result;

/// Trait for external image-generation providers
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Provider name, for logs
    fn name(&self) -> &str;

    /// Generate a single image for the prompt and return its URL
    async fn generate(&self, prompt: &str) -> Result<String>;
}
