//! OpenAI-compatible HTTP image provider

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::{AppError, Result};
use crate::provider::traits::ImageProvider;

/// Client for the `POST /v1/images/generations` API shape
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    image_size: String,
}

#[derive(Debug, Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    error: UpstreamErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}

impl OpenAiProvider {
    /// Create a provider client from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            image_size: config.image_size.clone(),
        })
    }
}

#[async_trait]
impl ImageProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/images/generations", self.base_url);
        debug!(provider = self.name(), model = %self.model, "Sending generate request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ImagesRequest {
                model: &self.model,
                prompt,
                n: 1,
                size: &self.image_size,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(provider = self.name(), status = %status, "Provider returned an error");
            return Err(match status {
                // Never forward the upstream auth detail to callers
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::ProviderAuth,
                StatusCode::TOO_MANY_REQUESTS => AppError::ProviderRateLimited,
                _ => match serde_json::from_str::<UpstreamError>(&body) {
                    Ok(parsed) => AppError::Provider(parsed.error.message),
                    Err(_) => AppError::Provider(format!("Image provider returned {}", status)),
                },
            });
        }

        let parsed: ImagesResponse = response.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| AppError::Provider("Image provider returned no image".to_string()))
    }
}
