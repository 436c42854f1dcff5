//! Generation gateway - prompt validation, per-identity cooldown, and
//! forwarding to the external image provider

pub mod cooldown;

pub use cooldown::{CooldownDecision, CooldownGate};

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::provider::ImageProvider;

/// Client-held tokens carried on generate requests
#[derive(Debug, Clone)]
pub struct CallerTokens {
    /// Opaque identity token; minted when the caller presents none
    pub identity: String,
    /// Unix-millisecond timestamp of the caller's last admitted attempt
    pub last_request_ms: Option<i64>,
}

impl CallerTokens {
    /// Build tokens from raw header values, minting a fresh identity when
    /// none is presented. Unparseable timestamps count as "no previous
    /// request".
    pub fn from_headers(identity: Option<&str>, last_request: Option<&str>) -> Self {
        let identity = identity
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let last_request_ms = last_request.and_then(|s| s.trim().parse::<i64>().ok());
        Self {
            identity,
            last_request_ms,
        }
    }
}

/// Result of an admitted, successful generation
#[derive(Debug, Clone)]
pub struct Generation {
    pub image_url: String,
    pub prompt: String,
}

/// Gateway in front of the external image model
pub struct GenerationGateway {
    provider: Arc<dyn ImageProvider>,
    gate: CooldownGate,
}

impl GenerationGateway {
    pub fn new(provider: Arc<dyn ImageProvider>, gate: CooldownGate) -> Self {
        Self { provider, gate }
    }

    /// Validate the prompt and the caller's cooldown state. Returns the
    /// trimmed prompt when the attempt is admitted; the caller's
    /// last-request token should advance only on `Ok`.
    pub fn admit<'a>(
        &self,
        prompt: Option<&'a str>,
        tokens: &CallerTokens,
        now_ms: i64,
    ) -> Result<&'a str> {
        let trimmed = prompt.map(str::trim).unwrap_or("");
        if trimmed.is_empty() {
            return Err(AppError::InvalidRequest(
                "Prompt is required and must be a non-empty string".to_string(),
            ));
        }

        if let CooldownDecision::Blocked { wait_secs } =
            self.gate.check(tokens.last_request_ms, now_ms)
        {
            debug!(identity = %tokens.identity, wait_secs, "Generation blocked by cooldown");
            return Err(AppError::CooldownActive { wait_secs });
        }

        Ok(trimmed)
    }

    /// Forward an admitted prompt to the provider
    pub async fn generate(&self, prompt: &str) -> Result<Generation> {
        let image_url = self.provider.generate(prompt).await?;
        info!(provider = self.provider.name(), "Generated image");
        Ok(Generation {
            image_url,
            prompt: prompt.to_string(),
        })
    }
}
