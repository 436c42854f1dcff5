//! Generation handler - cooldown-limited image generation
//!
//! Identity and last-request tokens travel in headers both ways. The
//! last-request token advances only when an attempt is admitted (valid
//! prompt, cooldown clear); rejected attempts echo the previous value so a
//! denied call cannot extend the caller's wait.

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::gateway::CallerTokens;
use crate::AppState;

/// Header carrying the opaque caller identity
pub const IDENTITY_HEADER: &str = "x-gallery-identity";
/// Header carrying the Unix-millisecond timestamp of the last admitted attempt
pub const LAST_REQUEST_HEADER: &str = "x-gallery-last-request";

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    prompt: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationBody {
    pub image_url: String,
    pub prompt: String,
}

/// POST /generate
pub async fn generate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: std::result::Result<Json<GenerateBody>, JsonRejection>,
) -> Response {
    let tokens = CallerTokens::from_headers(
        headers.get(IDENTITY_HEADER).and_then(|v| v.to_str().ok()),
        headers.get(LAST_REQUEST_HEADER).and_then(|v| v.to_str().ok()),
    );
    let now_ms = Utc::now().timestamp_millis();

    // A malformed body simply carries no prompt and fails prompt validation.
    let prompt = body.ok().and_then(|Json(b)| b.prompt);

    let (last_request_ms, response) = match state.gateway.admit(prompt.as_deref(), &tokens, now_ms)
    {
        Ok(admitted) => {
            // Admitted attempts consume the cooldown even when the provider
            // then fails.
            let response = match state.gateway.generate(admitted).await {
                Ok(generation) => Json(GenerationBody {
                    image_url: generation.image_url,
                    prompt: generation.prompt,
                })
                .into_response(),
                Err(err) => err.into_response(),
            };
            (Some(now_ms), response)
        }
        Err(err) => (tokens.last_request_ms, err.into_response()),
    };

    with_tokens(response, &tokens.identity, last_request_ms)
}

/// Attach the caller tokens to every `/generate` response so the client can
/// replay them on its next call.
fn with_tokens(mut response: Response, identity: &str, last_request_ms: Option<i64>) -> Response {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(identity) {
        headers.insert(IDENTITY_HEADER, value);
    }
    if let Some(ms) = last_request_ms {
        if let Ok(value) = HeaderValue::from_str(&ms.to_string()) {
            headers.insert(LAST_REQUEST_HEADER, value);
        }
    }
    response
}
