//! AI Image Gallery Gateway
//!
//! Backend API for an AI image-generation gallery: a paginated public feed
//! of published images with heart counts, a publish endpoint, per-owner
//! listings, and a cooldown-limited generation endpoint in front of an
//! external image model.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod gateway;
pub mod provider;
pub mod store;

pub use error::{AppError, Result};

use feed::FeedService;
use gateway::GenerationGateway;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: config::Settings,
    pub feed: FeedService,
    pub gateway: GenerationGateway,
}
