//! Main entry point for the gallery gateway

use gallery_gateway::{
    api,
    config::Settings,
    feed::FeedService,
    gateway::{CooldownGate, GenerationGateway},
    provider::OpenAiProvider,
    store::PostgresStore,
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .init();

    info!("Starting gallery gateway");

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;
    info!(
        "Loaded configuration: server={}:{}",
        settings.server.host, settings.server.port
    );

    // Connect the datastore and run migrations
    let store = Arc::new(PostgresStore::connect(&settings.database).await?);

    // Provider client and cooldown gate
    let provider = Arc::new(OpenAiProvider::new(&settings.provider)?);
    let gate = CooldownGate::new(Duration::from_secs(settings.generation.cooldown_secs));

    // Create application state
    let app_state = Arc::new(AppState {
        feed: FeedService::new(store),
        gateway: GenerationGateway::new(provider, gate),
        settings: settings.clone(),
    });

    // Build the router
    let app = api::routes::create_router(app_state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Server listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
