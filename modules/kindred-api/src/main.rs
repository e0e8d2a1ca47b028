use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::OpenAiEmbedder;
use exa_client::ExaClient;
use kindred_common::Config;
use kindred_pipeline::{MemoryStore, Pipeline, ProfileStore};

mod events;
mod rest;

use events::ProfileEvents;

pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub pipeline: Arc<Pipeline>,
    pub events: Arc<ProfileEvents>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("kindred=info".parse()?))
        .init();

    let config = Config::from_env();

    let store: Arc<dyn ProfileStore> = Arc::new(MemoryStore::new());
    let events = Arc::new(ProfileEvents::new());

    let pipeline = Arc::new(
        Pipeline::new(
            Arc::new(ExaClient::new(&config.exa_api_key)),
            Arc::new(OpenAiEmbedder::new(&config.openai_api_key)),
            store.clone(),
        )
        .with_notifier(events.clone())
        .with_deadline(config.pipeline_deadline),
    );

    let state = Arc::new(AppState {
        store,
        pipeline,
        events,
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Profiles
        .route(
            "/api/profile",
            post(rest::create_profile)
                .get(rest::get_profile)
                .delete(rest::delete_profile),
        )
        .route("/api/profile/{id}/updates", get(rest::profile_updates))
        // Matching
        .route("/api/match", get(rest::find_match))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!(%addr, "Kindred API listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
