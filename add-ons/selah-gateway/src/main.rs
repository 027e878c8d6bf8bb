//! Selah Gateway: HTTP front for the voice companion pipeline.
//!
//! Routing and CORS only; every behavior lives in `selah-core`.

mod handlers;
mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use handlers::{advice, health, voice};
use selah_core::{SelahConfig, VoicePipeline};
use state::AppState;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Uploaded clips up to 25 MB.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/voice", post(voice::voice_handler))
        .route("/voice/language", post(voice::language_handler))
        .route("/advice", post(advice::advice_handler))
        .route("/advice/batch", post(advice::batch_handler))
        .route("/languages", get(advice::languages_handler))
        .route("/translations/cache", delete(advice::clear_cache_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let config = match SelahConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[selah-gateway] {}", e);
            std::process::exit(1);
        }
    };

    let default_filter = if config.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = match VoicePipeline::from_config(&config)
        .and_then(|pipeline| AppState::new(config, pipeline))
    {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build voice pipeline");
            std::process::exit(1);
        }
    };

    let addr = state.config.bind_addr();
    tracing::info!(app = %state.config.app_name, %addr, source_language = %state.source_language, "Starting gateway");
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, build_app(state)).await {
        tracing::error!(error = %e, "Server error");
    }
}
