//! parley-relay: HTTP relay between chat clients and the Gemini API.
//!
//! Stateless per request; the provider credential never reaches the
//! browser. Also serves the static client assets.

mod config;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use crate::config::RelayConfig;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    configure_logging();

    let config = RelayConfig::from_env();
    if config.api_key.is_none() {
        tracing::warn!(
            "{} is not set; chat requests will be rejected",
            config::env::API_KEY
        );
    }

    let state = Arc::new(AppState::from_config(&config));
    let app = routes::router(state).fallback_service(ServeDir::new(&config.public_dir));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on {addr}");

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

fn configure_logging() {
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
