mod auth;
mod config;
mod cv;
mod db;
mod errors;
mod github;
mod llm_client;
mod matching;
mod models;
mod profile;
mod routes;
mod skills;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::HttpTokenVerifier;
use crate::config::Config;
use crate::db::create_pool;
use crate::github::client::GithubClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgSkillStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sonara API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize AI gateway client
    let llm = LlmClient::new(config.ai_gateway_url.clone(), config.ai_gateway_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let github = GithubClient::new(config.github_api_url.clone(), config.github_token.clone())?;
    if config.github_token.is_none() {
        info!("GITHUB_TOKEN not set; GitHub requests are unauthenticated and rate limited");
    }

    let auth = HttpTokenVerifier::new(
        config.auth_service_url.clone(),
        config.auth_service_key.clone(),
    )?;

    let state = AppState {
        store: Arc::new(PgSkillStore::new(db)),
        llm: Arc::new(llm),
        github: Arc::new(github),
        auth: Arc::new(auth),
    };

    // Browser clients call from any origin
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
