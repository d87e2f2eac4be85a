mod config;
mod credentials;
mod errors;
mod llm_client;
mod promo;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::promo::submission::SubmissionGate;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::open_store;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Song Promo API v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config).await?;

    // Credential is read once per process
    let credentials = CredentialStore::load(store.clone(), &config.gemini_api_base).await?;
    if let Some(key) = &config.gemini_api_key {
        let status = credentials.status().await?;
        if !status.stored && !credentials.set_credential(key).await {
            warn!("GEMINI_API_KEY from the environment was rejected");
        }
    }
    info!(
        "LLM client {} (model: {})",
        if credentials.is_ready().await {
            "initialized"
        } else {
            "waiting for an API key"
        },
        llm_client::MODEL
    );

    let state = AppState {
        store,
        credentials: Arc::new(credentials),
        submissions: SubmissionGate::default(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
