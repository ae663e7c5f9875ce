mod api;
mod config;
mod error;
mod state;


use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use gdpr_check_core::{LlmClient, LlmConfig};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gdpr_check_web=debug,gdpr_check_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let llm = LlmConfig::from_env();
    if !llm.has_api_key() {
        tracing::warn!("IO_INTELLIGENCE_API_KEY is not set; analysis requests will fail");
    }
    tracing::debug!(?llm, "Model API configuration");

    let analyzer = Arc::new(LlmClient::new(llm)?);
    let state = AppState::new(config.clone(), analyzer);
    let app = build_app(state, &config)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("GDPR compliance checker listening on http://{}", addr);
    tracing::info!("Health check: http://{}/api/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_app(state: AppState, config: &ServerConfig) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_str(&config.client_url)?)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Ok(Router::new()
        .nest("/api", api::router(config.body_limit()))
        .fallback(api::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
