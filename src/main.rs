use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopify_oauth_app::server::{make_router, AppState};
use shopify_oauth_app::store::InMemoryTokenStore;
use shopify_oauth_app::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment is used as is.
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopify_oauth_app=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("invalid app configuration")?;
    let server = ServerConfig::from_env().context("invalid server configuration")?;

    info!(
        api_version = %config.api_version(),
        scopes = %config.scopes(),
        redirect_uri = config.redirect_uri().as_ref(),
        "Loaded app configuration"
    );

    let state = AppState::new(config, Arc::new(InMemoryTokenStore::new()))
        .context("failed to build HTTP clients")?;
    let app = make_router(state, &server.static_dir);

    let listener = tokio::net::TcpListener::bind(server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", server.bind_addr))?;
    info!(addr = %server.bind_addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
