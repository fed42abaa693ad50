mod config;
mod routes;
mod services;
mod state;

use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Before the filter is built, so RUST_LOG may come from .env.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solarplan=info,layout=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "failed to load .env");
        }
    }

    let config = config::ServerConfig::from_env()?;
    let catalog = config.load_catalog().await?;
    info!(path = %config.catalog_path.display(), panels = catalog.len(), "panel catalog loaded");

    let state = state::AppState::new(catalog, config.layout, config.max_sessions).with_idle_timeout(config.session_idle);
    services::session::spawn_session_reaper(state.clone());
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "solarplan listening");
    axum::serve(listener, app).await?;
    Ok(())
}
