mod bootstrap;
mod chat;
mod config;
mod error;
mod handlers;
mod routes;
mod secrets;
mod state;
#[cfg(test)]
mod testing;
mod translate;

use anyhow::Result;
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lychakingo_backend=debug,tower_http=debug")),
        )
        .init();

    let settings = Settings::from_env();
    info!("Loaded settings: {settings:?}");

    // Write-once snapshot; a failed upstream shows up as a 500 at its
    // endpoint instead of taking the process down.
    let app_state = bootstrap::bootstrap(&settings).await;
    if !app_state.chat.is_ready() || !app_state.translator.is_ready() {
        warn!("Serving with one or more upstreams unconfigured");
    }

    let app = routes::app(app_state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
