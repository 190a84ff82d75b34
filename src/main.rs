mod api;
mod config;
mod dates;
mod error;
mod filter;
mod igdb;
mod rawg;
mod sitemap;
mod slug;
mod timefilter;
mod upstream;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use dates::SystemClock;
use upstream::HttpTransport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gamefeed=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    if config.rawg.api_key.is_none() {
        warn!("RAWG_KEY is not set; RAWG endpoints will answer 500");
    }
    if config.igdb.client_id.is_none() || config.igdb.client_secret.is_none() {
        info!("IGDB credentials not set; /api/igdb is disabled");
    }

    let transport = Arc::new(HttpTransport::new(config.upstream_timeout)?);
    let state = api::AppState::new(&config, transport, Arc::new(SystemClock));
    let app = api::build_router(state);

    let address = format!("{}:{}", config.bind, config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
