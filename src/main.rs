use std::net::SocketAddr;
use std::sync::Arc;

use adhera::config::{self, AnalyticsConfig};
use adhera::state::{AppState, DataSource};

#[tokio::main]
async fn main() {
    adhera::init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let data_source = match DataSource::from_env() {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("Cannot initialize data source: {e}");
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(data_source, AnalyticsConfig::from_env()));

    let addr: SocketAddr = std::env::var("ADHERA_LISTEN")
        .unwrap_or_else(|_| "127.0.0.1:8420".into())
        .parse()
        .unwrap_or_else(|e| {
            tracing::error!("Invalid ADHERA_LISTEN address: {e}");
            std::process::exit(1);
        });

    let server = match adhera::api::start_server(state, addr).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Cannot bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Signal handler failed: {e}");
    }
    server.shutdown().await;
}
