//! API server lifecycle — bind → spawn background task → return a handle
//! with a shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::state::AppState;

/// Handle to a running API server.
pub struct ApiServer {
    pub local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl ApiServer {
    /// Shut down the server gracefully and wait for the task to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
        let _ = self.handle.await;
    }
}

/// Bind the API server on `addr` (port 0 picks an ephemeral port) and
/// serve in a background task.
pub async fn start_server(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<ApiServer> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let router = api_router(state);

    let handle = tokio::spawn(async move {
        let serve = axum::serve(listener, router).with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });
        if let Err(e) = serve.await {
            tracing::error!("API server error: {e}");
        }
    });

    tracing::info!(%local_addr, "API server listening");

    Ok(ApiServer {
        local_addr,
        shutdown_tx: Some(shutdown_tx),
        handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::db;
    use crate::state::DataSource;

    #[tokio::test]
    async fn server_binds_ephemeral_port_and_shuts_down() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("srv.sqlite");
        db::open_database(&db_path).unwrap();

        let state = Arc::new(AppState::new(
            DataSource::Live { db_path },
            AnalyticsConfig::default(),
        ));
        let server = start_server(state, "127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        assert_ne!(server.local_addr.port(), 0);
        server.shutdown().await;
    }
}
