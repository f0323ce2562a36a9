pub mod analytics;
pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod state;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from ADHERA_LOG (falling back to the built-in filter).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ADHERA_LOG")
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
