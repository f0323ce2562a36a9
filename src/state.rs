//! Shared application state.
//!
//! The data source is chosen exactly once at startup and injected here;
//! there is no runtime toggle between demo and live data, so the analytics
//! core's purity guarantee cannot be violated by an ambient switch.

use std::path::PathBuf;

use rusqlite::Connection;

use crate::config::{self, AnalyticsConfig};
use crate::db::{self, DatabaseError};

/// Where the patient records live for the lifetime of the process.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// The user's database file.
    Live { db_path: PathBuf },
    /// A throwaway database seeded with fixture data.
    Demo { db_path: PathBuf },
}

impl DataSource {
    /// Resolve from ADHERA_DATA_SOURCE ("live" default, "demo" to seed a
    /// temporary database) and ADHERA_DB_PATH. Runs migrations, and seeds
    /// fixtures for the demo source.
    pub fn from_env() -> Result<Self, DatabaseError> {
        let mode = std::env::var("ADHERA_DATA_SOURCE").unwrap_or_default();
        if mode.trim().eq_ignore_ascii_case("demo") {
            let db_path = std::env::temp_dir()
                .join(format!("adhera-demo-{}.sqlite", std::process::id()));
            // A stale file from a recycled pid would double-seed.
            let _ = std::fs::remove_file(&db_path);
            let conn = db::open_database(&db_path)?;
            db::seed::seed_demo_data(&conn)?;
            tracing::info!(path = %db_path.display(), "Using demo data source");
            return Ok(Self::Demo { db_path });
        }

        let db_path = std::env::var("ADHERA_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config::database_path());
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;
        }
        // Open once up front so migrations run before the first request.
        db::open_database(&db_path)?;
        tracing::info!(path = %db_path.display(), "Using live data source");
        Ok(Self::Live { db_path })
    }

    pub fn db_path(&self) -> &PathBuf {
        match self {
            Self::Live { db_path } | Self::Demo { db_path } => db_path,
        }
    }
}

/// Shared by every request handler. Connections are opened per request,
/// like every other read path in the app.
pub struct AppState {
    data_source: DataSource,
    pub analytics: AnalyticsConfig,
}

impl AppState {
    pub fn new(data_source: DataSource, analytics: AnalyticsConfig) -> Self {
        Self {
            data_source,
            analytics,
        }
    }

    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(self.data_source.db_path())
    }
}
