use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Adhera";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when ADHERA_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info,adhera=debug"
}

/// Get the application data directory
/// ~/Adhera/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Adhera")
}

/// Default path for the live SQLite database.
pub fn database_path() -> PathBuf {
    app_data_dir().join("adhera.sqlite")
}

/// Tunable policy constants for the analytics core. Resolved once at
/// startup; the algorithms never read the environment themselves.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsConfig {
    /// Length of the post-dose window an event must fall into to count as
    /// "following" that dose.
    pub post_dose_window_hours: i64,
    /// Look-back for the dashboard "recent" count.
    pub recent_window_days: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            post_dose_window_hours: 24,
            recent_window_days: 7,
        }
    }
}

impl AnalyticsConfig {
    /// Read overrides from ADHERA_POST_DOSE_WINDOW_HOURS and
    /// ADHERA_RECENT_WINDOW_DAYS; anything unparseable keeps the default.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(hours) = env_i64("ADHERA_POST_DOSE_WINDOW_HOURS") {
            if hours > 0 {
                cfg.post_dose_window_hours = hours;
            }
        }
        if let Some(days) = env_i64("ADHERA_RECENT_WINDOW_DAYS") {
            if days > 0 {
                cfg.recent_window_days = days;
            }
        }
        cfg
    }

    pub fn post_dose_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.post_dose_window_hours)
    }

    pub fn recent_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.recent_window_days)
    }
}

fn env_i64(key: &str) -> Option<i64> {
    std::env::var(key).ok()?.trim().parse().ok()
}
