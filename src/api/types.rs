//! Shared types for the API layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::state::AppState;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
}

impl ApiContext {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

/// Date window query parameters shared by timeline/impact endpoints.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
}

impl RangeQuery {
    /// Parse both bounds as RFC 3339 timestamps; the range ordering check
    /// itself belongs to the analytics core.
    pub fn parse(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
        Ok((parse_ts("start", &self.start)?, parse_ts("end", &self.end)?))
    }
}

pub(crate) fn parse_ts(field: &str, raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            ApiError::BadRequest(format!(
                "{field} must be an RFC 3339 timestamp, got {raw:?}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_query_parses_rfc3339() {
        let query = RangeQuery {
            start: "2026-01-01T00:00:00Z".into(),
            end: "2026-02-01T00:00:00Z".into(),
        };
        let (start, end) = query.parse().unwrap();
        assert!(start < end);
    }

    #[test]
    fn bad_timestamp_names_the_field() {
        let query = RangeQuery {
            start: "January".into(),
            end: "2026-02-01T00:00:00Z".into(),
        };
        let err = query.parse().unwrap_err();
        assert!(err.to_string().contains("start"));
    }
}
