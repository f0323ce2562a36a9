//! Dashboard endpoints.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;

use crate::analytics::{self, DashboardSummary};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// `GET /api/patients/:id/dashboard` — rolled-up counts with the
/// configurable recent look-back.
pub async fn summary(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let conn = ctx.state.open_db()?;
    let summary = analytics::dashboard_summary(&conn, &ctx.state.analytics, &patient_id)?;
    Ok(Json(summary))
}

/// `GET /api/patients/:id/dashboard/weekly` — eight trailing weekly
/// snapshots, zero-filled when the history is shorter.
pub async fn weekly(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<BTreeMap<String, DashboardSummary>>, ApiError> {
    let conn = ctx.state.open_db()?;
    let summaries = analytics::weekly_summaries(&conn, &patient_id)?;
    Ok(Json(summaries))
}
