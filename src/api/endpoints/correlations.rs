//! Dose→event correlation endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::analytics::{self, CorrelationAnalysis};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, RangeQuery};

/// `GET /api/patients/:id/correlations` — one analysis per medication the
/// patient has dosage history for.
pub async fn list(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<CorrelationAnalysis>>, ApiError> {
    let conn = ctx.state.open_db()?;
    let analyses =
        analytics::all_medication_correlations(&conn, &ctx.state.analytics, &patient_id)?;
    Ok(Json(analyses))
}

/// `GET /api/patients/:id/correlations/:medication_id` — a medication with
/// no dosage history returns a zero-valued analysis with status 200, so a
/// fresh prescription renders as an empty state rather than an error.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path((patient_id, medication_id)): Path<(String, String)>,
) -> Result<Json<CorrelationAnalysis>, ApiError> {
    let conn = ctx.state.open_db()?;
    let analysis = analytics::medication_correlation(
        &conn,
        &ctx.state.analytics,
        &patient_id,
        &medication_id,
    )?;
    Ok(Json(analysis))
}

#[derive(Serialize)]
pub struct AdherenceCorrelationResponse {
    pub patient_id: String,
    pub medication_id: String,
    /// Pearson r between the daily adherence-percentage series and the
    /// daily event-count series; 0.0 for zero-variance series.
    pub pearson_r: f64,
}

/// `GET /api/patients/:id/medications/:medication_id/adherence-correlation?start&end`
pub async fn adherence(
    State(ctx): State<ApiContext>,
    Path((patient_id, medication_id)): Path<(String, String)>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<AdherenceCorrelationResponse>, ApiError> {
    let (start, end) = query.parse()?;
    let conn = ctx.state.open_db()?;

    let pearson_r =
        analytics::adherence_event_correlation(&conn, &patient_id, &medication_id, start, end)?;

    Ok(Json(AdherenceCorrelationResponse {
        patient_id,
        medication_id,
        pearson_r,
    }))
}
