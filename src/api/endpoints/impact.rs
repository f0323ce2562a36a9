//! Medication impact endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::analytics::{self, ImpactAnalysis};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, RangeQuery};

/// `GET /api/patients/:id/medications/:medication_id/impact?start&end`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path((patient_id, medication_id)): Path<(String, String)>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ImpactAnalysis>, ApiError> {
    let (start, end) = query.parse()?;
    let conn = ctx.state.open_db()?;

    let impact = analytics::medication_impact(&conn, &patient_id, &medication_id, start, end)?;
    Ok(Json(impact))
}
