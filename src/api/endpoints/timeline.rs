//! Timeline endpoint.
//!
//! `GET /api/patients/:id/timeline?start&end[&medication_id]` — the merged
//! chronological sequence of clinical events and dosage administrations.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::analytics::{self, TimelineDataPoint};
use crate::api::error::ApiError;
use crate::api::types::{parse_ts, ApiContext};

#[derive(Deserialize)]
pub struct TimelineQuery {
    pub start: String,
    pub end: String,
    pub medication_id: Option<String>,
}

pub async fn get(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<Vec<TimelineDataPoint>>, ApiError> {
    let start = parse_ts("start", &query.start)?;
    let end = parse_ts("end", &query.end)?;
    let conn = ctx.state.open_db()?;

    let points = match &query.medication_id {
        Some(medication_id) => analytics::assemble_medication_timeline(
            &conn,
            &patient_id,
            medication_id,
            start,
            end,
        )?,
        None => analytics::assemble_timeline(&conn, &patient_id, start, end)?,
    };

    Ok(Json(points))
}
