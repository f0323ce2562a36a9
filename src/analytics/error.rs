use chrono::{DateTime, Utc};
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};

/// Analytics failure taxonomy. Malformed requests fail fast; legitimate
/// absence of data never errors — it yields zero/empty results instead.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid patient id: {0:?}")]
    InvalidPatientId(String),

    #[error("Invalid medication id: {0:?}")]
    InvalidMedicationId(String),

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Identifier validation happens before any storage access.
pub(crate) fn parse_patient_id(raw: &str) -> Result<Uuid, AnalyticsError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AnalyticsError::InvalidPatientId(raw.to_string()))
}

pub(crate) fn parse_medication_id(raw: &str) -> Result<Uuid, AnalyticsError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AnalyticsError::InvalidMedicationId(raw.to_string()))
}

pub(crate) fn check_range(
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<(), AnalyticsError> {
    if start > end {
        return Err(AnalyticsError::InvalidRange {
            start: *start,
            end: *end,
        });
    }
    Ok(())
}

/// A well-formed id for a patient that was never registered is a lookup
/// failure, not an empty result. Runs after input validation so malformed
/// requests never reach storage.
pub(crate) fn require_patient(conn: &Connection, id: &Uuid) -> Result<(), AnalyticsError> {
    if repository::find_patient(conn, id)?.is_none() {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: id.to_string(),
        }
        .into());
    }
    Ok(())
}
