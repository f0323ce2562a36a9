use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::*;
use crate::models::ClinicalEvent;

use super::{ts_from_sql, ts_to_sql};

const EVENT_COLUMNS: &str = "id, patient_id, medication_id, occurred_at, title, description,
     severity, category, weight_kg, height_cm, dosage_given";

pub fn insert_event(conn: &Connection, event: &ClinicalEvent) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO clinical_events (id, patient_id, medication_id, occurred_at, title,
         description, severity, category, weight_kg, height_cm, dosage_given)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            event.id.to_string(),
            event.patient_id.to_string(),
            event.medication_id.map(|id| id.to_string()),
            ts_to_sql(&event.occurred_at),
            event.title,
            event.description,
            event.severity.as_str(),
            event.category.as_str(),
            event.weight_kg,
            event.height_cm,
            event.dosage_given,
        ],
    )?;
    Ok(())
}

/// Events for one patient inside the window, inclusive on both bounds.
pub fn find_events_by_patient_in_range(
    conn: &Connection,
    patient_id: &Uuid,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<Vec<ClinicalEvent>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM clinical_events
         WHERE patient_id = ?1 AND occurred_at BETWEEN ?2 AND ?3
         ORDER BY occurred_at"
    ))?;

    let rows = stmt.query_map(
        params![patient_id.to_string(), ts_to_sql(start), ts_to_sql(end)],
        |row| Ok(event_row_from_rusqlite(row)),
    )?;

    collect_events(rows)
}

/// Range query additionally scoped to one medication.
pub fn find_events_by_patient_and_medication_in_range(
    conn: &Connection,
    patient_id: &Uuid,
    medication_id: &Uuid,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<Vec<ClinicalEvent>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM clinical_events
         WHERE patient_id = ?1 AND medication_id = ?2 AND occurred_at BETWEEN ?3 AND ?4
         ORDER BY occurred_at"
    ))?;

    let rows = stmt.query_map(
        params![
            patient_id.to_string(),
            medication_id.to_string(),
            ts_to_sql(start),
            ts_to_sql(end)
        ],
        |row| Ok(event_row_from_rusqlite(row)),
    )?;

    collect_events(rows)
}

/// All events for a patient, unscoped by date. Used by the correlation engine,
/// which applies its own per-dosage windows.
pub fn find_events_by_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<ClinicalEvent>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM clinical_events
         WHERE patient_id = ?1 ORDER BY occurred_at"
    ))?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok(event_row_from_rusqlite(row))
    })?;

    collect_events(rows)
}

pub fn count_events_by_patient(conn: &Connection, patient_id: &Uuid) -> Result<u32, DatabaseError> {
    conn.query_row(
        "SELECT COUNT(*) FROM clinical_events WHERE patient_id = ?1",
        params![patient_id.to_string()],
        |row| row.get(0),
    )
    .map_err(DatabaseError::from)
}

pub fn count_events_by_patient_since(
    conn: &Connection,
    patient_id: &Uuid,
    cutoff: &DateTime<Utc>,
) -> Result<u32, DatabaseError> {
    conn.query_row(
        "SELECT COUNT(*) FROM clinical_events WHERE patient_id = ?1 AND occurred_at >= ?2",
        params![patient_id.to_string(), ts_to_sql(cutoff)],
        |row| row.get(0),
    )
    .map_err(DatabaseError::from)
}

/// Count over the half-open span `(start, end]`, so adjacent spans never
/// count a record twice.
pub fn count_events_by_patient_in_span(
    conn: &Connection,
    patient_id: &Uuid,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<u32, DatabaseError> {
    conn.query_row(
        "SELECT COUNT(*) FROM clinical_events
         WHERE patient_id = ?1 AND occurred_at > ?2 AND occurred_at <= ?3",
        params![patient_id.to_string(), ts_to_sql(start), ts_to_sql(end)],
        |row| row.get(0),
    )
    .map_err(DatabaseError::from)
}

pub fn count_events_grouped_by_category(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<BTreeMap<String, u32>, DatabaseError> {
    count_grouped(conn, patient_id, "category")
}

pub fn count_events_grouped_by_severity(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<BTreeMap<String, u32>, DatabaseError> {
    count_grouped(conn, patient_id, "severity")
}

fn count_grouped(
    conn: &Connection,
    patient_id: &Uuid,
    column: &str,
) -> Result<BTreeMap<String, u32>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {column}, COUNT(*) FROM clinical_events
         WHERE patient_id = ?1 GROUP BY {column}"
    ))?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
    })?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (key, count) = row?;
        counts.insert(key, count);
    }
    Ok(counts)
}

// Internal row type for ClinicalEvent mapping
struct EventRow {
    id: String,
    patient_id: String,
    medication_id: Option<String>,
    occurred_at: String,
    title: String,
    description: Option<String>,
    severity: String,
    category: String,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    dosage_given: Option<f64>,
}

fn event_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<EventRow, rusqlite::Error> {
    Ok(EventRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        medication_id: row.get(2)?,
        occurred_at: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        severity: row.get(6)?,
        category: row.get(7)?,
        weight_kg: row.get(8)?,
        height_cm: row.get(9)?,
        dosage_given: row.get(10)?,
    })
}

fn event_from_row(row: EventRow) -> Result<ClinicalEvent, DatabaseError> {
    Ok(ClinicalEvent {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_id: Uuid::parse_str(&row.patient_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        medication_id: row.medication_id.and_then(|s| Uuid::parse_str(&s).ok()),
        occurred_at: ts_from_sql(&row.occurred_at)?,
        title: row.title,
        description: row.description,
        severity: EventSeverity::from_str(&row.severity)?,
        category: EventCategory::from_str(&row.category)?,
        weight_kg: row.weight_kg,
        height_cm: row.height_cm,
        dosage_given: row.dosage_given,
    })
}

fn collect_events(
    rows: impl Iterator<Item = Result<Result<EventRow, rusqlite::Error>, rusqlite::Error>>,
) -> Result<Vec<ClinicalEvent>, DatabaseError> {
    let mut events = Vec::new();
    for row in rows {
        events.push(event_from_row(row??)?);
    }
    Ok(events)
}
