use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::ScheduleSlot;
use crate::models::DosageRecord;

use super::{ts_from_sql, ts_to_sql};

const DOSAGE_COLUMNS: &str =
    "id, patient_id, medication_id, administered_at, amount, unit, slot, administered";

pub fn insert_dosage(conn: &Connection, dosage: &DosageRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO dosage_records (id, patient_id, medication_id, administered_at,
         amount, unit, slot, administered)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            dosage.id.to_string(),
            dosage.patient_id.to_string(),
            dosage.medication_id.to_string(),
            ts_to_sql(&dosage.administered_at),
            dosage.amount,
            dosage.unit,
            dosage.slot.as_str(),
            dosage.administered as i32,
        ],
    )?;
    Ok(())
}

/// Dosage records for one patient inside the window, inclusive on both bounds.
pub fn find_dosages_by_patient_in_range(
    conn: &Connection,
    patient_id: &Uuid,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<Vec<DosageRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOSAGE_COLUMNS} FROM dosage_records
         WHERE patient_id = ?1 AND administered_at BETWEEN ?2 AND ?3
         ORDER BY administered_at"
    ))?;

    let rows = stmt.query_map(
        params![patient_id.to_string(), ts_to_sql(start), ts_to_sql(end)],
        |row| Ok(dosage_row_from_rusqlite(row)),
    )?;

    collect_dosages(rows)
}

pub fn find_dosages_by_patient_and_medication_in_range(
    conn: &Connection,
    patient_id: &Uuid,
    medication_id: &Uuid,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<Vec<DosageRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOSAGE_COLUMNS} FROM dosage_records
         WHERE patient_id = ?1 AND medication_id = ?2 AND administered_at BETWEEN ?3 AND ?4
         ORDER BY administered_at"
    ))?;

    let rows = stmt.query_map(
        params![
            patient_id.to_string(),
            medication_id.to_string(),
            ts_to_sql(start),
            ts_to_sql(end)
        ],
        |row| Ok(dosage_row_from_rusqlite(row)),
    )?;

    collect_dosages(rows)
}

/// Full dosage history for one patient+medication pair, unscoped by date.
pub fn find_dosages_by_patient_and_medication(
    conn: &Connection,
    patient_id: &Uuid,
    medication_id: &Uuid,
) -> Result<Vec<DosageRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOSAGE_COLUMNS} FROM dosage_records
         WHERE patient_id = ?1 AND medication_id = ?2
         ORDER BY administered_at"
    ))?;

    let rows = stmt.query_map(
        params![patient_id.to_string(), medication_id.to_string()],
        |row| Ok(dosage_row_from_rusqlite(row)),
    )?;

    collect_dosages(rows)
}

pub fn count_dosages_by_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<u32, DatabaseError> {
    conn.query_row(
        "SELECT COUNT(*) FROM dosage_records WHERE patient_id = ?1",
        params![patient_id.to_string()],
        |row| row.get(0),
    )
    .map_err(DatabaseError::from)
}

/// Count over the half-open span `(start, end]`, so adjacent spans never
/// count a record twice.
pub fn count_dosages_by_patient_in_span(
    conn: &Connection,
    patient_id: &Uuid,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<u32, DatabaseError> {
    conn.query_row(
        "SELECT COUNT(*) FROM dosage_records
         WHERE patient_id = ?1 AND administered_at > ?2 AND administered_at <= ?3",
        params![patient_id.to_string(), ts_to_sql(start), ts_to_sql(end)],
        |row| row.get(0),
    )
    .map_err(DatabaseError::from)
}

/// Medications the patient has any dosage history for, in stable id order.
/// Drives the batch correlation operation.
pub fn medication_ids_with_dosages(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Uuid>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT medication_id FROM dosage_records
         WHERE patient_id = ?1 ORDER BY medication_id",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        row.get::<_, String>(0)
    })?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(
            Uuid::parse_str(&row?)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        );
    }
    Ok(ids)
}

// Internal row type for DosageRecord mapping
struct DosageRow {
    id: String,
    patient_id: String,
    medication_id: String,
    administered_at: String,
    amount: f64,
    unit: String,
    slot: String,
    administered: i32,
}

fn dosage_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<DosageRow, rusqlite::Error> {
    Ok(DosageRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        medication_id: row.get(2)?,
        administered_at: row.get(3)?,
        amount: row.get(4)?,
        unit: row.get(5)?,
        slot: row.get(6)?,
        administered: row.get(7)?,
    })
}

fn dosage_from_row(row: DosageRow) -> Result<DosageRecord, DatabaseError> {
    Ok(DosageRecord {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_id: Uuid::parse_str(&row.patient_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        medication_id: Uuid::parse_str(&row.medication_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        administered_at: ts_from_sql(&row.administered_at)?,
        amount: row.amount,
        unit: row.unit,
        slot: ScheduleSlot::from_str(&row.slot)?,
        administered: row.administered != 0,
    })
}

fn collect_dosages(
    rows: impl Iterator<Item = Result<Result<DosageRow, rusqlite::Error>, rusqlite::Error>>,
) -> Result<Vec<DosageRecord>, DatabaseError> {
    let mut dosages = Vec::new();
    for row in rows {
        dosages.push(dosage_from_row(row??)?);
    }
    Ok(dosages)
}
