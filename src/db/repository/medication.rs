use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Medication;

pub fn insert_medication(conn: &Connection, med: &Medication) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, patient_id, name, dosage, unit, schedule_slots_per_day, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            med.id.to_string(),
            med.patient_id.to_string(),
            med.name,
            med.dosage,
            med.unit,
            med.schedule_slots_per_day,
            med.active as i32,
        ],
    )?;
    Ok(())
}

pub fn find_medication(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<Medication>, DatabaseError> {
    conn.query_row(
        "SELECT id, patient_id, name, dosage, unit, schedule_slots_per_day, active
         FROM medications WHERE id = ?1",
        params![id.to_string()],
        |row| {
            Ok(Medication {
                id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
                patient_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
                name: row.get(2)?,
                dosage: row.get(3)?,
                unit: row.get(4)?,
                schedule_slots_per_day: row.get(5)?,
                active: row.get::<_, i32>(6)? != 0,
            })
        },
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Display name for a medication; empty when the record is missing so the
/// zero-valued correlation terminal case still serializes cleanly.
pub fn medication_name(conn: &Connection, id: &Uuid) -> Result<String, DatabaseError> {
    Ok(find_medication(conn, id)?.map(|m| m.name).unwrap_or_default())
}
