use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Patient;

use super::{ts_from_sql, ts_to_sql};

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, date_of_birth, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            patient.id.to_string(),
            patient.name,
            patient.date_of_birth.map(|d| d.to_string()),
            ts_to_sql(&patient.created_at),
        ],
    )?;
    Ok(())
}

pub fn find_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, date_of_birth, created_at FROM patients WHERE id = ?1",
            params![id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let Some((id, name, dob, created_at)) = row else {
        return Ok(None);
    };

    Ok(Some(Patient {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        name,
        date_of_birth: dob.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        created_at: ts_from_sql(&created_at)?,
    }))
}
