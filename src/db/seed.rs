//! Demo data source fixtures.
//!
//! The demo data source is chosen once at startup (never flipped at runtime)
//! and seeds a realistic eight-week history: twice-daily dosing with a few
//! missed doses, plus clinical events clustered after some of them.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};
use crate::models::enums::*;
use crate::models::{ClinicalEvent, DosageRecord, Medication, Patient};

/// Seed fixture data and return the demo patient id.
pub fn seed_demo_data(conn: &Connection) -> Result<Uuid, DatabaseError> {
    let now = Utc::now();
    let patient_id = Uuid::new_v4();

    repository::insert_patient(
        conn,
        &Patient {
            id: patient_id,
            name: "Demo Patient".into(),
            date_of_birth: None,
            created_at: now,
        },
    )?;

    let med_id = Uuid::new_v4();
    repository::insert_medication(
        conn,
        &Medication {
            id: med_id,
            patient_id,
            name: "Levetiracetam".into(),
            dosage: 500.0,
            unit: "mg".into(),
            schedule_slots_per_day: 2,
            active: true,
        },
    )?;

    // Eight weeks of morning/evening doses; every 9th dose missed.
    let mut dose_index = 0u32;
    for day in 0..56i64 {
        for (slot, hour) in [(ScheduleSlot::Morning, 8i64), (ScheduleSlot::Evening, 20i64)] {
            let administered_at = now - Duration::days(day) - Duration::hours(24 - hour);
            insert_dose(
                conn,
                patient_id,
                med_id,
                administered_at,
                slot,
                dose_index % 9 != 0,
            )?;
            dose_index += 1;
        }
    }

    // Events: a seizure cluster in the oldest weeks, tapering off recently.
    let event_offsets_days = [2i64, 9, 16, 20, 30, 33, 40, 44, 48, 52];
    for (i, day) in event_offsets_days.iter().enumerate() {
        let (category, severity, title) = if i % 3 == 0 {
            (EventCategory::AdverseReaction, EventSeverity::Mild, "Drowsiness")
        } else {
            (EventCategory::Symptom, EventSeverity::Moderate, "Focal seizure")
        };
        repository::insert_event(
            conn,
            &ClinicalEvent {
                id: Uuid::new_v4(),
                patient_id,
                medication_id: Some(med_id),
                occurred_at: now - Duration::days(*day) - Duration::hours(3),
                title: title.into(),
                description: None,
                severity,
                category,
                weight_kg: Some(70.5),
                height_cm: Some(175.0),
                dosage_given: None,
            },
        )?;
    }

    tracing::info!(%patient_id, %med_id, "Seeded demo data");
    Ok(patient_id)
}

fn insert_dose(
    conn: &Connection,
    patient_id: Uuid,
    medication_id: Uuid,
    administered_at: DateTime<Utc>,
    slot: ScheduleSlot,
    administered: bool,
) -> Result<(), DatabaseError> {
    repository::insert_dosage(
        conn,
        &DosageRecord {
            id: Uuid::new_v4(),
            patient_id,
            medication_id,
            administered_at,
            amount: 500.0,
            unit: "mg".into(),
            slot,
            administered,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    #[test]
    fn demo_seed_populates_all_tables() {
        let conn = open_memory_database().unwrap();
        let patient_id = seed_demo_data(&conn).unwrap();

        let dosages = repository::count_dosages_by_patient(&conn, &patient_id).unwrap();
        let events = repository::count_events_by_patient(&conn, &patient_id).unwrap();
        assert_eq!(dosages, 112); // 56 days x 2 slots
        assert_eq!(events, 10);

        let meds = repository::medication_ids_with_dosages(&conn, &patient_id).unwrap();
        assert_eq!(meds.len(), 1);
    }
}
