use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db::repository;
use crate::models::{ClinicalEvent, DosageRecord};

use super::error::{
    check_range, parse_medication_id, parse_patient_id, require_patient, AnalyticsError,
};
use super::types::{TimelineDataPoint, TimelinePointDetail};

/// Merge a patient's clinical events and dosage records within
/// `[start, end]` into one chronologically ascending sequence.
///
/// Empty inputs produce an empty sequence, not an error. Ties keep
/// insertion order (events before dosages) via the stable sort.
pub fn assemble_timeline(
    conn: &Connection,
    patient_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<TimelineDataPoint>, AnalyticsError> {
    let patient_id = parse_patient_id(patient_id)?;
    check_range(&start, &end)?;
    require_patient(conn, &patient_id)?;

    let events = repository::find_events_by_patient_in_range(conn, &patient_id, &start, &end)?;
    let dosages = repository::find_dosages_by_patient_in_range(conn, &patient_id, &start, &end)?;

    Ok(merge(events, dosages))
}

/// Timeline variant restricted to records of a single medication.
pub fn assemble_medication_timeline(
    conn: &Connection,
    patient_id: &str,
    medication_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<TimelineDataPoint>, AnalyticsError> {
    let patient_id = parse_patient_id(patient_id)?;
    let medication_id = parse_medication_id(medication_id)?;
    check_range(&start, &end)?;
    require_patient(conn, &patient_id)?;

    let events = repository::find_events_by_patient_and_medication_in_range(
        conn,
        &patient_id,
        &medication_id,
        &start,
        &end,
    )?;
    let dosages = repository::find_dosages_by_patient_and_medication_in_range(
        conn,
        &patient_id,
        &medication_id,
        &start,
        &end,
    )?;

    Ok(merge(events, dosages))
}

fn merge(events: Vec<ClinicalEvent>, dosages: Vec<DosageRecord>) -> Vec<TimelineDataPoint> {
    let mut points: Vec<TimelineDataPoint> = Vec::with_capacity(events.len() + dosages.len());

    for event in events {
        points.push(TimelineDataPoint {
            occurred_at: event.occurred_at,
            description: event.title,
            detail: TimelinePointDetail::Event {
                severity: event.severity,
                category: event.category,
                bmi: compute_bmi(event.weight_kg, event.height_cm),
            },
        });
    }

    for dosage in dosages {
        points.push(TimelineDataPoint {
            occurred_at: dosage.administered_at,
            description: format!("{} {} dose", dosage.amount, dosage.unit),
            detail: TimelinePointDetail::Dosage {
                amount: dosage.amount,
                unit: dosage.unit,
                administered: dosage.administered,
            },
        });
    }

    // Stable: equal timestamps keep emission order (events first).
    points.sort_by_key(|p| p.occurred_at);
    points
}

/// BMI from measurements captured at event time, rounded half-up to one
/// decimal. `None` for missing inputs, non-positive weight, or height
/// outside the plausible 30-300 cm band.
pub fn compute_bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<f64> {
    let weight = weight_kg?;
    let height = height_cm?;
    if weight <= 0.0 || !(30.0..=300.0).contains(&height) {
        return None;
    }
    let height_m = height / 100.0;
    let bmi = weight / (height_m * height_m);
    Some((bmi * 10.0).round() / 10.0)
}
