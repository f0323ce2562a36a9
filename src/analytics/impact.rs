//! Medication impact analysis over an explicit date window.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;

use crate::db::repository;
use crate::models::enums::EventCategory;
use crate::models::{ClinicalEvent, DosageRecord};

use super::error::{
    check_range, parse_medication_id, parse_patient_id, require_patient, AnalyticsError,
};
use super::types::{ImpactAnalysis, WeeklyTrendPoint};

/// Effectiveness-oriented statistics for one medication over `[start, end]`.
///
/// Identifier validation happens first, then the range check, then the
/// patient lookup; absence of data in the window yields zero counts,
/// never an error.
pub fn medication_impact(
    conn: &Connection,
    patient_id: &str,
    medication_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<ImpactAnalysis, AnalyticsError> {
    let patient_id = parse_patient_id(patient_id)?;
    let medication_id = parse_medication_id(medication_id)?;
    check_range(&start, &end)?;
    require_patient(conn, &patient_id)?;

    let dosages = repository::find_dosages_by_patient_and_medication_in_range(
        conn,
        &patient_id,
        &medication_id,
        &start,
        &end,
    )?;
    // Symptom burden is patient-wide: events are rarely attributed to a
    // single medication at recording time.
    let events = repository::find_events_by_patient_in_range(conn, &patient_id, &start, &end)?;

    let total_dosages = dosages.len() as u32;
    let total_events = events.len() as u32;

    let days = (end - start).num_days().max(1);
    let average_events_per_day = f64::from(total_events) / days as f64;

    let symptom_events = events
        .iter()
        .filter(|e| e.category == EventCategory::Symptom)
        .count() as u32;
    let adverse_reaction_events = events
        .iter()
        .filter(|e| e.category == EventCategory::AdverseReaction)
        .count() as u32;

    let symptom_reduction_percentage = if total_events > 0 {
        f64::from(total_events - symptom_events) / f64::from(total_events) * 100.0
    } else {
        0.0
    };

    Ok(ImpactAnalysis {
        medication_id,
        patient_id,
        window_start: start,
        window_end: end,
        total_dosages,
        total_events,
        average_events_per_day,
        symptom_events,
        adverse_reaction_events,
        symptom_reduction_percentage,
        effectiveness_score: effectiveness_score(total_dosages, total_events),
        weekly_trend: weekly_trend(start, end, &events, &dosages),
    })
}

/// More events per dose linearly reduces effectiveness, floored at 0.
/// No doses in the window means nothing to credit: score 0.0.
pub fn effectiveness_score(dosage_count: u32, event_count: u32) -> f64 {
    if dosage_count == 0 {
        return 0.0;
    }
    let events_per_dosage = f64::from(event_count) / f64::from(dosage_count);
    (1.0 - events_per_dosage / 10.0).max(0.0)
}

/// Seven-day buckets counted from the window start; the window end falls
/// into the last bucket, so a window always has at least one.
fn weekly_trend(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    events: &[ClinicalEvent],
    dosages: &[DosageRecord],
) -> Vec<WeeklyTrendPoint> {
    let bucket_count = ((end - start).num_days() / 7 + 1) as usize;

    let mut trend: Vec<WeeklyTrendPoint> = (0..bucket_count)
        .map(|i| WeeklyTrendPoint {
            label: format!("Week {}", i + 1),
            week_start: start + Duration::weeks(i as i64),
            event_count: 0,
            dosage_count: 0,
        })
        .collect();

    for event in events {
        if let Some(bucket) = bucket_index(start, event.occurred_at, bucket_count) {
            trend[bucket].event_count += 1;
        }
    }
    for dosage in dosages {
        if let Some(bucket) = bucket_index(start, dosage.administered_at, bucket_count) {
            trend[bucket].dosage_count += 1;
        }
    }

    trend
}

fn bucket_index(start: DateTime<Utc>, ts: DateTime<Utc>, bucket_count: usize) -> Option<usize> {
    if ts < start {
        return None;
    }
    let index = ((ts - start).num_days() / 7) as usize;
    (index < bucket_count).then_some(index)
}
