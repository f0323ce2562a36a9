use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{EventCategory, EventSeverity};

/// A clinical event recorded for a patient (seizure, side effect, checkup...).
///
/// `weight_kg` / `height_cm` are measurements captured at the time of the
/// event, not the patient's current values — the timeline derives BMI from
/// them so the metric reflects the patient's state when the event happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalEvent {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub medication_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub severity: EventSeverity,
    pub category: EventCategory,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub dosage_given: Option<f64>,
}
