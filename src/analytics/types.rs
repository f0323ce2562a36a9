use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enums::{EventCategory, EventSeverity};

/// One unified record in the merged chronological sequence of clinical
/// events and dosage administrations. Created fresh on every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineDataPoint {
    pub occurred_at: DateTime<Utc>,
    pub description: String,
    pub detail: TimelinePointDetail,
}

/// Type-specific payload carried by each timeline point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TimelinePointDetail {
    Event {
        severity: EventSeverity,
        category: EventCategory,
        /// Body-mass index derived from measurements captured at event time.
        /// `None` whenever weight/height are missing or out of range — never
        /// an error.
        bmi: Option<f64>,
    },
    Dosage {
        amount: f64,
        unit: String,
        administered: bool,
    },
}

/// Dose→event temporal correlation for one patient+medication pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    pub medication_id: Uuid,
    pub patient_id: Uuid,
    pub medication_name: String,
    pub total_dosages: u32,
    /// Distinct events falling in the post-dose window of at least one
    /// dosage. Overlapping windows never double-count an event.
    pub events_after_dosage: u32,
    /// Clamped to [0, 100].
    pub correlation_percentage: f64,
    /// Discretized 0.0-1.0 score derived from the percentage.
    pub correlation_strength: f64,
    pub category_breakdown: BTreeMap<String, u32>,
    pub severity_breakdown: BTreeMap<String, u32>,
}

impl CorrelationAnalysis {
    /// Defined terminal case for a medication with no dosage history.
    pub fn zero(medication_id: Uuid, patient_id: Uuid, medication_name: String) -> Self {
        Self {
            medication_id,
            patient_id,
            medication_name,
            total_dosages: 0,
            events_after_dosage: 0,
            correlation_percentage: 0.0,
            correlation_strength: 0.0,
            category_breakdown: BTreeMap::new(),
            severity_breakdown: BTreeMap::new(),
        }
    }
}

/// Rolled-up per-patient counts for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub patient_id: Uuid,
    pub total_events: u32,
    pub total_dosages: u32,
    pub category_breakdown: BTreeMap<String, u32>,
    pub severity_breakdown: BTreeMap<String, u32>,
    pub recent_events: u32,
    pub generated_at: DateTime<Utc>,
}

/// Effectiveness-oriented statistics for one medication over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    pub medication_id: Uuid,
    pub patient_id: Uuid,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_dosages: u32,
    pub total_events: u32,
    pub average_events_per_day: f64,
    pub symptom_events: u32,
    pub adverse_reaction_events: u32,
    pub symptom_reduction_percentage: f64,
    /// 1.0 = no events per dose; linearly reduced, floored at 0.0.
    pub effectiveness_score: f64,
    pub weekly_trend: Vec<WeeklyTrendPoint>,
}

/// One seven-day bucket of the impact trend, counted from the window start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyTrendPoint {
    pub label: String,
    pub week_start: DateTime<Utc>,
    pub event_count: u32,
    pub dosage_count: u32,
}
