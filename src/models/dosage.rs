use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ScheduleSlot;

/// One scheduled dose of a medication, with whether it was actually taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DosageRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub medication_id: Uuid,
    pub administered_at: DateTime<Utc>,
    pub amount: f64,
    pub unit: String,
    pub slot: ScheduleSlot,
    pub administered: bool,
}
