use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub name: String,
    pub dosage: f64,
    pub unit: String,
    /// How many schedule slots the prescription fills per day (1-4).
    pub schedule_slots_per_day: u32,
    pub active: bool,
}
