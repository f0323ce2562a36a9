//! Clinical correlation & timeline analytics core.
//!
//! Merges the two independently recorded streams (dosage administrations
//! and clinical events) into per-patient views: the unified timeline, the
//! dose→event correlation analyses, the medication impact window, and the
//! dashboard rollups. Every operation is a pure read over the storage
//! snapshot plus the evaluation instant; nothing here mutates records or
//! holds state across calls.

pub mod correlation;
pub mod dashboard;
mod error;
pub mod impact;
pub mod timeline;
mod types;

pub use correlation::{
    adherence_event_correlation, all_medication_correlations, correlation_percentage,
    correlation_strength, medication_correlation, pearson,
};
pub use dashboard::{
    dashboard_summary, dashboard_summary_at, weekly_summaries, weekly_summaries_at,
    WEEKLY_SNAPSHOT_COUNT,
};
pub use error::AnalyticsError;
pub use impact::{effectiveness_score, medication_impact};
pub use timeline::{assemble_medication_timeline, assemble_timeline, compute_bmi};
pub use types::*;

// ── Tests ──────────────────────────────────────────────────────────────────
