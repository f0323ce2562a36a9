//! Dashboard aggregation — rolled-up counts and trailing weekly snapshots.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;

use crate::config::AnalyticsConfig;
use crate::db::repository;

use super::error::{parse_patient_id, require_patient, AnalyticsError};
use super::types::DashboardSummary;

/// Trailing weekly snapshots are always this many, zero-filled when the
/// history is shorter.
pub const WEEKLY_SNAPSHOT_COUNT: usize = 8;

pub fn dashboard_summary(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    patient_id: &str,
) -> Result<DashboardSummary, AnalyticsError> {
    dashboard_summary_at(conn, cfg, patient_id, Utc::now())
}

/// Summary relative to an explicit evaluation instant. The instant is an
/// input so repeated calls over an unchanged snapshot are byte-identical.
pub fn dashboard_summary_at(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    patient_id: &str,
    now: DateTime<Utc>,
) -> Result<DashboardSummary, AnalyticsError> {
    let patient_id = parse_patient_id(patient_id)?;
    require_patient(conn, &patient_id)?;
    let cutoff = now - cfg.recent_window();

    Ok(DashboardSummary {
        patient_id,
        total_events: repository::count_events_by_patient(conn, &patient_id)?,
        total_dosages: repository::count_dosages_by_patient(conn, &patient_id)?,
        category_breakdown: repository::count_events_grouped_by_category(conn, &patient_id)?,
        severity_breakdown: repository::count_events_grouped_by_severity(conn, &patient_id)?,
        recent_events: repository::count_events_by_patient_since(conn, &patient_id, &cutoff)?,
        generated_at: now,
    })
}

pub fn weekly_summaries(
    conn: &Connection,
    patient_id: &str,
) -> Result<BTreeMap<String, DashboardSummary>, AnalyticsError> {
    weekly_summaries_at(conn, patient_id, Utc::now())
}

/// Exactly eight trailing seven-day snapshots: "Week 1" is the most recent
/// window, "Week 8" the one seven weeks prior. Each week covers the
/// half-open span `(start, end]`, so a record timestamped exactly on a week
/// boundary falls in the older week and is never counted twice. Breakdown
/// maps stay empty in the per-week rollup; per-week grouping queries were
/// dropped to keep this to two counts per week.
pub fn weekly_summaries_at(
    conn: &Connection,
    patient_id: &str,
    now: DateTime<Utc>,
) -> Result<BTreeMap<String, DashboardSummary>, AnalyticsError> {
    let patient_id = parse_patient_id(patient_id)?;
    require_patient(conn, &patient_id)?;

    let mut summaries = BTreeMap::new();
    for week in 1..=WEEKLY_SNAPSHOT_COUNT as i64 {
        let end = now - Duration::weeks(week - 1);
        let start = now - Duration::weeks(week);

        let events = repository::count_events_by_patient_in_span(conn, &patient_id, &start, &end)?;
        let dosages =
            repository::count_dosages_by_patient_in_span(conn, &patient_id, &start, &end)?;

        summaries.insert(
            format!("Week {week}"),
            DashboardSummary {
                patient_id,
                total_events: events,
                total_dosages: dosages,
                category_breakdown: BTreeMap::new(),
                severity_breakdown: BTreeMap::new(),
                recent_events: events,
                generated_at: now,
            },
        );
    }
    Ok(summaries)
}
