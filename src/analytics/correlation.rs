//! Correlation engine — dose→event temporal correlation plus the Pearson
//! estimator used for adherence-vs-event series.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::config::AnalyticsConfig;
use crate::db::repository;

use super::error::{
    check_range, parse_medication_id, parse_patient_id, require_patient, AnalyticsError,
};
use super::types::CorrelationAnalysis;

/// Dose→event correlation for one patient+medication pair.
///
/// No dosage history is a defined terminal case: a zero-valued analysis,
/// not an error, so a new medication renders an empty state downstream.
pub fn medication_correlation(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    patient_id: &str,
    medication_id: &str,
) -> Result<CorrelationAnalysis, AnalyticsError> {
    let patient_id = parse_patient_id(patient_id)?;
    let medication_id = parse_medication_id(medication_id)?;
    require_patient(conn, &patient_id)?;
    correlate(conn, cfg, &patient_id, &medication_id)
}

/// One analysis per medication the patient has dosage history for.
pub fn all_medication_correlations(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    patient_id: &str,
) -> Result<Vec<CorrelationAnalysis>, AnalyticsError> {
    let patient_id = parse_patient_id(patient_id)?;
    require_patient(conn, &patient_id)?;

    let mut analyses = Vec::new();
    for medication_id in repository::medication_ids_with_dosages(conn, &patient_id)? {
        analyses.push(correlate(conn, cfg, &patient_id, &medication_id)?);
    }
    Ok(analyses)
}

fn correlate(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    patient_id: &Uuid,
    medication_id: &Uuid,
) -> Result<CorrelationAnalysis, AnalyticsError> {
    let medication_name = repository::medication_name(conn, medication_id)?;

    let dosages =
        repository::find_dosages_by_patient_and_medication(conn, patient_id, medication_id)?;
    if dosages.is_empty() {
        return Ok(CorrelationAnalysis::zero(
            *medication_id,
            *patient_id,
            medication_name,
        ));
    }

    let events = repository::find_events_by_patient(conn, patient_id)?;
    let window = cfg.post_dose_window();

    // An event counts once when it falls inside the post-dose window of any
    // dosage, even if several windows overlap it.
    // O(dosages x events), bounded for typical histories.
    let mut events_after_dosage = 0u32;
    let mut category_breakdown: BTreeMap<String, u32> = BTreeMap::new();
    let mut severity_breakdown: BTreeMap<String, u32> = BTreeMap::new();

    for event in &events {
        let follows_a_dose = dosages.iter().any(|d| {
            event.occurred_at >= d.administered_at
                && event.occurred_at <= d.administered_at + window
        });
        if follows_a_dose {
            events_after_dosage += 1;
            *category_breakdown
                .entry(event.category.as_str().to_string())
                .or_insert(0) += 1;
            *severity_breakdown
                .entry(event.severity.as_str().to_string())
                .or_insert(0) += 1;
        }
    }

    let correlation_percentage =
        correlation_percentage(dosages.len() as u32, events_after_dosage);

    Ok(CorrelationAnalysis {
        medication_id: *medication_id,
        patient_id: *patient_id,
        medication_name,
        total_dosages: dosages.len() as u32,
        events_after_dosage,
        correlation_percentage,
        correlation_strength: correlation_strength(correlation_percentage),
        category_breakdown,
        severity_breakdown,
    })
}

/// `min(100, events * 100 / dosages)`; zero dosages define zero correlation.
pub fn correlation_percentage(dosage_count: u32, event_count: u32) -> f64 {
    if dosage_count == 0 {
        return 0.0;
    }
    (f64::from(event_count) * 100.0 / f64::from(dosage_count)).min(100.0)
}

/// Step function discretizing a correlation percentage into a 0.0-1.0 score.
pub fn correlation_strength(percentage: f64) -> f64 {
    if percentage >= 80.0 {
        1.0
    } else if percentage >= 60.0 {
        0.8
    } else if percentage >= 40.0 {
        0.6
    } else if percentage >= 20.0 {
        0.4
    } else if percentage > 0.0 {
        0.2
    } else {
        0.0
    }
}

/// Pearson product-moment correlation.
///
/// Returns 0.0 whenever the denominator is 0 (zero variance in either
/// series) or the series are empty/mismatched — a constant series has
/// undefined correlation in the strict sense, and the system reports
/// neutral rather than failing.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.is_empty() || xs.len() != ys.len() {
        return 0.0;
    }

    let n = xs.len() as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = xs.iter().map(|x| x * x).sum();
    let sum_y2: f64 = ys.iter().map(|y| y * y).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    numerator / denominator
}

/// Pearson correlation between the daily adherence-percentage series and
/// the daily clinical-event-count series over `[start, end]`.
///
/// Adherence for a day = administered doses / recorded doses x 100;
/// days with no dosage records contribute 0%.
pub fn adherence_event_correlation(
    conn: &Connection,
    patient_id: &str,
    medication_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<f64, AnalyticsError> {
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
    let events = repository::find_events_by_patient_in_range(conn, &patient_id, &start, &end)?;

    let mut adherence = Vec::new();
    let mut event_counts = Vec::new();

    let mut day = start.date_naive();
    let last = end.date_naive();
    while day <= last {
        let recorded = dosages
            .iter()
            .filter(|d| d.administered_at.date_naive() == day)
            .count();
        let taken = dosages
            .iter()
            .filter(|d| d.administered_at.date_naive() == day && d.administered)
            .count();
        adherence.push(if recorded > 0 {
            taken as f64 / recorded as f64 * 100.0
        } else {
            0.0
        });
        event_counts.push(
            events
                .iter()
                .filter(|e| e.occurred_at.date_naive() == day)
                .count() as f64,
        );
        day += Duration::days(1);
    }

    Ok(pearson(&adherence, &event_counts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_clamped() {
        assert_eq!(correlation_percentage(0, 50), 0.0);
        assert_eq!(correlation_percentage(2, 1), 50.0);
        assert_eq!(correlation_percentage(1, 5), 100.0);
        let two_thirds = correlation_percentage(3, 2);
        assert!((two_thirds - 66.666).abs() < 0.01);
    }

    #[test]
    fn strength_steps() {
        assert_eq!(correlation_strength(0.0), 0.0);
        assert_eq!(correlation_strength(0.1), 0.2);
        assert_eq!(correlation_strength(19.9), 0.2);
        assert_eq!(correlation_strength(20.0), 0.4);
        assert_eq!(correlation_strength(40.0), 0.6);
        assert_eq!(correlation_strength(60.0), 0.8);
        assert_eq!(correlation_strength(80.0), 1.0);
        assert_eq!(correlation_strength(100.0), 1.0);
    }

    #[test]
    fn pearson_zero_variance_is_neutral_zero() {
        let constant = vec![5.0, 5.0, 5.0, 5.0];
        let varying = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(pearson(&constant, &varying), 0.0);
        assert_eq!(pearson(&varying, &constant), 0.0);
        assert_eq!(pearson(&constant, &constant), 0.0);
    }

    #[test]
    fn pearson_perfect_correlation() {
        let xs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let doubled: Vec<f64> = xs.iter().map(|x| x * 2.0).collect();
        let inverted: Vec<f64> = xs.iter().map(|x| 10.0 - x).collect();
        assert!((pearson(&xs, &doubled) - 1.0).abs() < 1e-9);
        assert!((pearson(&xs, &inverted) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_empty_or_mismatched_is_zero() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), 0.0);
    }
}
