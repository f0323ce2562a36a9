//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. There is no auth or session layer here;
//! the service binds locally and trusts its caller.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::state::AppState;

/// Build the analytics API router.
pub fn api_router(state: Arc<AppState>) -> Router {
    let ctx = ApiContext::new(state);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/patients/:id/timeline", get(endpoints::timeline::get))
        .route(
            "/patients/:id/correlations",
            get(endpoints::correlations::list),
        )
        .route(
            "/patients/:id/correlations/:medication_id",
            get(endpoints::correlations::detail),
        )
        .route(
            "/patients/:id/medications/:medication_id/impact",
            get(endpoints::impact::get),
        )
        .route(
            "/patients/:id/medications/:medication_id/adherence-correlation",
            get(endpoints::correlations::adherence),
        )
        .route("/patients/:id/dashboard", get(endpoints::dashboard::summary))
        .route(
            "/patients/:id/dashboard/weekly",
            get(endpoints::dashboard::weekly),
        )
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::db::{self, repository};
    use crate::models::enums::*;
    use crate::models::{ClinicalEvent, DosageRecord, Medication, Patient};
    use crate::state::DataSource;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;
    use uuid::Uuid;

    struct Fixture {
        router: Router,
        patient_id: Uuid,
        medication_id: Uuid,
        _dir: tempfile::TempDir,
    }

    fn setup() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.sqlite");
        let conn = db::open_database(&db_path).unwrap();

        let now = Utc::now();
        let patient_id = Uuid::new_v4();
        let medication_id = Uuid::new_v4();

        repository::insert_patient(
            &conn,
            &Patient {
                id: patient_id,
                name: "Router Test".into(),
                date_of_birth: None,
                created_at: now,
            },
        )
        .unwrap();
        repository::insert_medication(
            &conn,
            &Medication {
                id: medication_id,
                patient_id,
                name: "Levetiracetam".into(),
                dosage: 500.0,
                unit: "mg".into(),
                schedule_slots_per_day: 2,
                active: true,
            },
        )
        .unwrap();
        repository::insert_dosage(
            &conn,
            &DosageRecord {
                id: Uuid::new_v4(),
                patient_id,
                medication_id,
                administered_at: now - Duration::hours(6),
                amount: 500.0,
                unit: "mg".into(),
                slot: ScheduleSlot::Morning,
                administered: true,
            },
        )
        .unwrap();
        repository::insert_event(
            &conn,
            &ClinicalEvent {
                id: Uuid::new_v4(),
                patient_id,
                medication_id: Some(medication_id),
                occurred_at: now - Duration::hours(4),
                title: "Focal seizure".into(),
                description: None,
                severity: EventSeverity::Moderate,
                category: EventCategory::Symptom,
                weight_kg: Some(70.5),
                height_cm: Some(175.0),
                dosage_given: None,
            },
        )
        .unwrap();
        drop(conn);

        let state = Arc::new(AppState::new(
            DataSource::Live { db_path },
            AnalyticsConfig::default(),
        ));
        Fixture {
            router: api_router(state),
            patient_id,
            medication_id,
            _dir: dir,
        }
    }

    async fn get_json(
        router: Router,
        uri: &str,
    ) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn range_params() -> String {
        let end = Utc::now();
        let start = end - Duration::days(7);
        format!(
            "start={}&end={}",
            start.to_rfc3339().replace('+', "%2B"),
            end.to_rfc3339().replace('+', "%2B")
        )
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let fixture = setup();
        let (status, json) = get_json(fixture.router, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn timeline_returns_merged_points() {
        let fixture = setup();
        let uri = format!(
            "/api/patients/{}/timeline?{}",
            fixture.patient_id,
            range_params()
        );
        let (status, json) = get_json(fixture.router, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn timeline_inverted_range_is_400() {
        let fixture = setup();
        let end = Utc::now();
        let start = end - chrono::Duration::days(1);
        // Swapped on purpose.
        let uri = format!(
            "/api/patients/{}/timeline?start={}&end={}",
            fixture.patient_id,
            end.to_rfc3339().replace('+', "%2B"),
            start.to_rfc3339().replace('+', "%2B"),
        );
        let (status, json) = get_json(fixture.router, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn garbage_patient_id_is_400() {
        let fixture = setup();
        let uri = format!("/api/patients/not-a-uuid/timeline?{}", range_params());
        let (status, json) = get_json(fixture.router, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = json["error"]["message"].as_str().unwrap();
        assert!(message.contains("patient id"), "got: {message}");
    }

    #[tokio::test]
    async fn correlation_detail_returns_analysis() {
        let fixture = setup();
        let uri = format!(
            "/api/patients/{}/correlations/{}",
            fixture.patient_id, fixture.medication_id
        );
        let (status, json) = get_json(fixture.router, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_dosages"], 1);
        assert_eq!(json["events_after_dosage"], 1);
        assert_eq!(json["correlation_percentage"], 100.0);
    }

    #[tokio::test]
    async fn correlation_without_history_is_200_zero_valued() {
        let fixture = setup();
        // A valid but unknown medication id: no dosage history.
        let uri = format!(
            "/api/patients/{}/correlations/{}",
            fixture.patient_id,
            Uuid::new_v4()
        );
        let (status, json) = get_json(fixture.router, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_dosages"], 0);
        assert_eq!(json["correlation_strength"], 0.0);
    }

    #[tokio::test]
    async fn impact_endpoint_returns_window_stats() {
        let fixture = setup();
        let uri = format!(
            "/api/patients/{}/medications/{}/impact?{}",
            fixture.patient_id,
            fixture.medication_id,
            range_params()
        );
        let (status, json) = get_json(fixture.router, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_dosages"], 1);
        assert_eq!(json["total_events"], 1);
        assert!(json["weekly_trend"].as_array().unwrap().len() >= 1);
    }

    #[tokio::test]
    async fn weekly_dashboard_has_eight_weeks() {
        let fixture = setup();
        let uri = format!("/api/patients/{}/dashboard/weekly", fixture.patient_id);
        let (status, json) = get_json(fixture.router, &uri).await;
        assert_eq!(status, StatusCode::OK);
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 8);
        assert!(map.contains_key("Week 1"));
        assert!(map.contains_key("Week 8"));
    }

    #[tokio::test]
    async fn unknown_patient_is_404() {
        let fixture = setup();
        let uri = format!("/api/patients/{}/dashboard", Uuid::new_v4());
        let (status, json) = get_json(fixture.router, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        let message = json["error"]["message"].as_str().unwrap();
        assert!(message.contains("patient"), "got: {message}");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let fixture = setup();
        let response = fixture
            .router
            .oneshot(
                Request::builder()
                    .uri("/api/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
