//! API router.
//!
//! Returns a composable `Router` with every route nested under `/api/`.
//! Layers (outermost first): CORS, `Cache-Control: no-store`, audit log.

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router around a shared context.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/templates", get(endpoints::templates::list))
        .route("/templates/:id", get(endpoints::templates::detail))
        .route("/assessment", post(endpoints::assessment::assess))
        .route("/assessment/metrics", post(endpoints::assessment::metrics))
        .route("/prescriptions/extract", post(endpoints::prescriptions::extract))
        .route("/prescriptions/validate", post(endpoints::prescriptions::validate))
        .route("/export/consultation", post(endpoints::export::consultation))
        .route("/export/prescription", post(endpoints::export::prescription))
        .route(
            "/automation/workflows",
            get(endpoints::automation::list_workflows).post(endpoints::automation::create_workflow),
        )
        .route(
            "/automation/workflows/:id/toggle",
            post(endpoints::automation::toggle_workflow),
        )
        .route(
            "/automation/events",
            get(endpoints::automation::list_events).post(endpoints::automation::schedule_event),
        )
        .route(
            "/automation/events/:id/execute",
            post(endpoints::automation::execute_event),
        )
        .route("/automation/stats", get(endpoints::automation::stats))
        .route(
            "/automation/webhook",
            get(endpoints::automation::get_webhook).put(endpoints::automation::put_webhook),
        )
        .route("/automation/webhook/test", post(endpoints::automation::test_webhook))
        .route("/dashboard/summary", post(endpoints::dashboard::summary))
        .with_state(ctx)
        // Innermost first
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive());

    Router::new().nest("/api", api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::automation::AutomationDashboard;
    use crate::config::AppConfig;

    fn app() -> Router {
        api_router(ApiContext::new(AppConfig::instant()))
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn patient_json() -> Value {
        json!({
            "id": "6f1c2d34-5b6a-4c7d-8e9f-0a1b2c3d4e5f",
            "name": "Jane",
            "surname": "Doe",
            "date_of_birth": "1985-07-21",
            "allergies": ["Penicillin"]
        })
    }

    #[tokio::test]
    async fn health_response_shape() {
        let response = app().oneshot(get_req("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");
        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["app"], "MedScribe");
    }

    #[tokio::test]
    async fn not_found_for_unknown_route() {
        let response = app().oneshot(get_req("/api/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn templates_filter_by_category() {
        let response = app()
            .oneshot(get_req("/api/templates?category=psychology"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        let list = json.as_array().unwrap();
        assert!(!list.is_empty());
        assert!(list.iter().all(|t| t["category"] == "psychology"));
    }

    #[tokio::test]
    async fn templates_reject_unknown_filter() {
        let response = app()
            .oneshot(get_req("/api/templates?jurisdiction=mars"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn template_detail_and_not_found() {
        let response = app().oneshot(get_req("/api/templates/gp-soap-za")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["id"], "gp-soap-za");
        assert_eq!(json["sections"][0]["id"], "presenting_complaint");

        let response = app().oneshot(get_req("/api/templates/unknown")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn assessment_flags_chest_pain() {
        let req = json_req(
            "POST",
            "/api/assessment",
            json!({"content": "Patient reports chest pain since this morning."}),
        );
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["risk_level"], "high");
        assert_eq!(json["status"], "concerning");
        assert!(json["alerts"].as_array().unwrap().iter().any(|a| a == "chest pain"));
    }

    #[tokio::test]
    async fn assessment_metrics() {
        let req = json_req(
            "POST",
            "/api/assessment/metrics",
            json!({"content": "BP 150/95, fever"}),
        );
        let json = response_json(app().oneshot(req).await.unwrap()).await;
        assert_eq!(json["vitals"]["systolic"], 150);
        assert_eq!(json["follow_up_days"], 14);
    }

    #[tokio::test]
    async fn prescription_extract_and_validate() {
        let req = json_req(
            "POST",
            "/api/prescriptions/extract",
            json!({"text": "Start amoxicillin 500mg three times daily for 7 days."}),
        );
        let json = response_json(app().oneshot(req).await.unwrap()).await;
        let meds = json["medications"].as_array().unwrap();
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0]["name"], "amoxicillin");

        let draft = json!({
            "id": "0b8f1a2c-3d4e-4f5a-9b6c-7d8e9f0a1b2c",
            "patient": patient_json(),
            "date": "2026-03-02",
            "items": [{
                "medication": "amoxicillin",
                "strength": "500 mg",
                "dosage": "1 capsule",
                "frequency": "three times daily",
                "quantity": 21,
                "repeats": 0
            }]
        });
        let req = json_req("POST", "/api/prescriptions/validate", draft);
        let json = response_json(app().oneshot(req).await.unwrap()).await;
        assert_eq!(json["valid"], false);
        assert_eq!(json["issues"][0]["field"], "medication");
    }

    #[tokio::test]
    async fn export_consultation_returns_pdf() {
        let body = json!({
            "patient": patient_json(),
            "consultation": {
                "id": "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d",
                "patient_id": "6f1c2d34-5b6a-4c7d-8e9f-0a1b2c3d4e5f",
                "visit_date": "2026-03-02",
                "consultation_type": "follow_up",
                "content": "Cough improving."
            },
            "options": {"generated_at": "2026-03-02T10:00:00"}
        });
        let response = app()
            .oneshot(json_req("POST", "/api/export/consultation", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Content-Type").unwrap(), "application/pdf");
        assert_eq!(
            response.headers().get("Content-Disposition").unwrap(),
            "attachment; filename=\"Doe_Jane_consultation_2026-03-02.pdf\""
        );
        assert_eq!(response.headers().get("X-Page-Count").unwrap(), "1");
        let bytes = to_bytes(response.into_body(), 1 << 22).await.unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[tokio::test]
    async fn export_consultation_can_save() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            export_dir: dir.path().join("exports"),
            ..AppConfig::instant()
        };
        let app = api_router(ApiContext::new(config));
        let body = json!({
            "patient": patient_json(),
            "consultation": {
                "id": "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d",
                "patient_id": "6f1c2d34-5b6a-4c7d-8e9f-0a1b2c3d4e5f",
                "visit_date": "2026-03-02",
                "consultation_type": "initial",
                "content": "New patient."
            },
            "kind": "session_notes",
            "save": true
        });
        let response = app
            .oneshot(json_req("POST", "/api/export/consultation", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let saved = dir.path().join("exports").join("Doe_Jane_session_notes_2026-03-02.pdf");
        assert!(saved.exists());
    }

    #[tokio::test]
    async fn export_consultation_rejects_prescription_kind() {
        let body = json!({
            "patient": patient_json(),
            "consultation": {
                "id": "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d",
                "patient_id": "6f1c2d34-5b6a-4c7d-8e9f-0a1b2c3d4e5f",
                "visit_date": "2026-03-02",
                "consultation_type": "initial",
                "content": ""
            },
            "kind": "prescription"
        });
        let response = app()
            .oneshot(json_req("POST", "/api/export/consultation", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn export_prescription_returns_pdf() {
        let body = json!({
            "draft": {
                "id": "0b8f1a2c-3d4e-4f5a-9b6c-7d8e9f0a1b2c",
                "patient": patient_json(),
                "date": "2026-03-02",
                "items": [{
                    "medication": "metformin",
                    "strength": "500 mg",
                    "dosage": "1 tablet",
                    "frequency": "twice daily",
                    "quantity": 60,
                    "repeats": 2
                }]
            }
        });
        let response = app()
            .oneshot(json_req("POST", "/api/export/prescription", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Disposition").unwrap(),
            "attachment; filename=\"Doe_Jane_prescription_2026-03-02.pdf\""
        );
    }

    #[tokio::test]
    async fn automation_event_lifecycle() {
        let ctx = ApiContext::with_dashboard(AppConfig::instant(), AutomationDashboard::new());
        let app = api_router(ctx.clone());

        let req = json_req(
            "POST",
            "/api/automation/workflows",
            json!({"name": "Reminder", "trigger": "appointment_reminder",
                   "actions": [{"type": "send_sms", "message": "See you tomorrow"}]}),
        );
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let workflow = response_json(response).await;
        let workflow_id = workflow["id"].as_str().unwrap().to_string();
        assert_eq!(workflow["enabled"], true);

        let req = json_req("POST", "/api/automation/events", json!({"workflow_id": workflow_id}));
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let event = response_json(response).await;
        assert_eq!(event["status"], "pending");
        assert_eq!(event["attempts"], 0);
        let event_id = event["id"].as_str().unwrap().to_string();

        let uri = format!("/api/automation/events/{event_id}/execute");
        let response = app.clone().oneshot(json_req("POST", &uri, json!({}))).await.unwrap();
        let event = response_json(response).await;
        assert_eq!(event["status"], "completed");
        assert_eq!(event["attempts"], 1);

        // Completed events cannot run again.
        let response = app.clone().oneshot(json_req("POST", &uri, json!({}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(get_req("/api/automation/events?status=completed"))
            .await
            .unwrap();
        assert_eq!(response_json(response).await.as_array().unwrap().len(), 1);

        let stats = response_json(app.oneshot(get_req("/api/automation/stats")).await.unwrap()).await;
        assert_eq!(stats["completed"], 1);
        assert_eq!(stats["success_rate"], 1.0);
    }

    #[tokio::test]
    async fn disabled_workflow_rejects_events() {
        let ctx = ApiContext::new(AppConfig::instant());
        let workflow_id = ctx.lock_automation().unwrap().workflows()[0].id;
        let app = api_router(ctx);

        let uri = format!("/api/automation/workflows/{workflow_id}/toggle");
        let response = app.clone().oneshot(json_req("POST", &uri, json!({}))).await.unwrap();
        assert_eq!(response_json(response).await["enabled"], false);

        let req = json_req("POST", "/api/automation/events", json!({"workflow_id": workflow_id}));
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(get_req("/api/automation/events?status=sideways"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn webhook_update_masks_token() {
        let app = app();
        let req = json_req(
            "PUT",
            "/api/automation/webhook",
            json!({"url": "https://hooks.example.com/ms", "bearer_token": "secret-token-9876", "enabled": true}),
        );
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await["bearer_token"], "****9876");

        let response = app.clone().oneshot(json_req("POST", "/api/automation/webhook/test", json!({}))).await.unwrap();
        assert_eq!(response_json(response).await["success"], true);

        let req = json_req("PUT", "/api/automation/webhook", json!({"url": "ftp://nope", "enabled": true}));
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Rejected update leaves the stored config alone.
        let response = app.oneshot(get_req("/api/automation/webhook")).await.unwrap();
        assert_eq!(response_json(response).await["url"], "https://hooks.example.com/ms");
    }

    #[tokio::test]
    async fn dashboard_summary() {
        let body = json!({
            "patient": patient_json(),
            "sessions": [{
                "id": "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d",
                "patient_id": "6f1c2d34-5b6a-4c7d-8e9f-0a1b2c3d4e5f",
                "visit_date": "2026-03-02",
                "consultation_type": "follow_up",
                "content": "Persistent headache.",
                "diagnoses": [{"code": "R51", "description": "Headache"}]
            }],
            "today": "2026-04-01"
        });
        let response = app()
            .oneshot(json_req("POST", "/api/dashboard/summary", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["full_name"], "Jane Doe");
        assert_eq!(json["age"], 40);
        assert_eq!(json["recent_diagnoses"][0], "Headache (R51)");
        assert_eq!(json["sessions_by_type"]["follow_up"], 1);
        assert_eq!(json["latest_assessment"]["risk_level"], "moderate");
    }
}
