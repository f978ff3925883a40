//! Simulated assessment endpoints.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::types::ApiContext;
use crate::assessment::{assess_with_delay, generate_health_metrics, HealthMetrics, StatusAssessment};

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: String,
}

/// `POST /api/assessment`: waits the configured delay, then assesses.
pub async fn assess(
    State(ctx): State<ApiContext>,
    Json(req): Json<ContentRequest>,
) -> Json<StatusAssessment> {
    Json(assess_with_delay(req.content, ctx.config.assessment_delay).await)
}

/// `POST /api/assessment/metrics`
pub async fn metrics(Json(req): Json<ContentRequest>) -> Json<HealthMetrics> {
    Json(generate_health_metrics(&req.content))
}
