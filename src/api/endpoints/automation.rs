//! Automation dashboard endpoints.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::automation::{
    simulate_test_connection, AutomationEvent, ConnectionTest, DashboardStats, WebhookConfig,
    Workflow, WorkflowAction,
};
use crate::models::{EventStatus, TriggerType};

#[derive(Debug, Deserialize)]
pub struct CreateWorkflowRequest {
    pub name: String,
    pub trigger: TriggerType,
    #[serde(default)]
    pub actions: Vec<WorkflowAction>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleEventRequest {
    pub workflow_id: Uuid,
    #[serde(default)]
    pub patient_id: Option<Uuid>,
    /// Defaults to now.
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// Webhook settings as shown to the client, token masked.
#[derive(Debug, Serialize)]
pub struct WebhookView {
    pub url: String,
    pub bearer_token: Option<String>,
    pub enabled: bool,
}

impl From<&WebhookConfig> for WebhookView {
    fn from(c: &WebhookConfig) -> Self {
        Self {
            url: c.url.clone(),
            bearer_token: c.masked_token(),
            enabled: c.enabled,
        }
    }
}

/// `GET /api/automation/workflows`
pub async fn list_workflows(State(ctx): State<ApiContext>) -> Result<Json<Vec<Workflow>>, ApiError> {
    Ok(Json(ctx.lock_automation()?.workflows().to_vec()))
}

/// `POST /api/automation/workflows`
pub async fn create_workflow(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateWorkflowRequest>,
) -> Result<(StatusCode, Json<Workflow>), ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Workflow name is required".into()));
    }
    let mut dashboard = ctx.lock_automation()?;
    let workflow = dashboard.add_workflow(name, req.trigger, req.actions).clone();
    Ok((StatusCode::CREATED, Json(workflow)))
}

/// `POST /api/automation/workflows/:id/toggle`
pub async fn toggle_workflow(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Workflow>, ApiError> {
    let mut dashboard = ctx.lock_automation()?;
    dashboard.toggle_workflow(id)?;
    Ok(Json(dashboard.workflow(id)?.clone()))
}

/// `GET /api/automation/events?status=`
pub async fn list_events(
    State(ctx): State<ApiContext>,
    Query(q): Query<EventQuery>,
) -> Result<Json<Vec<AutomationEvent>>, ApiError> {
    let status = q
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| EventStatus::from_str(s.trim()).map_err(|e| ApiError::BadRequest(e.to_string())))
        .transpose()?;
    let dashboard = ctx.lock_automation()?;
    Ok(Json(dashboard.events(status).into_iter().cloned().collect()))
}

/// `POST /api/automation/events`
pub async fn schedule_event(
    State(ctx): State<ApiContext>,
    Json(req): Json<ScheduleEventRequest>,
) -> Result<(StatusCode, Json<AutomationEvent>), ApiError> {
    let when = req.scheduled_for.unwrap_or_else(Utc::now);
    let mut dashboard = ctx.lock_automation()?;
    let event = dashboard
        .schedule_event(req.workflow_id, req.patient_id, when)?
        .clone();
    Ok((StatusCode::CREATED, Json(event)))
}

/// `POST /api/automation/events/:id/execute`
pub async fn execute_event(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<AutomationEvent>, ApiError> {
    let mut dashboard = ctx.lock_automation()?;
    dashboard.simulate_execution(id)?;
    Ok(Json(dashboard.event(id)?.clone()))
}

/// `GET /api/automation/stats`
pub async fn stats(State(ctx): State<ApiContext>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(ctx.lock_automation()?.stats()))
}

/// `GET /api/automation/webhook`
pub async fn get_webhook(State(ctx): State<ApiContext>) -> Result<Json<WebhookView>, ApiError> {
    let config = ctx.lock_webhook()?;
    Ok(Json(WebhookView::from(&*config)))
}

/// `PUT /api/automation/webhook`: replaces the settings after validation.
pub async fn put_webhook(
    State(ctx): State<ApiContext>,
    Json(config): Json<WebhookConfig>,
) -> Result<Json<WebhookView>, ApiError> {
    config.validate()?;
    let mut stored = ctx.lock_webhook()?;
    *stored = config;
    tracing::info!(url = %stored.url, enabled = stored.enabled, "Webhook updated");
    Ok(Json(WebhookView::from(&*stored)))
}

/// `POST /api/automation/webhook/test`
pub async fn test_webhook(State(ctx): State<ApiContext>) -> Result<Json<ConnectionTest>, ApiError> {
    // Clone so the lock is not held across the simulated delay.
    let config = ctx.lock_webhook()?.clone();
    Ok(Json(simulate_test_connection(&config, ctx.config.webhook_test_delay).await))
}
