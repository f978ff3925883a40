//! Patient dashboard endpoint.

use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::dashboard::{summarize, PatientSummary};
use crate::models::{Consultation, Patient};

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub patient: Patient,
    #[serde(default)]
    pub sessions: Vec<Consultation>,
    /// Reference date for the age; defaults to today.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// `POST /api/dashboard/summary`
pub async fn summary(Json(req): Json<SummaryRequest>) -> Json<PatientSummary> {
    let today = req.today.unwrap_or_else(|| Local::now().date_naive());
    Json(summarize(&req.patient, &req.sessions, today))
}
