//! Prescription drafting endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::types::ApiContext;
use crate::prescription::{extract_with_delay, ExtractedMedication, PrescriptionDraft, ValidationIssue};

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub medications: Vec<ExtractedMedication>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

/// `POST /api/prescriptions/extract`
pub async fn extract(
    State(ctx): State<ApiContext>,
    Json(req): Json<ExtractRequest>,
) -> Json<ExtractResponse> {
    let medications = extract_with_delay(req.text, ctx.config.extraction_delay).await;
    Json(ExtractResponse { medications })
}

/// `POST /api/prescriptions/validate`
pub async fn validate(Json(draft): Json<PrescriptionDraft>) -> Json<ValidateResponse> {
    let issues = draft.validate();
    Json(ValidateResponse {
        valid: issues.is_empty(),
        issues,
    })
}
