//! PDF export endpoints.
//!
//! Both return the PDF body with `Content-Disposition` and `X-Page-Count`.
//! With `"save": true` the file is also written to the exports directory.

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::export::{
    export_consultation_pdf, export_prescription_pdf, save_to_dir, ExportError, ExportOptions,
    ExportedDocument,
};
use crate::models::{Consultation, DocumentKind, Patient};
use crate::prescription::PrescriptionDraft;

fn default_kind() -> DocumentKind {
    DocumentKind::Consultation
}

#[derive(Debug, Deserialize)]
pub struct ConsultationExportRequest {
    pub patient: Patient,
    pub consultation: Consultation,
    #[serde(default = "default_kind")]
    pub kind: DocumentKind,
    #[serde(default)]
    pub options: ExportOptions,
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Deserialize)]
pub struct PrescriptionExportRequest {
    pub draft: PrescriptionDraft,
    #[serde(default)]
    pub options: ExportOptions,
    #[serde(default)]
    pub save: bool,
}

/// Runs PDF generation off the async runtime.
async fn render<F>(job: F) -> Result<ExportedDocument, ApiError>
where
    F: FnOnce() -> Result<ExportedDocument, ExportError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ApiError::Internal(format!("export task failed: {e}")))?
        .map_err(ApiError::from)
}

fn pdf_response(ctx: &ApiContext, doc: ExportedDocument, save: bool) -> Result<Response, ApiError> {
    if save {
        save_to_dir(&doc.bytes, &doc.filename, &ctx.config.export_dir)?;
    }
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", doc.filename))
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
            (
                header::HeaderName::from_static("x-page-count"),
                HeaderValue::from(doc.page_count),
            ),
        ],
        doc.bytes,
    )
        .into_response())
}

/// `POST /api/export/consultation`
pub async fn consultation(
    State(ctx): State<ApiContext>,
    Json(req): Json<ConsultationExportRequest>,
) -> Result<Response, ApiError> {
    if req.kind == DocumentKind::Prescription {
        return Err(ApiError::BadRequest(
            "Use /api/export/prescription for prescriptions".into(),
        ));
    }
    let ConsultationExportRequest { patient, consultation, kind, options, save } = req;
    let doc = render(move || export_consultation_pdf(&patient, &consultation, kind, &options)).await?;
    pdf_response(&ctx, doc, save)
}

/// `POST /api/export/prescription`
pub async fn prescription(
    State(ctx): State<ApiContext>,
    Json(req): Json<PrescriptionExportRequest>,
) -> Result<Response, ApiError> {
    let PrescriptionExportRequest { draft, options, save } = req;
    let doc = render(move || export_prescription_pdf(&draft, &options)).await?;
    pdf_response(&ctx, doc, save)
}
