//! Document export: consultation, session-notes and prescription PDFs.
//!
//! Export runs in two stages. [`sections`] flows the document into a
//! [`LayoutPlan`] of positioned draw operations using the page engine in
//! [`layout`]; [`pdf`] replays the plan with `printpdf`. Pagination, the
//! continuation header and the "Page N of M" footer all live in the plan, so
//! they are tested without parsing PDF output.

pub mod layout;
pub mod pdf;
pub mod sections;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{Consultation, DocumentKind, Patient};
use crate::prescription::PrescriptionDraft;
use crate::templates::TemplateRegistry;

pub use layout::{LayoutPlan, RgbColor};
pub use pdf::render_pdf;
pub use sections::{layout_consultation, layout_prescription};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF save error: {0}")]
    Save(String),
    #[error("PDF buffer error: {0}")]
    Buffer(String),
    #[error("Export IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Practice letterhead printed at the top of the first page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Letterhead {
    pub practice_name: String,
    #[serde(default)]
    pub address_lines: Vec<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub practice_number: Option<String>,
    /// `#RRGGBB`.
    #[serde(default)]
    pub accent_color: Option<String>,
}

impl Letterhead {
    /// Accent color for headings. Malformed hex falls back to the default.
    pub fn accent(&self) -> RgbColor {
        let Some(hex) = self.accent_color.as_deref() else {
            return RgbColor::DEFAULT_ACCENT;
        };
        RgbColor::from_hex(hex).unwrap_or_else(|| {
            tracing::warn!(color = hex, "Invalid letterhead color, using default accent");
            RgbColor::DEFAULT_ACCENT
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignatureConfig {
    pub practitioner_name: String,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    /// Defaults to the visit or prescription date.
    #[serde(default)]
    pub signed_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportOptions {
    #[serde(default)]
    pub letterhead: Option<Letterhead>,
    #[serde(default)]
    pub signature: Option<SignatureConfig>,
    #[serde(default)]
    pub watermark: Option<String>,
    /// Pins the footer timestamp. Local time when absent.
    #[serde(default)]
    pub generated_at: Option<NaiveDateTime>,
}

impl ExportOptions {
    pub(crate) fn footer_note(&self) -> String {
        let ts = self
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local());
        format!("Generated {}", ts.format("%Y-%m-%d %H:%M"))
    }
}

#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

fn filename_part(s: &str) -> String {
    let cleaned: String = s
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

/// `{surname}_{name}_{type}_{date}.pdf`
pub fn export_filename(patient: &Patient, kind: DocumentKind, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}_{}.pdf",
        filename_part(&patient.surname),
        filename_part(&patient.name),
        kind.as_str(),
        date.format("%Y-%m-%d")
    )
}

/// Lays out and renders a consultation or session-notes PDF. The template is
/// looked up from the consultation's `template_id`; an unknown id exports
/// the notes in key order.
pub fn export_consultation_pdf(
    patient: &Patient,
    consultation: &Consultation,
    kind: DocumentKind,
    options: &ExportOptions,
) -> Result<ExportedDocument, ExportError> {
    let template = consultation.template_id.as_deref().and_then(|id| {
        TemplateRegistry::builtin()
            .get(id)
            .map_err(|e| tracing::warn!(template_id = id, "{e}, exporting without template"))
            .ok()
    });

    let plan = layout_consultation(patient, consultation, template, kind, options);
    let bytes = render_pdf(&plan)?;
    let filename = export_filename(patient, kind, consultation.visit_date);
    let pages = plan.page_count();

    tracing::info!(pages, filename = %filename, kind = %kind, "Consultation exported");
    Ok(ExportedDocument { filename, bytes, page_count: pages })
}

pub fn export_prescription_pdf(
    draft: &PrescriptionDraft,
    options: &ExportOptions,
) -> Result<ExportedDocument, ExportError> {
    let plan = layout_prescription(draft, options);
    let bytes = render_pdf(&plan)?;
    let filename = export_filename(&draft.patient, DocumentKind::Prescription, draft.date);
    let pages = plan.page_count();

    tracing::info!(pages, filename = %filename, items = draft.items.len(), "Prescription exported");
    Ok(ExportedDocument { filename, bytes, page_count: pages })
}

/// Writes PDF bytes into `dir`, creating it if needed.
pub fn save_to_dir(bytes: &[u8], filename: &str, dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "PDF written");
    Ok(path)
}
