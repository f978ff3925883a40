use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ConsultationType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// ICD-10 code when known.
    #[serde(default)]
    pub code: Option<String>,
    pub description: String,
}

impl Diagnosis {
    pub fn display(&self) -> String {
        match &self.code {
            Some(code) if !code.trim().is_empty() => format!("{} ({})", self.description, code.trim()),
            _ => self.description.clone(),
        }
    }
}

/// One recorded clinical encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub visit_date: NaiveDate,
    pub consultation_type: ConsultationType,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub diagnoses: Option<Vec<Diagnosis>>,
    /// Structured notes keyed by template section id.
    #[serde(default)]
    pub sections: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub practitioner: Option<String>,
}

impl Consultation {
    /// Diagnoses with a non-empty description.
    pub fn diagnosis_list(&self) -> Vec<&Diagnosis> {
        self.diagnoses
            .iter()
            .flatten()
            .filter(|d| !d.description.trim().is_empty())
            .collect()
    }

    pub fn has_structured_notes(&self) -> bool {
        self.sections
            .as_ref()
            .is_some_and(|s| s.values().any(|v| !v.trim().is_empty()))
    }
}
