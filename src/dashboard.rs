//! Per-patient overview shown on the practitioner dashboard.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assessment::{assess_status, StatusAssessment};
use crate::models::{Consultation, ConsultationType, Patient};

/// Diagnoses beyond this many are left off the summary.
const RECENT_DIAGNOSES_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSummary {
    pub full_name: String,
    pub age: Option<u32>,
    pub total_sessions: usize,
    pub last_visit: Option<NaiveDate>,
    pub recent_diagnoses: Vec<String>,
    pub sessions_by_type: BTreeMap<ConsultationType, usize>,
    pub latest_assessment: Option<StatusAssessment>,
}

/// Summarizes `sessions` for `patient`. Sessions belonging to other patients
/// are ignored; input order does not matter.
pub fn summarize(patient: &Patient, sessions: &[Consultation], today: NaiveDate) -> PatientSummary {
    let mut own: Vec<&Consultation> = sessions
        .iter()
        .filter(|s| s.patient_id == patient.id)
        .collect();
    // Most recent first.
    own.sort_by(|a, b| b.visit_date.cmp(&a.visit_date));

    let mut recent_diagnoses: Vec<String> = Vec::new();
    for d in own.iter().flat_map(|s| s.diagnosis_list()) {
        let label = d.display();
        if !recent_diagnoses.iter().any(|seen| seen.eq_ignore_ascii_case(&label)) {
            recent_diagnoses.push(label);
        }
        if recent_diagnoses.len() == RECENT_DIAGNOSES_LIMIT {
            break;
        }
    }

    let mut sessions_by_type = BTreeMap::new();
    for s in &own {
        *sessions_by_type.entry(s.consultation_type).or_insert(0) += 1;
    }

    PatientSummary {
        full_name: patient.full_name(),
        age: patient.age_on(today),
        total_sessions: own.len(),
        last_visit: own.first().map(|s| s.visit_date),
        recent_diagnoses,
        sessions_by_type,
        latest_assessment: own.first().map(|s| assess_status(&s.content)),
    }
}
