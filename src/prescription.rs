//! Prescription drafting: simulated medication extraction, draft prefill
//! and validation.
//!
//! Extraction is keyword matching against a small fixed formulary. Strength
//! and frequency are captured from the same sentence as the drug name.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Patient;

/// Upper bound on repeats for a single item.
pub const MAX_REPEATS: u8 = 5;

/// Formulary entry: generic name and its usual dosage unit.
struct FormularyEntry {
    name: &'static str,
    form: &'static str,
}

const fn entry(name: &'static str, form: &'static str) -> FormularyEntry {
    FormularyEntry { name, form }
}

static FORMULARY: &[FormularyEntry] = &[
    entry("amoxicillin", "capsule"),
    entry("azithromycin", "tablet"),
    entry("flucloxacillin", "capsule"),
    entry("paracetamol", "tablet"),
    entry("ibuprofen", "tablet"),
    entry("diclofenac", "tablet"),
    entry("metformin", "tablet"),
    entry("amlodipine", "tablet"),
    entry("enalapril", "tablet"),
    entry("losartan", "tablet"),
    entry("hydrochlorothiazide", "tablet"),
    entry("atorvastatin", "tablet"),
    entry("simvastatin", "tablet"),
    entry("omeprazole", "capsule"),
    entry("salbutamol", "puff"),
    entry("prednisone", "tablet"),
    entry("cetirizine", "tablet"),
    entry("fluoxetine", "capsule"),
    entry("sertraline", "tablet"),
    entry("co-trimoxazole", "tablet"),
];

/// Allergy term → drugs it rules out.
static CROSS_REACTIVITY: &[(&str, &[&str])] = &[
    ("penicillin", &["amoxicillin", "flucloxacillin", "ampicillin", "penicillin"]),
    ("nsaid", &["ibuprofen", "diclofenac", "naproxen", "aspirin"]),
    ("sulfa", &["co-trimoxazole", "sulfamethoxazole"]),
    ("statin", &["atorvastatin", "simvastatin", "rosuvastatin"]),
];

/// Recognised frequency phrases and their normalised form with doses per day.
static FREQUENCIES: &[(&str, &str, Option<u32>)] = &[
    ("four times daily", "four times daily", Some(4)),
    ("three times daily", "three times daily", Some(3)),
    ("twice daily", "twice daily", Some(2)),
    ("once daily", "once daily", Some(1)),
    ("every 8 hours", "three times daily", Some(3)),
    ("every 12 hours", "twice daily", Some(2)),
    ("qid", "four times daily", Some(4)),
    ("tds", "three times daily", Some(3)),
    ("tid", "three times daily", Some(3)),
    ("bd", "twice daily", Some(2)),
    ("bid", "twice daily", Some(2)),
    ("nocte", "at night", Some(1)),
    ("at night", "at night", Some(1)),
    ("daily", "once daily", Some(1)),
    ("prn", "as needed", None),
    ("as needed", "as needed", None),
];

static STRENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(mg|mcg|g|ml|iu|units?)\b").expect("Invalid strength regex")
});

static FREQUENCY: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = FREQUENCIES
        .iter()
        .map(|(phrase, _, _)| regex::escape(phrase))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("Invalid frequency regex")
});

static SENTENCE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n;]|\.\s+|\.$").expect("Invalid sentence regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMedication {
    pub name: String,
    pub strength: Option<String>,
    pub frequency: Option<String>,
    pub form: String,
    pub source_sentence: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionItem {
    pub medication: String,
    #[serde(default)]
    pub strength: Option<String>,
    pub dosage: String,
    pub frequency: String,
    #[serde(default)]
    pub duration: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub repeats: u8,
    #[serde(default)]
    pub instructions: Option<String>,
}

impl PrescriptionItem {
    /// "Amoxicillin 500 mg"
    pub fn heading(&self) -> String {
        let name = capitalize(&self.medication);
        match &self.strength {
            Some(s) if !s.trim().is_empty() => format!("{name} {}", s.trim()),
            _ => name,
        }
    }

    /// "Take 1 capsule three times daily for 7 days"
    pub fn directions(&self) -> String {
        let mut out = format!("Take {} {}", self.dosage.trim(), self.frequency.trim());
        if let Some(d) = self.duration.as_deref().filter(|d| !d.trim().is_empty()) {
            out.push_str(" for ");
            out.push_str(d.trim());
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionDraft {
    pub id: Uuid,
    pub patient: Patient,
    #[serde(default)]
    pub prescriber: Option<String>,
    pub date: NaiveDate,
    pub items: Vec<PrescriptionItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Index into `items`; `None` for draft-level issues.
    pub item: Option<usize>,
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(item: Option<usize>, field: &str, message: impl Into<String>) -> Self {
        Self { item, field: field.into(), message: message.into() }
    }
}

impl PrescriptionDraft {
    /// Prefills one item per extracted medication. Quantities assume a
    /// 30-day supply when the frequency is known.
    pub fn from_extracted(
        patient: Patient,
        prescriber: Option<String>,
        date: NaiveDate,
        extracted: &[ExtractedMedication],
    ) -> Self {
        let items = extracted
            .iter()
            .map(|m| {
                let per_day = m.frequency.as_deref().and_then(doses_per_day);
                PrescriptionItem {
                    medication: m.name.clone(),
                    strength: m.strength.clone(),
                    dosage: format!("1 {}", m.form),
                    frequency: m.frequency.clone().unwrap_or_default(),
                    duration: None,
                    quantity: per_day.map_or(30, |n| n * 30),
                    repeats: 0,
                    instructions: None,
                }
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            patient,
            prescriber,
            date,
            items,
            notes: None,
        }
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if self.items.is_empty() {
            issues.push(ValidationIssue::new(None, "items", "Prescription has no medication"));
        }

        for (i, item) in self.items.iter().enumerate() {
            let idx = Some(i);
            if item.medication.trim().is_empty() {
                issues.push(ValidationIssue::new(idx, "medication", "Medication name is required"));
            }
            if item.dosage.trim().is_empty() {
                issues.push(ValidationIssue::new(idx, "dosage", "Dosage is required"));
            }
            if item.frequency.trim().is_empty() {
                issues.push(ValidationIssue::new(idx, "frequency", "Frequency is required"));
            }
            if item.quantity == 0 {
                issues.push(ValidationIssue::new(idx, "quantity", "Quantity must be at least 1"));
            }
            if item.repeats > MAX_REPEATS {
                issues.push(ValidationIssue::new(
                    idx,
                    "repeats",
                    format!("At most {MAX_REPEATS} repeats are allowed"),
                ));
            }
            if let Some(allergy) = allergy_conflict(&item.medication, &self.patient.allergies) {
                issues.push(ValidationIssue::new(
                    idx,
                    "medication",
                    format!("{} conflicts with recorded allergy: {allergy}", capitalize(&item.medication)),
                ));
            }
        }
        issues
    }
}

/// The first recorded allergy that rules out `medication`.
pub fn allergy_conflict<'a>(medication: &str, allergies: &'a [String]) -> Option<&'a str> {
    let med = medication.trim().to_lowercase();
    if med.is_empty() {
        return None;
    }
    allergies.iter().map(String::as_str).find(|allergy| {
        let allergy_lower = allergy.trim().to_lowercase();
        if allergy_lower.is_empty() {
            return false;
        }
        if med.contains(&allergy_lower) || allergy_lower.contains(&med) {
            return true;
        }
        CROSS_REACTIVITY
            .iter()
            .any(|(term, drugs)| allergy_lower.contains(term) && drugs.iter().any(|d| med.contains(d)))
    })
}

fn doses_per_day(frequency: &str) -> Option<u32> {
    FREQUENCIES
        .iter()
        .find(|(_, normalised, _)| *normalised == frequency)
        .and_then(|(_, _, n)| *n)
}

fn normalise_frequency(matched: &str) -> Option<&'static str> {
    let lower = matched.to_lowercase();
    FREQUENCIES
        .iter()
        .find(|(phrase, _, _)| *phrase == lower)
        .map(|(_, normalised, _)| *normalised)
}

fn capitalize(s: &str) -> String {
    let s = s.trim();
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Finds formulary medications in free text, ordered by first mention.
pub fn extract_medications(text: &str) -> Vec<ExtractedMedication> {
    let mut found: Vec<ExtractedMedication> = Vec::new();

    for sentence in SENTENCE_SPLIT.split(text) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let lower = sentence.to_lowercase();

        let mut hits: Vec<(usize, &FormularyEntry)> = FORMULARY
            .iter()
            .filter_map(|e| lower.find(e.name).map(|pos| (pos, e)))
            .collect();
        hits.sort_by_key(|(pos, _)| *pos);

        for (pos, e) in hits {
            if found.iter().any(|m| m.name == e.name) {
                continue;
            }
            // Strength and frequency are read from the text after the name,
            // up to the next formulary mention.
            let tail_end = FORMULARY
                .iter()
                .filter_map(|other| lower[pos + e.name.len()..].find(other.name))
                .min()
                .map_or(lower.len(), |off| pos + e.name.len() + off);
            let tail = &lower[pos..tail_end];

            let strength = STRENGTH
                .captures(tail)
                .map(|c| format!("{} {}", &c[1], &c[2]));
            let frequency = FREQUENCY
                .find(tail)
                .and_then(|m| normalise_frequency(m.as_str()))
                .map(str::to_string);

            let mut confidence = 0.6;
            if strength.is_some() {
                confidence += 0.2;
            }
            if frequency.is_some() {
                confidence += 0.2;
            }

            found.push(ExtractedMedication {
                name: e.name.to_string(),
                strength,
                frequency,
                form: e.form.to_string(),
                source_sentence: sentence.to_string(),
                confidence,
            });
        }
    }

    found
}

/// Extraction behind a fixed artificial delay standing in for a model call.
pub async fn extract_with_delay(text: String, delay: Duration) -> Vec<ExtractedMedication> {
    tokio::time::sleep(delay).await;
    let meds = extract_medications(&text);
    tracing::debug!(count = meds.len(), "Simulated medication extraction complete");
    meds
}
