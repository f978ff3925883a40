//! Named document sections, each skipped when its backing data is absent.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::layout::{
    line_height, LayoutEngine, LayoutPlan, PageGeometry, RgbColor, TextStyle, BODY_SIZE,
    SMALL_SIZE,
};
use super::{ExportOptions, Letterhead, SignatureConfig};
use crate::models::{Consultation, DocumentKind, Gender, Patient, Template};
use crate::prescription::PrescriptionDraft;

const SIGNATURE_BLOCK_HEIGHT: f32 = 32.0;

pub(crate) fn continuation_header(patient: &Patient, kind: DocumentKind) -> String {
    format!(
        "{}, {} | {} (continued)",
        patient.surname.trim(),
        patient.name.trim(),
        kind.title()
    )
}

fn display_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

fn engine_for(patient: &Patient, kind: DocumentKind, options: &ExportOptions) -> LayoutEngine {
    let accent = options
        .letterhead
        .as_ref()
        .map_or(RgbColor::DEFAULT_ACCENT, Letterhead::accent);
    LayoutEngine::new(
        PageGeometry::default(),
        kind.title(),
        continuation_header(patient, kind),
        options.watermark.clone(),
        accent,
    )
}

fn letterhead(engine: &mut LayoutEngine, letterhead: &Letterhead) {
    let accent = engine.accent();
    engine.paragraph(
        &letterhead.practice_name,
        TextStyle::BODY.sized(15.0).bold().colored(accent),
    );
    let small = TextStyle::BODY.sized(SMALL_SIZE).colored(RgbColor::GREY);
    for line in letterhead.address_lines.iter().filter(|l| !l.trim().is_empty()) {
        engine.paragraph(line, small);
    }
    let contact: Vec<String> = [
        letterhead.phone.as_ref().map(|p| format!("Tel: {p}")),
        letterhead.email.as_ref().map(|e| format!("Email: {e}")),
        letterhead.practice_number.as_ref().map(|n| format!("Practice no: {n}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !contact.is_empty() {
        engine.paragraph(&contact.join(" | "), small);
    }
    engine.gap(1.5);
    engine.rule(0.8, accent);
    engine.gap(4.0);
}

fn encounter_header(
    engine: &mut LayoutEngine,
    title: &str,
    subtitle: &str,
    practitioner: Option<&str>,
    template: Option<&Template>,
) {
    engine.paragraph(title, TextStyle::BODY.sized(17.0).bold());
    engine.paragraph(subtitle, TextStyle::BODY.colored(RgbColor::GREY));
    if let Some(p) = practitioner.filter(|p| !p.trim().is_empty()) {
        engine.field("Practitioner", p.trim());
    }
    if let Some(t) = template {
        engine.paragraph(
            &format!("Template: {}", t.name),
            TextStyle::BODY.sized(SMALL_SIZE).colored(RgbColor::GREY),
        );
    }
    engine.gap(2.0);
}

fn patient_info(engine: &mut LayoutEngine, patient: &Patient, on: NaiveDate) {
    engine.heading("Patient Information");
    engine.field("Name", &patient.full_name());
    if let Some(dob) = patient.date_of_birth {
        let age = patient
            .age_on(on)
            .map(|a| format!(" (age {a})"))
            .unwrap_or_default();
        engine.field("Date of birth", &format!("{}{age}", display_date(dob)));
    }
    if patient.gender != Gender::Unspecified {
        let gender = match patient.gender {
            Gender::Female => "Female",
            Gender::Male => "Male",
            _ => "Other",
        };
        engine.field("Gender", gender);
    }
    if let Some(id) = patient.id_number.as_deref().filter(|s| !s.trim().is_empty()) {
        engine.field("ID number", id);
    }
    let contact: Vec<&str> = [patient.phone.as_deref(), patient.email.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect();
    if !contact.is_empty() {
        engine.field("Contact", &contact.join(", "));
    }
    if let Some(aid) = &patient.medical_aid {
        let mut value = format!("{} - member no {}", aid.scheme, aid.member_number);
        if let Some(dep) = aid.dependant_code.as_deref().filter(|d| !d.trim().is_empty()) {
            value.push_str(&format!(" (dependant {dep})"));
        }
        engine.field("Medical aid", &value);
    }
    let allergies: Vec<&str> = patient
        .allergies
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if !allergies.is_empty() {
        engine.field("Allergies", &allergies.join(", "));
    }
}

fn diagnosis_list(engine: &mut LayoutEngine, consultation: &Consultation) {
    let diagnoses = consultation.diagnosis_list();
    if diagnoses.is_empty() {
        return;
    }
    engine.heading("Diagnosis");
    for (i, d) in diagnoses.iter().enumerate() {
        engine.paragraph(&format!("{}. {}", i + 1, d.display()), TextStyle::BODY);
    }
}

/// "follow_up" -> "Follow up"
fn humanize_key(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Section entries in export order: template order first, then any
/// remaining keys in key order. Empty values are dropped.
pub(crate) fn ordered_sections<'a>(
    sections: &'a BTreeMap<String, String>,
    template: Option<&Template>,
) -> Vec<(String, &'a str)> {
    let mut out = Vec::new();
    if let Some(t) = template {
        for s in &t.sections {
            if let Some(text) = sections.get(s.id).filter(|v| !v.trim().is_empty()) {
                out.push((s.title.to_string(), text.as_str()));
            }
        }
    }
    for (key, text) in sections {
        if text.trim().is_empty() {
            continue;
        }
        if template.is_some_and(|t| t.section(key).is_some()) {
            continue;
        }
        out.push((humanize_key(key), text.as_str()));
    }
    out
}

fn structured_notes(
    engine: &mut LayoutEngine,
    consultation: &Consultation,
    template: Option<&Template>,
) {
    let Some(sections) = consultation.sections.as_ref() else {
        return;
    };
    if !consultation.has_structured_notes() {
        return;
    }
    engine.heading("Clinical Notes");
    for (title, text) in ordered_sections(sections, template) {
        // Sub-heading stays with the first line of its text.
        engine.keep_together(line_height(BODY_SIZE) * 2.0 + 1.0);
        engine.gap(1.0);
        engine.paragraph(&title, TextStyle::BODY.bold());
        engine.text_block(text, TextStyle::BODY.indented(3.0));
    }
}

fn raw_text(engine: &mut LayoutEngine, heading: &str, content: &str) {
    if content.trim().is_empty() {
        return;
    }
    engine.heading(heading);
    engine.text_block(content.trim(), TextStyle::BODY);
}

fn signature_block(engine: &mut LayoutEngine, signature: &SignatureConfig, fallback_date: NaiveDate) {
    engine.keep_together(SIGNATURE_BLOCK_HEIGHT);
    engine.gap(10.0);
    let left = engine.geometry().margin_left;
    engine.rule_span(left, left + 70.0, 0.5);
    engine.paragraph(signature.practitioner_name.trim(), TextStyle::BODY.bold());
    let small = TextStyle::BODY.sized(SMALL_SIZE).colored(RgbColor::GREY);
    if let Some(q) = signature.qualification.as_deref().filter(|q| !q.trim().is_empty()) {
        engine.paragraph(q.trim(), small);
    }
    if let Some(r) = signature
        .registration_number
        .as_deref()
        .filter(|r| !r.trim().is_empty())
    {
        engine.paragraph(&format!("Registration no: {}", r.trim()), small);
    }
    let date = signature.signed_on.unwrap_or(fallback_date);
    engine.paragraph(&format!("Date: {}", display_date(date)), small);
}

/// Lays out a consultation or session-notes document.
pub fn layout_consultation(
    patient: &Patient,
    consultation: &Consultation,
    template: Option<&Template>,
    kind: DocumentKind,
    options: &ExportOptions,
) -> LayoutPlan {
    let mut engine = engine_for(patient, kind, options);

    if let Some(lh) = &options.letterhead {
        letterhead(&mut engine, lh);
    }

    let subtitle = format!(
        "{} | {}",
        consultation.consultation_type.label(),
        display_date(consultation.visit_date)
    );
    encounter_header(
        &mut engine,
        kind.title(),
        &subtitle,
        consultation.practitioner.as_deref(),
        template,
    );
    patient_info(&mut engine, patient, consultation.visit_date);
    diagnosis_list(&mut engine, consultation);
    structured_notes(&mut engine, consultation, template);
    let notes_heading = match kind {
        DocumentKind::SessionNotes => "Session Narrative",
        _ => "Consultation Notes",
    };
    raw_text(&mut engine, notes_heading, &consultation.content);
    if let Some(sig) = &options.signature {
        signature_block(&mut engine, sig, consultation.visit_date);
    }

    engine.finish(&options.footer_note())
}

/// Lays out a prescription document.
pub fn layout_prescription(draft: &PrescriptionDraft, options: &ExportOptions) -> LayoutPlan {
    let kind = DocumentKind::Prescription;
    let mut engine = engine_for(&draft.patient, kind, options);

    if let Some(lh) = &options.letterhead {
        letterhead(&mut engine, lh);
    }
    encounter_header(
        &mut engine,
        kind.title(),
        &display_date(draft.date),
        draft.prescriber.as_deref(),
        None,
    );
    patient_info(&mut engine, &draft.patient, draft.date);

    if !draft.items.is_empty() {
        engine.heading("Medication");
        let detail = TextStyle::BODY.indented(5.0);
        for (i, item) in draft.items.iter().enumerate() {
            engine.keep_together(line_height(BODY_SIZE) * 3.0);
            engine.paragraph(&format!("{}. {}", i + 1, item.heading()), TextStyle::BODY.bold());
            engine.paragraph(&item.directions(), detail);
            engine.paragraph(
                &format!("Quantity: {} | Repeats: {}", item.quantity, item.repeats),
                detail,
            );
            if let Some(instr) = item.instructions.as_deref().filter(|s| !s.trim().is_empty()) {
                engine.paragraph(instr.trim(), detail.colored(RgbColor::GREY));
            }
            engine.gap(2.0);
        }
    }

    if let Some(notes) = draft.notes.as_deref() {
        raw_text(&mut engine, "Notes", notes);
    }
    if let Some(sig) = &options.signature {
        signature_block(&mut engine, sig, draft.date);
    }

    engine.finish(&options.footer_note())
}
