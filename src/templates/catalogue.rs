//! Built-in consultation templates.
//!
//! Section order is the order notes are captured and exported in. Keywords are
//! lowercase; they only tag free text for display.

use crate::models::{Jurisdiction, SectionType, Template, TemplateCategory, TemplateSection};

const fn section(
    id: &'static str,
    title: &'static str,
    section_type: SectionType,
    required: bool,
    keywords: &'static [&'static str],
    placeholder: &'static str,
) -> TemplateSection {
    TemplateSection { id, title, section_type, required, keywords, placeholder }
}

const SYMPTOM_WORDS: &[&str] = &[
    "pain",
    "ache",
    "cough",
    "fever",
    "nausea",
    "fatigue",
    "complains",
];
const VITAL_WORDS: &[&str] = &[
    "bp",
    "blood pressure",
    "pulse",
    "heart rate",
    "temp",
    "spo2",
    "weight",
];
const HISTORY_WORDS: &[&str] = &["history", "previous", "family", "surgery", "chronic"];
const EXAM_WORDS: &[&str] = &[
    "on examination",
    "palpation",
    "auscultation",
    "tender",
    "inspection",
];
const DIAGNOSIS_WORDS: &[&str] = &["diagnosis", "impression", "icd", "likely"];
const PLAN_WORDS: &[&str] = &["plan", "refer", "advise", "prescribe", "start", "continue"];
const MEDICATION_WORDS: &[&str] = &["mg", "tablet", "capsule", "dose", "daily"];
const FOLLOW_UP_WORDS: &[&str] = &["follow up", "follow-up", "review", "return", "weeks"];
const MOOD_WORDS: &[&str] = &["mood", "affect", "anxiety", "sleep", "thoughts", "insight"];
const GOAL_WORDS: &[&str] = &["goal", "target", "aim", "outcome"];
const DIET_WORDS: &[&str] = &["diet", "meal", "intake", "calories", "bmi", "appetite"];
const MOBILITY_WORDS: &[&str] = &["range of motion", "rom", "strength", "gait", "mobility"];

pub(super) fn builtin_templates() -> Vec<Template> {
    vec![
        Template {
            id: "gp-soap-za",
            name: "GP SOAP Consultation",
            description: "Standard SOAP note for general practice with ICD-10 coding for medical aid claims.",
            category: TemplateCategory::GeneralPractice,
            jurisdiction: Jurisdiction::SouthAfrica,
            sections: vec![
                section(
                    "presenting_complaint",
                    "Presenting Complaint",
                    SectionType::Symptoms,
                    true,
                    SYMPTOM_WORDS,
                    "Reason for visit in the patient's words",
                ),
                section(
                    "history",
                    "History",
                    SectionType::History,
                    false,
                    HISTORY_WORDS,
                    "Relevant medical, surgical and family history",
                ),
                section(
                    "vitals",
                    "Vital Signs",
                    SectionType::Vitals,
                    true,
                    VITAL_WORDS,
                    "BP, pulse, temperature, SpO2, weight",
                ),
                section(
                    "examination",
                    "Examination",
                    SectionType::Examination,
                    true,
                    EXAM_WORDS,
                    "Findings on examination",
                ),
                section(
                    "diagnosis",
                    "Diagnosis (ICD-10)",
                    SectionType::Diagnosis,
                    true,
                    DIAGNOSIS_WORDS,
                    "Working diagnosis with ICD-10 code",
                ),
                section(
                    "plan",
                    "Management Plan",
                    SectionType::Plan,
                    true,
                    PLAN_WORDS,
                    "Treatment, referrals and advice",
                ),
                section(
                    "medication",
                    "Medication",
                    SectionType::Medication,
                    false,
                    MEDICATION_WORDS,
                    "Prescribed medication",
                ),
                section(
                    "follow_up",
                    "Follow-up",
                    SectionType::FollowUp,
                    false,
                    FOLLOW_UP_WORDS,
                    "When and why to return",
                ),
            ],
        },
        Template {
            id: "gp-soap-uk",
            name: "GP Consultation (UK)",
            description: "Problem-oriented GP consultation with safety-netting advice.",
            category: TemplateCategory::GeneralPractice,
            jurisdiction: Jurisdiction::UnitedKingdom,
            sections: vec![
                section(
                    "history",
                    "History of Presenting Complaint",
                    SectionType::Symptoms,
                    true,
                    SYMPTOM_WORDS,
                    "Onset, duration, severity",
                ),
                section(
                    "examination",
                    "Examination",
                    SectionType::Examination,
                    true,
                    EXAM_WORDS,
                    "Observations and findings",
                ),
                section(
                    "impression",
                    "Impression",
                    SectionType::Assessment,
                    true,
                    DIAGNOSIS_WORDS,
                    "Clinical impression",
                ),
                section("plan", "Plan", SectionType::Plan, true, PLAN_WORDS, "Management plan"),
                section(
                    "safety_net",
                    "Safety Netting",
                    SectionType::FollowUp,
                    true,
                    FOLLOW_UP_WORDS,
                    "Red flags discussed and when to seek help",
                ),
            ],
        },
        Template {
            id: "gp-followup",
            name: "Follow-up Visit",
            description: "Short follow-up review of an existing problem.",
            category: TemplateCategory::GeneralPractice,
            jurisdiction: Jurisdiction::International,
            sections: vec![
                section(
                    "progress",
                    "Progress Since Last Visit",
                    SectionType::Symptoms,
                    true,
                    SYMPTOM_WORDS,
                    "Changes since last visit",
                ),
                section(
                    "vitals",
                    "Vital Signs",
                    SectionType::Vitals,
                    false,
                    VITAL_WORDS,
                    "Repeat observations",
                ),
                section(
                    "assessment",
                    "Assessment",
                    SectionType::Assessment,
                    true,
                    DIAGNOSIS_WORDS,
                    "Current status",
                ),
                section(
                    "plan",
                    "Plan",
                    SectionType::Plan,
                    true,
                    PLAN_WORDS,
                    "Changes to management",
                ),
            ],
        },
        Template {
            id: "psych-session",
            name: "Psychotherapy Session",
            description: "Individual therapy session note with mental status examination.",
            category: TemplateCategory::Psychology,
            jurisdiction: Jurisdiction::International,
            sections: vec![
                section(
                    "presenting_concerns",
                    "Presenting Concerns",
                    SectionType::Symptoms,
                    true,
                    MOOD_WORDS,
                    "Issues raised this session",
                ),
                section(
                    "mental_status",
                    "Mental Status Examination",
                    SectionType::MentalStatus,
                    true,
                    MOOD_WORDS,
                    "Appearance, mood, affect, thought, insight",
                ),
                section(
                    "interventions",
                    "Interventions",
                    SectionType::Plan,
                    true,
                    PLAN_WORDS,
                    "Techniques used",
                ),
                section(
                    "risk",
                    "Risk Assessment",
                    SectionType::Assessment,
                    true,
                    &["risk", "self-harm", "suicidal", "safety"],
                    "Risk to self and others",
                ),
                section(
                    "goals",
                    "Treatment Goals",
                    SectionType::Goals,
                    false,
                    GOAL_WORDS,
                    "Progress against goals",
                ),
                section(
                    "next_session",
                    "Next Session",
                    SectionType::FollowUp,
                    false,
                    FOLLOW_UP_WORDS,
                    "Homework and next appointment",
                ),
            ],
        },
        Template {
            id: "physio-initial",
            name: "Physiotherapy Initial Assessment",
            description: "Musculoskeletal assessment with functional goals.",
            category: TemplateCategory::Physiotherapy,
            jurisdiction: Jurisdiction::International,
            sections: vec![
                section(
                    "complaint",
                    "Subjective Complaint",
                    SectionType::Symptoms,
                    true,
                    SYMPTOM_WORDS,
                    "Pain location, behaviour, aggravating factors",
                ),
                section(
                    "history",
                    "History",
                    SectionType::History,
                    false,
                    HISTORY_WORDS,
                    "Mechanism of injury, previous episodes",
                ),
                section(
                    "objective",
                    "Objective Assessment",
                    SectionType::Examination,
                    true,
                    MOBILITY_WORDS,
                    "ROM, strength, special tests",
                ),
                section(
                    "goals",
                    "Functional Goals",
                    SectionType::Goals,
                    true,
                    GOAL_WORDS,
                    "Short and long term goals",
                ),
                section(
                    "treatment",
                    "Treatment Plan",
                    SectionType::Plan,
                    true,
                    PLAN_WORDS,
                    "Modalities and home exercise programme",
                ),
            ],
        },
        Template {
            id: "dietetics-initial",
            name: "Dietetic Consultation",
            description: "Nutritional assessment and meal plan.",
            category: TemplateCategory::Dietetics,
            jurisdiction: Jurisdiction::International,
            sections: vec![
                section(
                    "anthropometry",
                    "Anthropometry",
                    SectionType::Vitals,
                    true,
                    &["weight", "height", "bmi", "waist"],
                    "Weight, height, BMI",
                ),
                section(
                    "diet_history",
                    "Diet History",
                    SectionType::History,
                    true,
                    DIET_WORDS,
                    "Typical daily intake",
                ),
                section(
                    "assessment",
                    "Nutritional Assessment",
                    SectionType::Assessment,
                    true,
                    DIAGNOSIS_WORDS,
                    "Nutrition diagnosis",
                ),
                section(
                    "plan",
                    "Meal Plan",
                    SectionType::Plan,
                    true,
                    DIET_WORDS,
                    "Recommended plan",
                ),
                section(
                    "goals",
                    "Goals",
                    SectionType::Goals,
                    false,
                    GOAL_WORDS,
                    "Targets for next visit",
                ),
            ],
        },
        Template {
            id: "paeds-wellchild",
            name: "Well-child Visit",
            description: "Growth, development and immunisation review.",
            category: TemplateCategory::Paediatrics,
            jurisdiction: Jurisdiction::SouthAfrica,
            sections: vec![
                section(
                    "growth",
                    "Growth",
                    SectionType::Vitals,
                    true,
                    &["weight", "height", "head circumference", "percentile"],
                    "Weight, height, head circumference",
                ),
                section(
                    "development",
                    "Developmental Milestones",
                    SectionType::Examination,
                    true,
                    &["milestone", "crawl", "walk", "speech"],
                    "Milestones achieved",
                ),
                section(
                    "immunisations",
                    "Immunisations",
                    SectionType::Medication,
                    true,
                    &["vaccine", "immunisation", "dose"],
                    "Immunisations given today",
                ),
                section(
                    "concerns",
                    "Parental Concerns",
                    SectionType::Symptoms,
                    false,
                    SYMPTOM_WORDS,
                    "Concerns raised",
                ),
                section(
                    "plan",
                    "Plan",
                    SectionType::Plan,
                    false,
                    PLAN_WORDS,
                    "Advice and next visit",
                ),
            ],
        },
        Template {
            id: "chronic-review",
            name: "Chronic Disease Review",
            description: "Periodic review for hypertension, diabetes and other chronic conditions.",
            category: TemplateCategory::Chronic,
            jurisdiction: Jurisdiction::SouthAfrica,
            sections: vec![
                section(
                    "vitals",
                    "Vital Signs",
                    SectionType::Vitals,
                    true,
                    VITAL_WORDS,
                    "BP, weight, glucose",
                ),
                section(
                    "adherence",
                    "Medication Adherence",
                    SectionType::Medication,
                    true,
                    MEDICATION_WORDS,
                    "Missed doses, side effects",
                ),
                section(
                    "results",
                    "Recent Results",
                    SectionType::Examination,
                    false,
                    &["hba1c", "cholesterol", "creatinine", "result"],
                    "Latest pathology",
                ),
                section(
                    "assessment",
                    "Control Assessment",
                    SectionType::Assessment,
                    true,
                    DIAGNOSIS_WORDS,
                    "Disease control",
                ),
                section(
                    "plan",
                    "Plan",
                    SectionType::Plan,
                    true,
                    PLAN_WORDS,
                    "Changes and chronic medication authorisation",
                ),
                section(
                    "follow_up",
                    "Next Review",
                    SectionType::FollowUp,
                    true,
                    FOLLOW_UP_WORDS,
                    "Next review date",
                ),
            ],
        },
        Template {
            id: "telehealth-brief",
            name: "Telehealth Consultation",
            description: "Remote consultation note with consent and limitations recorded.",
            category: TemplateCategory::GeneralPractice,
            jurisdiction: Jurisdiction::UnitedStates,
            sections: vec![
                section(
                    "consent",
                    "Consent",
                    SectionType::Notes,
                    true,
                    &["consent", "verbal", "video"],
                    "Consent to telehealth obtained",
                ),
                section(
                    "chief_complaint",
                    "Chief Complaint",
                    SectionType::Symptoms,
                    true,
                    SYMPTOM_WORDS,
                    "Chief complaint",
                ),
                section(
                    "assessment",
                    "Assessment",
                    SectionType::Assessment,
                    true,
                    DIAGNOSIS_WORDS,
                    "Assessment",
                ),
                section("plan", "Plan", SectionType::Plan, true, PLAN_WORDS, "Plan"),
                section(
                    "limitations",
                    "Limitations",
                    SectionType::Notes,
                    false,
                    &["limited", "unable to examine", "in person"],
                    "Examination limitations",
                ),
            ],
        },
    ]
}
