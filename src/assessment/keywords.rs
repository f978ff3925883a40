/// A phrase the mock assessor looks for, with the canned recommendation it
/// contributes when present.
#[derive(Debug)]
pub struct KeywordRule {
    pub phrase: &'static str,
    pub recommendation: &'static str,
}

const fn rule(phrase: &'static str, recommendation: &'static str) -> KeywordRule {
    KeywordRule { phrase, recommendation }
}

/// Phrases that force a high-risk assessment. Matches are surfaced as alerts.
pub static CRITICAL: &[KeywordRule] = &[
    rule("chest pain", "Urgent cardiac work-up: ECG and troponin"),
    rule("shortness of breath", "Assess oxygen saturation and respiratory rate"),
    rule("difficulty breathing", "Assess airway and oxygen saturation"),
    rule("suicidal", "Complete a suicide risk assessment before the patient leaves"),
    rule("self-harm", "Complete a safety plan and arrange close follow-up"),
    rule("seizure", "Neurological assessment and review of anticonvulsant levels"),
    rule("stroke", "Urgent stroke pathway referral"),
    rule("unconscious", "Emergency referral"),
    rule("severe bleeding", "Emergency referral for haemorrhage control"),
    rule("anaphylaxis", "Confirm adrenaline auto-injector and document allergen"),
    rule("overdose", "Toxicology assessment and emergency referral"),
];

/// Phrases that raise the assessment to moderate risk. Matches are surfaced
/// as key findings.
pub static MODERATE: &[KeywordRule] = &[
    rule("fever", "Monitor temperature and review in 48 hours if persistent"),
    rule("headache", "Review headache diary and analgesic use"),
    rule("dizziness", "Check postural blood pressure"),
    rule("vomiting", "Assess hydration status"),
    rule("nausea", "Review medication side effects"),
    rule("cough", "Consider chest examination and review if persisting beyond 3 weeks"),
    rule("hypertension", "Recheck blood pressure and review antihypertensive therapy"),
    rule("high blood pressure", "Recheck blood pressure and review antihypertensive therapy"),
    rule("diabetes", "Review HbA1c and glucose log"),
    rule("infection", "Consider culture before starting antibiotics"),
    rule("fatigue", "Consider full blood count and thyroid function"),
    rule("insomnia", "Discuss sleep hygiene"),
    rule("anxiety", "Screen with GAD-7 and discuss support options"),
    rule("rash", "Document distribution and consider allergen exposure"),
    rule("swelling", "Examine for oedema and review renal function"),
    rule("back pain", "Screen for red flags and advise graded activity"),
    rule("abdominal pain", "Examine abdomen and consider urinalysis"),
];

/// Phrases that indicate improvement. They never raise risk.
pub static POSITIVE: &[&str] = &[
    "improving",
    "improved",
    "stable",
    "resolved",
    "well controlled",
    "no complaints",
    "recovering",
];

/// Rules from `rules` whose phrase appears in `lower`, in rule order.
pub fn matching<'a>(rules: &'a [KeywordRule], lower: &str) -> Vec<&'a KeywordRule> {
    rules.iter().filter(|r| lower.contains(r.phrase)).collect()
}
