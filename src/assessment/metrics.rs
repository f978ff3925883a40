use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::scan;

static BLOOD_PRESSURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:bp|blood\s+pressure)\s*(?:of|:|=)?\s*(\d{2,3})\s*/\s*(\d{2,3})")
        .expect("Invalid blood pressure regex")
});
static HEART_RATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:hr|heart\s+rate|pulse)\s*(?:of|:|=)?\s*(\d{2,3})")
        .expect("Invalid heart rate regex")
});
static TEMPERATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\btemp(?:erature)?\s*(?:of|:|=)?\s*(\d+(?:\.\d+)?)")
        .expect("Invalid temperature regex")
});
static SPO2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:spo2|sats|oxygen\s+saturation)\s*(?:of|:|=)?\s*(\d{2,3})\s*%?")
        .expect("Invalid SpO2 regex")
});

/// Vital signs mentioned in the note. Each is `None` when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub systolic: Option<u16>,
    pub diastolic: Option<u16>,
    pub heart_rate: Option<u16>,
    pub temperature_c: Option<f32>,
    pub spo2: Option<u8>,
}

impl Vitals {
    pub fn parse(text: &str) -> Self {
        let mut vitals = Vitals::default();
        if let Some(c) = BLOOD_PRESSURE.captures(text) {
            vitals.systolic = c[1].parse().ok();
            vitals.diastolic = c[2].parse().ok();
        }
        if let Some(c) = HEART_RATE.captures(text) {
            vitals.heart_rate = c[1].parse().ok();
        }
        if let Some(c) = TEMPERATURE.captures(text) {
            // Readings outside this range are Fahrenheit or typos.
            vitals.temperature_c = c[1]
                .parse()
                .ok()
                .filter(|t: &f32| (30.0..=45.0).contains(t));
        }
        if let Some(c) = SPO2.captures(text) {
            vitals.spo2 = c[1].parse().ok().filter(|v| *v <= 100);
        }
        vitals
    }

    /// Readings outside the usual adult range, as display strings.
    pub fn abnormal(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let (Some(sys), Some(dia)) = (self.systolic, self.diastolic) {
            if sys >= 140 || dia >= 90 {
                out.push(format!("Elevated blood pressure {sys}/{dia}"));
            } else if sys < 90 {
                out.push(format!("Low blood pressure {sys}/{dia}"));
            }
        }
        if let Some(hr) = self.heart_rate {
            if hr > 100 {
                out.push(format!("Tachycardia {hr} bpm"));
            } else if hr < 50 {
                out.push(format!("Bradycardia {hr} bpm"));
            }
        }
        if let Some(t) = self.temperature_c {
            if t >= 38.0 {
                out.push(format!("Pyrexia {t:.1} °C"));
            }
        }
        if let Some(s) = self.spo2 {
            if s < 92 {
                out.push(format!("Low oxygen saturation {s}%"));
            }
        }
        out
    }
}

/// Canned numeric health metrics for the dashboard widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    /// 0-100, higher is better.
    pub overall_score: u8,
    /// 0-100, higher is riskier.
    pub risk_score: u8,
    /// 0-10.
    pub symptom_burden: u8,
    pub follow_up_days: u32,
    pub vitals: Vitals,
    pub abnormal_vitals: Vec<String>,
}

pub fn generate_health_metrics(content: &str) -> HealthMetrics {
    let hits = scan(content);
    let vitals = Vitals::parse(content);
    let abnormal_vitals = vitals.abnormal();

    let critical = hits.critical.len() as u32;
    let moderate = hits.moderate.len() as u32;
    let positive = hits.positive.len() as u32;

    let base = if critical > 0 {
        75
    } else if moderate > 0 {
        40
    } else {
        10
    };
    let extra_hits = (critical + moderate).saturating_sub(1);
    let risk_score = (base + 5 * extra_hits + 10 * abnormal_vitals.len() as u32).min(100);

    let symptom_burden = (critical * 3 + moderate).min(10);

    let penalty = risk_score / 2 + symptom_burden * 3;
    let overall_score = (100u32.saturating_sub(penalty) + 5 * positive).min(100);

    let follow_up_days = if critical > 0 {
        1
    } else if moderate > 0 || !abnormal_vitals.is_empty() {
        14
    } else {
        90
    };

    HealthMetrics {
        overall_score: overall_score as u8,
        risk_score: risk_score as u8,
        symptom_burden: symptom_burden as u8,
        follow_up_days,
        vitals,
        abnormal_vitals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_vitals() {
        let v = Vitals::parse("BP 150/95, HR 88, Temp 38.4, SpO2 97%");
        assert_eq!(v.systolic, Some(150));
        assert_eq!(v.diastolic, Some(95));
        assert_eq!(v.heart_rate, Some(88));
        assert_eq!(v.temperature_c, Some(38.4));
        assert_eq!(v.spo2, Some(97));
    }

    #[test]
    fn parses_long_form_vitals() {
        let v = Vitals::parse("Blood pressure of 118/76 and pulse: 64");
        assert_eq!(v.systolic, Some(118));
        assert_eq!(v.heart_rate, Some(64));
        assert!(v.abnormal().is_empty());
    }

    #[test]
    fn fahrenheit_temperature_is_not_truncated() {
        assert_eq!(Vitals::parse("temp 101.2").temperature_c, None);
        assert_eq!(Vitals::parse("Temperature: 100").temperature_c, None);
        assert_eq!(Vitals::parse("temp 38.5C").temperature_c, Some(38.5));
    }

    #[test]
    fn missing_vitals_are_none() {
        assert_eq!(Vitals::parse("Feeling well"), Vitals::default());
    }

    #[test]
    fn abnormal_vitals_flagged() {
        let v = Vitals::parse("bp 160/100 hr 110 temp 38.5 sats 89");
        let abnormal = v.abnormal();
        assert_eq!(abnormal.len(), 4);
        assert!(abnormal[0].starts_with("Elevated blood pressure"));
    }

    #[test]
    fn quiet_note_scores_well() {
        let m = generate_health_metrics("Routine repeat script.");
        assert_eq!(m.risk_score, 10);
        assert_eq!(m.symptom_burden, 0);
        assert_eq!(m.overall_score, 95);
        assert_eq!(m.follow_up_days, 90);
    }

    #[test]
    fn critical_note_scores_poorly() {
        let m = generate_health_metrics("chest pain and shortness of breath, BP 170/105");
        assert_eq!(m.risk_score, 90);
        assert_eq!(m.symptom_burden, 6);
        assert_eq!(m.follow_up_days, 1);
        assert!(m.overall_score < 50);
    }

    #[test]
    fn metrics_are_deterministic() {
        let text = "fever, cough, temp 38.9";
        assert_eq!(generate_health_metrics(text), generate_health_metrics(text));
    }
}
