//! Simulated "AI" status assessment.
//!
//! Everything here is keyword matching over the encounter text. Results are
//! canned and deterministic per input; there is no model behind them.

pub mod keywords;
pub mod metrics;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{HealthStatus, RiskLevel};

pub use metrics::{generate_health_metrics, HealthMetrics, Vitals};

/// Confidence reported when there is nothing to assess.
pub const FALLBACK_CONFIDENCE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusAssessment {
    pub status: HealthStatus,
    pub risk_level: RiskLevel,
    pub confidence: f32,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
}

impl StatusAssessment {
    /// Returned for empty input.
    pub fn fallback() -> Self {
        Self {
            status: HealthStatus::Good,
            risk_level: RiskLevel::Low,
            confidence: FALLBACK_CONFIDENCE,
            summary: "Insufficient information for an assessment.".into(),
            key_findings: vec![],
            alerts: vec![],
            recommendations: vec!["Record consultation notes to enable an assessment.".into()],
        }
    }
}

/// Phrase counts behind an assessment; shared with the metrics generator.
#[derive(Debug, Default)]
pub(crate) struct KeywordHits {
    pub critical: Vec<&'static keywords::KeywordRule>,
    pub moderate: Vec<&'static keywords::KeywordRule>,
    pub positive: Vec<&'static str>,
}

pub(crate) fn scan(content: &str) -> KeywordHits {
    let lower = content.to_lowercase();
    KeywordHits {
        critical: keywords::matching(keywords::CRITICAL, &lower),
        moderate: keywords::matching(keywords::MODERATE, &lower),
        positive: keywords::POSITIVE
            .iter()
            .copied()
            .filter(|p| lower.contains(p))
            .collect(),
    }
}

/// Assess free-text encounter content.
pub fn assess_status(content: &str) -> StatusAssessment {
    if content.trim().is_empty() {
        return StatusAssessment::fallback();
    }

    let hits = scan(content);

    let alerts: Vec<String> = hits.critical.iter().map(|r| r.phrase.to_string()).collect();
    let mut key_findings: Vec<String> = hits.moderate.iter().map(|r| r.phrase.to_string()).collect();
    key_findings.extend(hits.positive.iter().map(|p| p.to_string()));

    let mut recommendations: Vec<String> = Vec::new();
    for r in hits.critical.iter().chain(&hits.moderate) {
        if !recommendations.iter().any(|existing| existing == r.recommendation) {
            recommendations.push(r.recommendation.to_string());
        }
    }

    let (status, risk_level, confidence, summary) = if !hits.critical.is_empty() {
        recommendations.insert(0, "Urgent clinical review recommended.".into());
        (
            HealthStatus::Concerning,
            RiskLevel::High,
            0.85,
            format!(
                "High-risk presentation: {} reported.",
                alerts.join(", ")
            ),
        )
    } else if !hits.moderate.is_empty() {
        (
            HealthStatus::Fair,
            RiskLevel::Moderate,
            0.75,
            format!(
                "Moderate concerns noted: {}.",
                hits.moderate.iter().map(|r| r.phrase).collect::<Vec<_>>().join(", ")
            ),
        )
    } else if !hits.positive.is_empty() {
        recommendations.push("Continue current management.".into());
        (
            HealthStatus::Excellent,
            RiskLevel::Low,
            0.8,
            "Patient reports improvement with no concerning features.".into(),
        )
    } else {
        recommendations.push("Routine follow-up as scheduled.".into());
        (
            HealthStatus::Good,
            RiskLevel::Low,
            0.7,
            "No concerning features identified.".into(),
        )
    };

    StatusAssessment {
        status,
        risk_level,
        confidence,
        summary,
        key_findings,
        alerts,
        recommendations,
    }
}

/// Assessment behind a fixed artificial delay standing in for a model call.
/// Not cancellable; no timeout or retry.
pub async fn assess_with_delay(content: String, delay: Duration) -> StatusAssessment {
    tokio::time::sleep(delay).await;
    let assessment = assess_status(&content);
    tracing::debug!(
        risk = assessment.risk_level.as_str(),
        alerts = assessment.alerts.len(),
        "Simulated assessment complete"
    );
    assessment
}
