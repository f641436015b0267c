//! Authenticity score report returned by the classification capability.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error("{field} must be a probability in [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Authenticity signals for one piece of content.
///
/// All four probabilities are validated into `[0, 1]` at construction; a
/// report is either complete or not built at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    source_credibility: f64,
    manipulation_risk: f64,
    ai_synthetic_prob: f64,
    trust_index: f64,
    findings: Vec<String>,
    explanation: String,
    metadata: Map<String, Value>,
}

/// Probability fields in display order.
pub type Probabilities = [(&'static str, f64); 4];

impl ScoreReport {
    pub fn new(
        source_credibility: f64,
        manipulation_risk: f64,
        ai_synthetic_prob: f64,
        trust_index: f64,
        findings: Vec<String>,
        explanation: impl Into<String>,
        metadata: Map<String, Value>,
    ) -> Result<Self, ReportError> {
        Ok(Self {
            source_credibility: probability("sourceCredibility", source_credibility)?,
            manipulation_risk: probability("manipulationRisk", manipulation_risk)?,
            ai_synthetic_prob: probability("aiSyntheticProb", ai_synthetic_prob)?,
            trust_index: probability("trustIndex", trust_index)?,
            findings,
            explanation: explanation.into(),
            metadata,
        })
    }

    #[must_use]
    pub const fn source_credibility(&self) -> f64 {
        self.source_credibility
    }

    #[must_use]
    pub const fn manipulation_risk(&self) -> f64 {
        self.manipulation_risk
    }

    #[must_use]
    pub const fn ai_synthetic_prob(&self) -> f64 {
        self.ai_synthetic_prob
    }

    #[must_use]
    pub const fn trust_index(&self) -> f64 {
        self.trust_index
    }

    #[must_use]
    pub fn findings(&self) -> &[String] {
        &self.findings
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Verdict::from_probability(self.ai_synthetic_prob)
    }

    /// Secondary gauges, labelled as shown in the dashboard.
    #[must_use]
    pub fn gauges(&self) -> [(&'static str, u8); 3] {
        [
            ("Trust Index", to_percent(self.trust_index)),
            ("Source Credit", to_percent(self.source_credibility)),
            ("Manip. Risk", to_percent(self.manipulation_risk)),
        ]
    }

    #[must_use]
    pub fn probabilities(&self) -> Probabilities {
        [
            ("sourceCredibility", self.source_credibility),
            ("manipulationRisk", self.manipulation_risk),
            ("aiSyntheticProb", self.ai_synthetic_prob),
            ("trustIndex", self.trust_index),
        ]
    }
}

fn probability(field: &'static str, value: f64) -> Result<f64, ReportError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ReportError::OutOfRange { field, value })
    }
}

/// Convert a validated probability to a whole percentage.
#[must_use]
pub fn to_percent(probability: f64) -> u8 {
    (probability.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Four-band classification of the AI-synthetic probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    RealContent,
    LikelyReal,
    LikelyAiGenerated,
    AiGenerated,
}

impl Verdict {
    /// Bands on the unrounded percentage: `<=25`, `<=50`, `<=75`, above.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        let percent = probability * 100.0;
        if percent <= 25.0 {
            Verdict::RealContent
        } else if percent <= 50.0 {
            Verdict::LikelyReal
        } else if percent <= 75.0 {
            Verdict::LikelyAiGenerated
        } else {
            Verdict::AiGenerated
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::RealContent => "Real Content",
            Verdict::LikelyReal => "Likely Real",
            Verdict::LikelyAiGenerated => "Likely AI-Generated",
            Verdict::AiGenerated => "AI-Generated",
        }
    }

    #[must_use]
    pub const fn detail(self) -> Option<&'static str> {
        match self {
            Verdict::RealContent => Some("(Very Low AI Probability)"),
            _ => None,
        }
    }
}
