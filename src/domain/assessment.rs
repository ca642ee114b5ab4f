//! Risk assessment result types.

use serde::{Deserialize, Serialize};

/// Scores strictly above this are high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 70.0;

/// Scores strictly above this (and not high) are medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;

/// Risk level classification for heart disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Score at most 40
    Low,
    /// Score above 40, at most 70
    Medium,
    /// Score above 70
    High,
}

impl RiskLevel {
    /// Classify a score in [0, 100].
    ///
    /// `(40, 70]` is medium: exactly 40 is low and exactly 70 is medium.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            Self::High
        } else if score > MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - Continue preventive care",
            Self::Medium => "Moderate risk - Further evaluation suggested",
            Self::High => "High risk - Consult a cardiologist",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Binary classifier verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Disease,
    NoDisease,
}

impl Label {
    /// Map a classifier class index (1 = disease present).
    #[must_use]
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            Self::Disease
        } else {
            Self::NoDisease
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disease => write!(f, "Heart Disease"),
            Self::NoDisease => write!(f, "No Heart Disease"),
        }
    }
}

/// Which strategy produced an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    ExternalClassifier,
    HeuristicRules,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExternalClassifier => write!(f, "external-classifier"),
            Self::HeuristicRules => write!(f, "heuristic-rules"),
        }
    }
}

/// Outcome of one assessment. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    /// Unique identifier
    id: String,

    /// Risk score in [0, 100]
    score: f64,

    level: RiskLevel,

    /// Classifier verdict (classifier path only)
    label: Option<Label>,

    /// Positive-class probability in [0, 1] (classifier path only)
    confidence: Option<f64>,

    model: ModelKind,

    created_at: chrono::DateTime<chrono::Utc>,
}

impl RiskAssessment {
    /// Build an assessment from a classifier prediction.
    ///
    /// `probability` is the positive-class probability; the score is its
    /// percentage.
    #[must_use]
    pub fn from_classifier(label: Label, probability: f64) -> Self {
        let score = probability * 100.0;
        Self {
            id: uuid_v4(),
            score,
            level: RiskLevel::from_score(score),
            label: Some(label),
            confidence: Some(probability),
            model: ModelKind::ExternalClassifier,
            created_at: chrono::Utc::now(),
        }
    }

    /// Build an assessment from a heuristic score. No label or confidence.
    #[must_use]
    pub fn from_heuristic(score: f64) -> Self {
        Self {
            id: uuid_v4(),
            score,
            level: RiskLevel::from_score(score),
            label: None,
            confidence: None,
            model: ModelKind::HeuristicRules,
            created_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> RiskLevel {
        self.level
    }

    #[must_use]
    pub fn label(&self) -> Option<Label> {
        self.label
    }

    #[must_use]
    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    #[must_use]
    pub fn model(&self) -> ModelKind {
        self.model
    }

    #[must_use]
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
}

/// Generate a random UUID v4 string using a CSPRNG.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let mut bytes: [u8; 16] = rng.gen();
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40.000_001), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70.000_001), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::High);
    }

    #[test]
    fn test_classifier_assessment() {
        let a = RiskAssessment::from_classifier(Label::Disease, 0.82);
        assert!((a.score() - 82.0).abs() < 1e-9);
        assert_eq!(a.level(), RiskLevel::High);
        assert_eq!(a.label(), Some(Label::Disease));
        assert_eq!(a.confidence(), Some(0.82));
        assert_eq!(a.model(), ModelKind::ExternalClassifier);
    }

    #[test]
    fn test_heuristic_assessment_has_no_label() {
        let a = RiskAssessment::from_heuristic(67.0);
        assert_eq!(a.level(), RiskLevel::Medium);
        assert!(a.label().is_none());
        assert!(a.confidence().is_none());
        assert_eq!(a.model(), ModelKind::HeuristicRules);
    }

    #[test]
    fn test_serialized_level_matches_score() {
        let a = RiskAssessment::from_heuristic(67.0);
        let json = serde_json::to_value(&a).expect("serialize");
        assert_eq!(json["score"], 67.0);
        assert_eq!(json["level"], "medium");
        assert_eq!(json["model"], "heuristic_rules");
        assert!(json["label"].is_null());
    }

    #[test]
    fn test_label_from_class() {
        assert_eq!(Label::from_class(1), Label::Disease);
        assert_eq!(Label::from_class(0), Label::NoDisease);
        assert_eq!(Label::Disease.to_string(), "Heart Disease");
    }

    #[test]
    fn test_uuid_generation() {
        let id1 = uuid_v4();
        let id2 = uuid_v4();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
        assert_eq!(&id1[14..15], "4");
    }
}
