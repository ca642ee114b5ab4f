//! Recommendation tiers and the clinical feature-importance table.

use super::assessment::RiskLevel;

const URGENT_REFERRAL: &[&str] = &[
    "Consult a cardiologist",
    "Consider stress test",
    "Monitor blood pressure",
    "Review lifestyle factors",
];

const PREVENTIVE_FOLLOW_UP: &[&str] = &[
    "Further evaluation suggested",
    "Schedule a follow-up with your physician",
    "Recheck cholesterol and blood pressure",
    "Review diet and physical activity",
];

const MAINTENANCE: &[&str] = &[
    "Regular exercise",
    "Balanced diet",
    "Annual check-ups",
    "Blood pressure monitoring",
];

/// Ordered guidance for a risk level.
#[must_use]
pub fn recommendation(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::High => URGENT_REFERRAL,
        RiskLevel::Medium => PREVENTIVE_FOLLOW_UP,
        RiskLevel::Low => MAINTENANCE,
    }
}

/// Clinical features carrying a fixed importance weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportanceFeature {
    /// Maximum heart rate
    Thalach,
    /// Chest pain type
    Cp,
    /// ST depression
    Oldpeak,
    /// Major vessels
    Ca,
    /// Thalassemia
    Thal,
    Age,
    /// Cholesterol
    Chol,
    /// Resting blood pressure
    Trestbps,
    /// Exercise induced angina
    Exang,
}

impl ImportanceFeature {
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Thalach => "thalach",
            Self::Cp => "cp",
            Self::Oldpeak => "oldpeak",
            Self::Ca => "ca",
            Self::Thal => "thal",
            Self::Age => "age",
            Self::Chol => "chol",
            Self::Trestbps => "trestbps",
            Self::Exang => "exang",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Thalach => "Max Heart Rate",
            Self::Cp => "Chest Pain",
            Self::Oldpeak => "ST Depression",
            Self::Ca => "Major Vessels",
            Self::Thal => "Thalassemia",
            Self::Age => "Age",
            Self::Chol => "Cholesterol",
            Self::Trestbps => "Resting Blood Pressure",
            Self::Exang => "Exercise Angina",
        }
    }
}

/// Importance weights shared by heuristic scoring and display. Sums to 1.0.
pub const FEATURE_IMPORTANCE: [(ImportanceFeature, f64); 9] = [
    (ImportanceFeature::Thalach, 0.18),
    (ImportanceFeature::Cp, 0.15),
    (ImportanceFeature::Oldpeak, 0.14),
    (ImportanceFeature::Ca, 0.12),
    (ImportanceFeature::Thal, 0.11),
    (ImportanceFeature::Age, 0.09),
    (ImportanceFeature::Chol, 0.08),
    (ImportanceFeature::Trestbps, 0.07),
    (ImportanceFeature::Exang, 0.06),
];

/// The `n` most important features, heaviest first.
#[must_use]
pub fn top_features(n: usize) -> Vec<(ImportanceFeature, f64)> {
    let mut ranked = FEATURE_IMPORTANCE.to_vec();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);
    ranked
}
