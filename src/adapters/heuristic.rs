//! Heuristic rule strategy.
//!
//! Additive points over a base of 30, an optional importance-weighted term,
//! and an optional uniform jitter in `[-5, +10]`, clamped to `[5, 95]`.
//! Never produces a label or confidence.
//!
//! # Mutex Behavior
//!
//! The jitter RNG sits behind a `Mutex`. A poisoned mutex fails the
//! assessment with `ModelUnavailable` instead of scoring without jitter.

use std::sync::Mutex;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::{
    ImportanceFeature, ModelKind, PatientRecord, RiskAssessment, FEATURE_IMPORTANCE,
};
use crate::ports::RiskModel;
use crate::CardioRiskError;

const BASE_SCORE: f64 = 30.0;
const JITTER_MIN: f64 = -5.0;
const JITTER_MAX: f64 = 10.0;
const SCORE_MIN: f64 = 5.0;
const SCORE_MAX: f64 = 95.0;
const IMPORTANCE_SCALE: f64 = 0.1;

/// Configuration for the heuristic strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicConfig {
    /// Add the importance-weighted term (bounded to [0, 10])
    pub importance_term: bool,

    /// Add uniform jitter in [-5, +10]
    pub jitter: bool,

    /// Fixed RNG seed for reproducible jitter; OS entropy when `None`
    pub seed: Option<u64>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            importance_term: true,
            jitter: true,
            seed: None,
        }
    }
}

impl HeuristicConfig {
    /// Rules only: no importance term, no jitter.
    #[must_use]
    pub fn deterministic() -> Self {
        Self {
            importance_term: false,
            jitter: false,
            seed: None,
        }
    }
}

/// Risk model evaluating fixed clinical rules.
pub struct HeuristicRuleModel {
    config: HeuristicConfig,
    rng: Mutex<ChaCha20Rng>,
}

impl HeuristicRuleModel {
    #[must_use]
    pub fn new(config: HeuristicConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        tracing::info!(
            "Heuristic rules enabled (importance_term={}, jitter={}, seeded={})",
            config.importance_term,
            config.jitter,
            config.seed.is_some()
        );
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Base score plus the age, cholesterol and blood-pressure points.
    #[must_use]
    pub fn rule_points(record: &PatientRecord) -> f64 {
        let age_points = if record.age > 55 {
            15.0
        } else if record.age > 45 {
            8.0
        } else {
            0.0
        };
        let chol_points = if record.cholesterol > 240 { 12.0 } else { 0.0 };
        let bp_points = if record.resting_bp > 140 { 10.0 } else { 0.0 };

        BASE_SCORE + age_points + chol_points + bp_points
    }

    /// `0.1 * Σ(value * weight * 100)` with each value min-max normalised
    /// over its field domain, so the term lies in [0, 10].
    ///
    /// This departs from weighting raw values: raw cholesterol alone would
    /// add over 100 points and pin every score to the 95 ceiling.
    #[must_use]
    pub fn importance_points(record: &PatientRecord) -> f64 {
        let weighted: f64 = FEATURE_IMPORTANCE
            .iter()
            .map(|(feature, weight)| normalized_value(record, *feature) * weight * 100.0)
            .sum();
        IMPORTANCE_SCALE * weighted
    }

    /// Score without jitter and before clamping.
    #[must_use]
    pub fn deterministic_score(&self, record: &PatientRecord) -> f64 {
        let mut score = Self::rule_points(record);
        if self.config.importance_term {
            score += Self::importance_points(record);
        }
        score
    }

    fn jitter(&self) -> crate::Result<f64> {
        if !self.config.jitter {
            return Ok(0.0);
        }
        let mut rng = self.rng.lock().map_err(|_| {
            CardioRiskError::ModelUnavailable("Heuristic RNG lock poisoned".to_string())
        })?;
        Ok(rng.gen_range(JITTER_MIN..=JITTER_MAX))
    }
}

impl Default for HeuristicRuleModel {
    fn default() -> Self {
        Self::new(HeuristicConfig::default())
    }
}

impl RiskModel for HeuristicRuleModel {
    fn assess(&self, record: &PatientRecord) -> crate::Result<RiskAssessment> {
        record.validate().map_err(CardioRiskError::InvalidRecord)?;

        let base = self.deterministic_score(record);
        let jitter = self.jitter()?;
        let score = (base + jitter).clamp(SCORE_MIN, SCORE_MAX);

        tracing::debug!(
            "Heuristic score: deterministic={:.2}, jitter={:.2}, final={:.2}",
            base,
            jitter,
            score
        );

        Ok(RiskAssessment::from_heuristic(score))
    }

    fn kind(&self) -> ModelKind {
        ModelKind::HeuristicRules
    }
}

fn normalized_value(record: &PatientRecord, feature: ImportanceFeature) -> f64 {
    fn span(value: f64, (lo, hi): (u32, u32)) -> f64 {
        (value - f64::from(lo)) / f64::from(hi - lo)
    }

    let v = match feature {
        ImportanceFeature::Thalach => span(
            f64::from(record.max_heart_rate),
            PatientRecord::MAX_HEART_RATE_RANGE,
        ),
        ImportanceFeature::Cp => record.chest_pain_type.code() / 3.0,
        ImportanceFeature::Oldpeak => {
            let (lo, hi) = PatientRecord::ST_DEPRESSION_RANGE;
            (record.st_depression - lo) / (hi - lo)
        }
        ImportanceFeature::Ca => {
            f64::from(record.major_vessels) / f64::from(PatientRecord::MAJOR_VESSELS_MAX)
        }
        ImportanceFeature::Thal => (record.thalassemia.code() - 1.0) / 2.0,
        ImportanceFeature::Age => span(f64::from(record.age), PatientRecord::AGE_RANGE),
        ImportanceFeature::Chol => span(
            f64::from(record.cholesterol),
            PatientRecord::CHOLESTEROL_RANGE,
        ),
        ImportanceFeature::Trestbps => {
            span(f64::from(record.resting_bp), PatientRecord::RESTING_BP_RANGE)
        }
        ImportanceFeature::Exang => {
            if record.exercise_angina {
                1.0
            } else {
                0.0
            }
        }
    };
    v.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{healthy_record, high_risk_record};
    use crate::domain::RiskLevel;

    #[test]
    fn test_rule_points_end_to_end_record() {
        // 30 base + 15 age + 12 cholesterol + 10 blood pressure
        assert_eq!(HeuristicRuleModel::rule_points(&high_risk_record()), 67.0);
    }

    #[test]
    fn test_deterministic_model_scores_rules_only() {
        let model = HeuristicRuleModel::new(HeuristicConfig::deterministic());
        let a = model.assess(&high_risk_record()).expect("assess");
        assert_eq!(a.score(), 67.0);
        assert_eq!(a.level(), RiskLevel::Medium);
        assert!(a.label().is_none());
        assert!(a.confidence().is_none());
    }

    #[test]
    fn test_age_bands() {
        let at = |age| {
            HeuristicRuleModel::rule_points(&PatientRecord {
                age,
                ..healthy_record()
            })
        };
        assert_eq!(at(45), 30.0);
        assert_eq!(at(46), 38.0);
        assert_eq!(at(55), 38.0);
        assert_eq!(at(56), 45.0);
    }

    #[test]
    fn test_threshold_rules_are_strict() {
        let at_limits = PatientRecord {
            cholesterol: 240,
            resting_bp: 140,
            ..healthy_record()
        };
        assert_eq!(HeuristicRuleModel::rule_points(&at_limits), 30.0);

        let over = PatientRecord {
            cholesterol: 241,
            resting_bp: 141,
            ..healthy_record()
        };
        assert_eq!(HeuristicRuleModel::rule_points(&over), 52.0);
    }

    #[test]
    fn test_importance_points() {
        let high = HeuristicRuleModel::importance_points(&high_risk_record());
        assert!((high - 5.589_894).abs() < 1e-5, "got {high}");

        let low = HeuristicRuleModel::importance_points(&healthy_record());
        assert!((low - 2.781_598).abs() < 1e-5, "got {low}");
    }

    #[test]
    fn test_importance_term_leaves_headroom_below_ceiling() {
        let model = HeuristicRuleModel::new(HeuristicConfig {
            jitter: false,
            ..HeuristicConfig::default()
        });
        let score = model.deterministic_score(&high_risk_record());
        assert!((score - (67.0 + 5.589_894)).abs() < 1e-5, "got {score}");
        assert!(score < SCORE_MAX);
    }

    #[test]
    fn test_importance_points_bounded() {
        let max = PatientRecord {
            age: 100,
            chest_pain_type: crate::domain::ChestPainType::Asymptomatic,
            resting_bp: 200,
            cholesterol: 600,
            max_heart_rate: 220,
            exercise_angina: true,
            st_depression: 6.0,
            major_vessels: 3,
            thalassemia: crate::domain::Thalassemia::ReversibleDefect,
            ..healthy_record()
        };
        let points = HeuristicRuleModel::importance_points(&max);
        assert!((points - 10.0).abs() < 1e-9, "got {points}");
    }

    #[test]
    fn test_age_monotonic_deterministic_component() {
        let model = HeuristicRuleModel::new(HeuristicConfig {
            jitter: false,
            ..HeuristicConfig::default()
        });
        let mut prev = f64::MIN;
        for age in 44..=56 {
            let s = model.deterministic_score(&PatientRecord {
                age,
                ..healthy_record()
            });
            assert!(s >= prev, "score dropped at age {age}");
            prev = s;
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible_and_bounded() {
        let config = HeuristicConfig {
            importance_term: false,
            jitter: true,
            seed: Some(42),
        };
        let a = HeuristicRuleModel::new(config.clone());
        let b = HeuristicRuleModel::new(config);

        for _ in 0..50 {
            let sa = a.assess(&healthy_record()).expect("assess").score();
            let sb = b.assess(&healthy_record()).expect("assess").score();
            assert_eq!(sa, sb);
            // base 30, jitter in [-5, 10]
            assert!((25.0..=40.0).contains(&sa), "got {sa}");
        }
    }

    #[test]
    fn test_score_clamped() {
        let model = HeuristicRuleModel::new(HeuristicConfig {
            seed: Some(7),
            ..HeuristicConfig::default()
        });
        for _ in 0..100 {
            let s = model.assess(&high_risk_record()).expect("assess").score();
            assert!((SCORE_MIN..=SCORE_MAX).contains(&s));
        }
    }

    #[test]
    fn test_invalid_record_rejected() {
        let model = HeuristicRuleModel::default();
        let err = model
            .assess(&PatientRecord {
                resting_bp: 250,
                ..healthy_record()
            })
            .expect_err("must fail");
        assert!(matches!(err, CardioRiskError::InvalidRecord(_)));
        assert_eq!(model.kind(), ModelKind::HeuristicRules);
    }
}
