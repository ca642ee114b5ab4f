//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O. Records validate themselves; assessments are
//! immutable once built.

mod assessment;
mod guidance;
mod patient;

pub use assessment::{
    Label, ModelKind, RiskAssessment, RiskLevel, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD,
};
pub use guidance::{recommendation, top_features, ImportanceFeature, FEATURE_IMPORTANCE};
pub use patient::{
    ChestPainType, PatientRecord, RestingEcg, Sex, StSlope, Thalassemia, FEATURE_COUNT,
    FEATURE_NAMES, PLACEHOLDER_SLOT,
};

#[cfg(test)]
pub(crate) use patient::fixtures;
