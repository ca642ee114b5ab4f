//! Risk model port: the strategy seam between the service and an estimator.

use crate::domain::{ModelKind, PatientRecord, RiskAssessment};

/// A strategy that turns a validated record into an assessment.
///
/// Implementations:
/// - `ExternalClassifierModel`: scaler + trained classifier
/// - `HeuristicRuleModel`: fixed additive rules
///
/// The strategy is chosen by configuration; one is never substituted for
/// the other at runtime.
pub trait RiskModel: Send + Sync {
    /// Assess one patient record.
    ///
    /// # Errors
    /// Returns `CardioRiskError::InvalidRecord` for out-of-domain fields and
    /// `CardioRiskError::ModelUnavailable` if the model cannot produce a score.
    fn assess(&self, record: &PatientRecord) -> crate::Result<RiskAssessment>;

    /// Which strategy this is.
    fn kind(&self) -> ModelKind;
}

impl<M: RiskModel + ?Sized> RiskModel for Box<M> {
    fn assess(&self, record: &PatientRecord) -> crate::Result<RiskAssessment> {
        (**self).assess(record)
    }

    fn kind(&self) -> ModelKind {
        (**self).kind()
    }
}
