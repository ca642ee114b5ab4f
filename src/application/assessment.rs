//! Assessment service: validates records, runs the configured risk model,
//! and counts completed assessments.

use std::sync::Arc;

use crate::application::Metrics;
use crate::domain::{ModelKind, PatientRecord, RiskAssessment};
use crate::ports::RiskModel;
use crate::CardioRiskError;

/// Service for scoring patient records.
pub struct AssessmentService<M>
where
    M: RiskModel,
{
    model: M,
    metrics: Arc<Metrics>,
}

impl<M> AssessmentService<M>
where
    M: RiskModel,
{
    /// Create a new assessment service with its own counters.
    pub fn new(model: M) -> Self {
        Self::with_metrics(model, Arc::new(Metrics::new()))
    }

    /// Create a service that records into shared counters.
    pub fn with_metrics(model: M, metrics: Arc<Metrics>) -> Self {
        tracing::info!("Assessment service ready (model={})", model.kind());
        Self { model, metrics }
    }

    /// Assess one patient record.
    ///
    /// Invalid records are rejected with every offending field listed and are
    /// not counted. Model failures are never replaced by another strategy.
    ///
    /// # Errors
    /// Returns `InvalidRecord` or `ModelUnavailable`.
    pub fn assess(&self, record: &PatientRecord) -> crate::Result<RiskAssessment> {
        tracing::debug!("Validating patient record...");
        if let Err(errors) = record.validate() {
            tracing::warn!("Rejected patient record ({} invalid fields)", errors.len());
            return Err(CardioRiskError::InvalidRecord(errors));
        }

        tracing::debug!("Running {} model...", self.model.kind());
        let assessment = self.model.assess(record)?;
        self.metrics.record(&assessment);

        match assessment.confidence() {
            Some(confidence) => tracing::info!(
                "Assessment complete: id={}, score={:.1}, level={}, confidence={:.2}%",
                assessment.id(),
                assessment.score(),
                assessment.level(),
                confidence * 100.0
            ),
            None => tracing::info!(
                "Assessment complete: id={}, score={:.1}, level={} (heuristic)",
                assessment.id(),
                assessment.score(),
                assessment.level()
            ),
        }

        Ok(assessment)
    }

    #[must_use]
    pub fn model_kind(&self) -> ModelKind {
        self.model.kind()
    }

    #[must_use]
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}
