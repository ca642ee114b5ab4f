//! External classifier strategy: scaler + trained classifier.
//!
//! Fails closed: any load, transform, or predict failure becomes
//! `CardioRiskError::ModelUnavailable` and no score is produced.

use std::path::Path;

use crate::adapters::artifact::{KnnClassifier, ModelArtifacts, StandardScaler};
use crate::domain::{
    Label, ModelKind, PatientRecord, RiskAssessment, FEATURE_COUNT, FEATURE_NAMES,
};
use crate::ports::{Classifier, ClassifierError, FeatureScaler, RiskModel};
use crate::CardioRiskError;

/// Classifier strategy loaded from JSON artifacts on disk.
pub type ArtifactClassifierModel = ExternalClassifierModel<StandardScaler, KnnClassifier>;

/// Risk model backed by an externally trained classifier.
pub struct ExternalClassifierModel<S, C>
where
    S: FeatureScaler,
    C: Classifier,
{
    scaler: S,
    classifier: C,
}

impl<S, C> ExternalClassifierModel<S, C>
where
    S: FeatureScaler,
    C: Classifier,
{
    /// Wrap an already constructed scaler and classifier.
    pub fn new(scaler: S, classifier: C) -> Self {
        Self { scaler, classifier }
    }

    fn predict(&self, record: &PatientRecord) -> Result<RiskAssessment, ClassifierError> {
        let raw = record.to_feature_vector();

        tracing::debug!("Scaling {} features...", raw.len());
        let scaled = self.scaler.transform(&raw)?;

        tracing::debug!("Running classifier...");
        let class = self.classifier.predict(&scaled)?;
        let [_, p1] = self.classifier.predict_proba(&scaled)?;

        if !p1.is_finite() || !(0.0..=1.0).contains(&p1) {
            return Err(ClassifierError::Prediction(format!(
                "Classifier returned invalid probability {p1}"
            )));
        }
        if class > 1 {
            return Err(ClassifierError::Prediction(format!(
                "Classifier returned unknown class {class}"
            )));
        }

        Ok(RiskAssessment::from_classifier(Label::from_class(class), p1))
    }
}

impl ExternalClassifierModel<StandardScaler, KnnClassifier> {
    /// Load the JSON scaler and k-NN artifacts from `model_dir`.
    ///
    /// # Errors
    /// Returns `CardioRiskError::ModelUnavailable` if the artifacts are
    /// missing, malformed, fail the manifest check, or were not trained on
    /// the patient feature vector.
    pub fn load(model_dir: &Path, require_manifest: bool) -> crate::Result<Self> {
        let artifacts = ModelArtifacts::load(model_dir, require_manifest).map_err(|e| {
            tracing::error!("Failed to load classifier artifacts: {e}");
            CardioRiskError::from(e)
        })?;
        if artifacts.scaler.n_features() != FEATURE_COUNT {
            return Err(ClassifierError::FeatureCount {
                got: artifacts.scaler.n_features(),
                expected: FEATURE_COUNT,
            }
            .into());
        }
        for i in artifacts.scaler.constant_features() {
            tracing::debug!("Feature '{}' has zero variance in the scaler", FEATURE_NAMES[i]);
        }
        Ok(Self::new(artifacts.scaler, artifacts.classifier))
    }
}

impl<S, C> RiskModel for ExternalClassifierModel<S, C>
where
    S: FeatureScaler,
    C: Classifier,
{
    fn assess(&self, record: &PatientRecord) -> crate::Result<RiskAssessment> {
        record.validate().map_err(CardioRiskError::InvalidRecord)?;

        self.predict(record).map_err(|e| {
            tracing::error!("Classifier prediction failed: {e}");
            CardioRiskError::from(e)
        })
    }

    fn kind(&self) -> ModelKind {
        ModelKind::ExternalClassifier
    }
}
