//! Classifier port: Traits for the externally trained model artifacts.
//!
//! The estimator treats the scaler and classifier as opaque collaborators.
//! The artifact adapter is one implementation; tests inject stubs.

/// Errors raised by a scaler or classifier.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifierError {
    #[error("Artifact unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Feature count mismatch: got {got}, expected {expected}")]
    FeatureCount { got: usize, expected: usize },

    #[error("Prediction failed: {0}")]
    Prediction(String),
}

/// Feature scaling fitted at training time.
pub trait FeatureScaler: Send + Sync {
    /// Normalize a raw feature vector.
    ///
    /// # Errors
    /// Returns `ClassifierError::FeatureCount` if the vector has the wrong length.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ClassifierError>;
}

/// Binary classifier over scaled feature vectors.
pub trait Classifier: Send + Sync {
    /// Predicted class (0 = no disease, 1 = disease).
    ///
    /// # Errors
    /// Returns error if the model cannot evaluate the vector.
    fn predict(&self, scaled: &[f64]) -> Result<u8, ClassifierError>;

    /// Class probabilities `[p0, p1]`.
    ///
    /// # Errors
    /// Returns error if the model cannot evaluate the vector.
    fn predict_proba(&self, scaled: &[f64]) -> Result<[f64; 2], ClassifierError>;
}
