//! Ports layer: Trait definitions for external operations.
//!
//! These traits define the boundaries between the application and the
//! trained model artifacts, and between the service and a risk strategy.

mod classifier;
mod risk_model;

pub use classifier::{Classifier, ClassifierError, FeatureScaler};
pub use risk_model::RiskModel;
