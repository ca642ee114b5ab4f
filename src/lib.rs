//! # cardiorisk
//!
//! Heart-disease risk estimation from clinical measurements.
//!
//! A [`PatientRecord`] is scored by a [`RiskModel`](ports::RiskModel) chosen
//! by configuration:
//! - an external trained classifier (feature scaler + k-nearest-neighbours
//!   artifacts), or
//! - a heuristic rule set with optional bounded jitter.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientRecord, RiskAssessment, RiskLevel)
//! - `ports`: Trait definitions for the model seams
//! - `adapters`: Concrete implementations (JSON artifacts, heuristic rules, log sanitizing)
//! - `application`: Assessment service and aggregate metrics
//! - `config`: Environment-driven estimator configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use domain::{Label, ModelKind, PatientRecord, RiskAssessment, RiskLevel};

/// Result type for cardiorisk operations
pub type Result<T> = std::result::Result<T, CardioRiskError>;

/// Main error type for cardiorisk
#[derive(Debug, thiserror::Error)]
pub enum CardioRiskError {
    #[error("Invalid patient record: {}", .0.join("; "))]
    InvalidRecord(Vec<String>),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ports::ClassifierError> for CardioRiskError {
    fn from(e: ports::ClassifierError) -> Self {
        Self::ModelUnavailable(e.to_string())
    }
}
