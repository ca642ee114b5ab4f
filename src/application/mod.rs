//! Application layer: Use cases and services.
//!
//! This module wires the configured risk model to the assessment use case
//! and keeps aggregate counters.

mod assessment;
mod metrics;

pub use assessment::AssessmentService;
pub use metrics::{Metrics, MetricsSnapshot};

use crate::adapters::{ArtifactClassifierModel, HeuristicRuleModel};
use crate::config::{EstimatorConfig, Strategy};
use crate::ports::RiskModel;

/// Build the risk model selected by `config`.
///
/// # Errors
/// Returns `ModelUnavailable` when the classifier strategy is selected and
/// its artifacts cannot be loaded. The heuristic is not substituted.
pub fn build_risk_model(config: &EstimatorConfig) -> crate::Result<Box<dyn RiskModel>> {
    match config.strategy {
        Strategy::Classifier => {
            tracing::info!("Loading classifier artifacts from {:?}", config.model_path);
            let model = ArtifactClassifierModel::load(&config.model_path, config.require_manifest)?;
            Ok(Box::new(model))
        }
        Strategy::Heuristic => {
            tracing::warn!("Heuristic strategy selected: scores carry no label or confidence");
            Ok(Box::new(HeuristicRuleModel::new(config.heuristic.clone())))
        }
    }
}
