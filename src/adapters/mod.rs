//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifact`: JSON scaler and k-NN classifier artifacts with manifest checks
//! - `classifier`: the external-classifier risk strategy
//! - `heuristic`: the rule-based risk strategy
//! - `sanitize`: clinical-value filtering for logs

pub mod artifact;
pub mod classifier;
pub mod heuristic;
pub mod sanitize;

pub use classifier::{ArtifactClassifierModel, ExternalClassifierModel};
pub use heuristic::{HeuristicConfig, HeuristicRuleModel};
