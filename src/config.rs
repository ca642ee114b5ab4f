//! Estimator configuration.
//!
//! Loaded from environment variables:
//! - `CARDIORISK_MODEL_STRATEGY`: `classifier` (default) or `heuristic`
//! - `CARDIORISK_MODEL_PATH`: artifact directory (default `models`)
//! - `CARDIORISK_REQUIRE_MANIFEST`: refuse artifacts without `manifest.json`
//! - `CARDIORISK_HEURISTIC_IMPORTANCE`: add the importance-weighted term (default on)
//! - `CARDIORISK_HEURISTIC_JITTER`: add random jitter (default on)
//! - `CARDIORISK_HEURISTIC_SEED`: fixed jitter seed
//!
//! Malformed values are errors rather than silently ignored: they change what
//! an assessment means.

use std::path::PathBuf;

use crate::adapters::HeuristicConfig;
use crate::CardioRiskError;

const STRATEGY_ENV: &str = "CARDIORISK_MODEL_STRATEGY";
const MODEL_PATH_ENV: &str = "CARDIORISK_MODEL_PATH";
const REQUIRE_MANIFEST_ENV: &str = "CARDIORISK_REQUIRE_MANIFEST";
const IMPORTANCE_ENV: &str = "CARDIORISK_HEURISTIC_IMPORTANCE";
const JITTER_ENV: &str = "CARDIORISK_HEURISTIC_JITTER";
const SEED_ENV: &str = "CARDIORISK_HEURISTIC_SEED";

const DEFAULT_MODEL_PATH: &str = "models";

/// Which risk strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Trained classifier artifacts
    Classifier,
    /// Fixed rule set (degraded mode, no label or confidence)
    Heuristic,
}

impl std::str::FromStr for Strategy {
    type Err = CardioRiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classifier" => Ok(Self::Classifier),
            "heuristic" => Ok(Self::Heuristic),
            other => Err(CardioRiskError::Config(format!(
                "{STRATEGY_ENV} must be 'classifier' or 'heuristic', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatorConfig {
    pub strategy: Strategy,

    /// Directory holding the classifier artifacts
    pub model_path: PathBuf,

    /// Refuse artifacts that are not bound by a manifest
    pub require_manifest: bool,

    pub heuristic: HeuristicConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Classifier,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            require_manifest: false,
            heuristic: HeuristicConfig::default(),
        }
    }
}

impl EstimatorConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns `CardioRiskError::Config` for malformed values.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `CardioRiskError::Config` for malformed values.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup(STRATEGY_ENV) {
            cfg.strategy = v.parse()?;
        }
        if let Some(v) = lookup(MODEL_PATH_ENV) {
            let v = v.trim();
            if !v.is_empty() {
                cfg.model_path = PathBuf::from(v);
            }
        }
        if let Some(v) = lookup(REQUIRE_MANIFEST_ENV) {
            cfg.require_manifest = parse_bool(REQUIRE_MANIFEST_ENV, &v)?;
        }
        if let Some(v) = lookup(IMPORTANCE_ENV) {
            cfg.heuristic.importance_term = parse_bool(IMPORTANCE_ENV, &v)?;
        }
        if let Some(v) = lookup(JITTER_ENV) {
            cfg.heuristic.jitter = parse_bool(JITTER_ENV, &v)?;
        }
        if let Some(v) = lookup(SEED_ENV) {
            let seed = v.trim().parse::<u64>().map_err(|_| {
                CardioRiskError::Config(format!("{SEED_ENV} must be an unsigned integer, got '{v}'"))
            })?;
            cfg.heuristic.seed = Some(seed);
        }

        Ok(cfg)
    }
}

fn parse_bool(name: &str, value: &str) -> crate::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(CardioRiskError::Config(format!(
            "{name} must be a boolean, got '{value}'"
        ))),
    }
}
