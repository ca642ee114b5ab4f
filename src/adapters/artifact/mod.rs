//! Artifact adapter: JSON-serialized feature scaler and k-NN classifier.
//!
//! A model directory holds:
//! - `scaler.json`: standardisation parameters (`mean`, `scale`)
//! - `knn_model.json`: training samples, labels, `n_neighbors`, `weights`
//! - `manifest.json` (optional): SHA-256 of each artifact file
//!
//! # Integrity
//!
//! When a manifest is present, every file it lists must hash to its recorded
//! value and both artifact files must be listed. With `require_manifest`, a
//! missing manifest fails the load.

mod knn;
mod scaler;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ports::ClassifierError;

pub use knn::{KnnClassifier, KnnWeights};
pub use scaler::StandardScaler;

pub const SCALER_FILE: &str = "scaler.json";
pub const CLASSIFIER_FILE: &str = "knn_model.json";
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

/// File hashes binding a set of artifacts together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    /// Hash the given files under `dir` into a new manifest.
    ///
    /// # Errors
    /// Returns error if any file cannot be read.
    pub fn from_files(dir: &Path, names: &[&str]) -> Result<Self, ClassifierError> {
        let mut files = BTreeMap::new();
        for name in names {
            let bytes = read_artifact(&dir.join(name))?;
            files.insert((*name).to_string(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            files,
        })
    }

    fn verify(&self, dir: &Path) -> Result<(), ClassifierError> {
        if self.version != MANIFEST_VERSION {
            return Err(ClassifierError::InvalidArtifact(format!(
                "Unsupported manifest version: {}",
                self.version
            )));
        }
        for required in [SCALER_FILE, CLASSIFIER_FILE] {
            if !self.files.contains_key(required) {
                return Err(ClassifierError::InvalidArtifact(format!(
                    "{MANIFEST_FILE} must include {required}"
                )));
            }
        }

        for (rel, expected_hex) in &self.files {
            let bytes = read_artifact(&dir.join(rel))?;
            let actual_hex = sha256_hex(&bytes);
            if !actual_hex.eq_ignore_ascii_case(expected_hex) {
                return Err(ClassifierError::InvalidArtifact(format!(
                    "File hash mismatch for {rel}"
                )));
            }
        }
        Ok(())
    }
}

/// A scaler and classifier loaded together from one directory.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub scaler: StandardScaler,
    pub classifier: KnnClassifier,
}

impl ModelArtifacts {
    /// Load and validate the artifacts in `model_dir`.
    ///
    /// # Errors
    /// Returns `ClassifierError::Unavailable` if the directory or a file is
    /// missing, and `ClassifierError::InvalidArtifact` if a file is malformed
    /// or fails the manifest check.
    pub fn load(model_dir: &Path, require_manifest: bool) -> Result<Self, ClassifierError> {
        if !model_dir.is_dir() {
            return Err(ClassifierError::Unavailable(format!(
                "Model directory not found at {:?}",
                model_dir
            )));
        }

        let manifest_path = model_dir.join(MANIFEST_FILE);
        if manifest_path.exists() {
            let manifest: ArtifactManifest = parse_json(&manifest_path)?;
            manifest.verify(model_dir)?;
            tracing::info!("Artifact hashes verified against {}", MANIFEST_FILE);
        } else if require_manifest {
            tracing::error!("No {} in {:?} and a manifest is required", MANIFEST_FILE, model_dir);
            return Err(ClassifierError::Unavailable(format!(
                "{MANIFEST_FILE} required but not found in {:?}",
                model_dir
            )));
        } else {
            tracing::warn!("Loading artifacts from {:?} without a manifest", model_dir);
        }

        let scaler: StandardScaler = parse_json(&model_dir.join(SCALER_FILE))?;
        scaler.check()?;
        let classifier: KnnClassifier = parse_json(&model_dir.join(CLASSIFIER_FILE))?;
        classifier.check()?;

        if scaler.n_features() != classifier.n_features() {
            return Err(ClassifierError::InvalidArtifact(format!(
                "Scaler expects {} features but classifier was trained on {}",
                scaler.n_features(),
                classifier.n_features()
            )));
        }

        tracing::info!(
            "Loaded artifacts from {:?} (n_features={}, n_samples={}, k={})",
            model_dir,
            classifier.n_features(),
            classifier.n_samples(),
            classifier.n_neighbors()
        );

        Ok(Self { scaler, classifier })
    }
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, ClassifierError> {
    fs::read(path).map_err(|e| {
        ClassifierError::Unavailable(format!("Missing or unreadable artifact {:?}: {e}", path))
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ClassifierError> {
    let bytes = read_artifact(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        ClassifierError::InvalidArtifact(format!("Invalid JSON in {:?}: {e}", path))
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_without_manifest() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());

        let artifacts = ModelArtifacts::load(temp.path(), false).expect("load");
        assert_eq!(artifacts.classifier.n_features(), 2);
        assert_eq!(artifacts.classifier.n_samples(), 6);
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let err = ModelArtifacts::load(Path::new("/nonexistent/cardiorisk/models"), false)
            .expect_err("must fail");
        assert!(matches!(err, ClassifierError::Unavailable(_)));
    }

    #[test]
    fn test_missing_classifier_file_is_unavailable() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        fs::remove_file(temp.path().join(CLASSIFIER_FILE)).expect("remove");

        let err = ModelArtifacts::load(temp.path(), false).expect_err("must fail");
        assert!(matches!(err, ClassifierError::Unavailable(_)));
    }

    #[test]
    fn test_required_manifest_missing() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());

        let err = ModelArtifacts::load(temp.path(), true).expect_err("must fail");
        assert!(err.to_string().contains(MANIFEST_FILE));
    }

    #[test]
    fn test_manifest_verified() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        write_manifest(temp.path());

        ModelArtifacts::load(temp.path(), true).expect("manifest should verify");
    }

    #[test]
    fn test_manifest_hash_mismatch_rejected() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        write_manifest(temp.path());

        // Tamper after hashing.
        let scaler = StandardScaler::new(vec![1.0; 2], vec![1.0; 2]).expect("valid");
        fs::write(
            temp.path().join(SCALER_FILE),
            serde_json::to_vec(&scaler).expect("serialize"),
        )
        .expect("write");

        let err = ModelArtifacts::load(temp.path(), false).expect_err("must fail");
        assert!(err.to_string().contains("hash mismatch"));
    }

    #[test]
    fn test_manifest_must_bind_both_artifacts() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        let manifest =
            ArtifactManifest::from_files(temp.path(), &[SCALER_FILE]).expect("hash");
        fs::write(
            temp.path().join(MANIFEST_FILE),
            serde_json::to_vec(&manifest).expect("serialize"),
        )
        .expect("write");

        let err = ModelArtifacts::load(temp.path(), false).expect_err("must fail");
        assert!(err.to_string().contains(CLASSIFIER_FILE));
    }

    #[test]
    fn test_feature_count_disagreement_rejected() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        let scaler = StandardScaler::new(vec![0.0; 3], vec![1.0; 3]).expect("valid");
        fs::write(
            temp.path().join(SCALER_FILE),
            serde_json::to_vec(&scaler).expect("serialize"),
        )
        .expect("write");

        let err = ModelArtifacts::load(temp.path(), false).expect_err("must fail");
        assert!(matches!(err, ClassifierError::InvalidArtifact(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        fs::write(temp.path().join(SCALER_FILE), b"{not json").expect("write");

        let err = ModelArtifacts::load(temp.path(), false).expect_err("must fail");
        assert!(matches!(err, ClassifierError::InvalidArtifact(_)));
    }
}
