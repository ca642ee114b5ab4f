//! Standardisation scaler: `(x - mean) / scale` per feature.

use serde::{Deserialize, Serialize};

use crate::ports::{ClassifierError, FeatureScaler};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// # Errors
    /// Returns `ClassifierError::InvalidArtifact` if the parameters are empty,
    /// of unequal length, or non-finite.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ClassifierError> {
        let scaler = Self { mean, scale };
        scaler.check()?;
        Ok(scaler)
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Indices of features fitted with zero variance.
    pub fn constant_features(&self) -> impl Iterator<Item = usize> + '_ {
        self.scale
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == 0.0)
            .map(|(i, _)| i)
    }

    pub(super) fn check(&self) -> Result<(), ClassifierError> {
        if self.mean.is_empty() {
            return Err(ClassifierError::InvalidArtifact(
                "Scaler has no features".into(),
            ));
        }
        if self.mean.len() != self.scale.len() {
            return Err(ClassifierError::InvalidArtifact(format!(
                "Scaler mean/scale length mismatch: {} vs {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .any(|v| !v.is_finite())
        {
            return Err(ClassifierError::InvalidArtifact(
                "Scaler parameters must be finite".into(),
            ));
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ClassifierError> {
        if features.len() != self.mean.len() {
            return Err(ClassifierError::FeatureCount {
                got: features.len(),
                expected: self.mean.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| {
                // Constant features were fitted with zero variance.
                let s = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / s
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler::new(vec![50.0, 1.0], vec![10.0, 0.5]).expect("valid");
        let out = scaler.transform(&[70.0, 0.0]).expect("transform");
        assert!((out[0] - 2.0).abs() < 1e-12);
        assert!((out[1] + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let scaler = StandardScaler::new(vec![0.0, 3.0], vec![1.0, 0.0]).expect("valid");
        let out = scaler.transform(&[1.0, 0.0]).expect("transform");
        assert!((out[1] + 3.0).abs() < 1e-12);
        assert_eq!(scaler.constant_features().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_length_mismatch() {
        let scaler = StandardScaler::new(vec![0.0; 13], vec![1.0; 13]).expect("valid");
        let err = scaler.transform(&[1.0; 12]).expect_err("must fail");
        assert!(matches!(
            err,
            ClassifierError::FeatureCount {
                got: 12,
                expected: 13
            }
        ));
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        assert!(StandardScaler::new(vec![0.0; 2], vec![1.0]).is_err());
        assert!(StandardScaler::new(vec![], vec![]).is_err());
        assert!(StandardScaler::new(vec![f64::NAN], vec![1.0]).is_err());
        assert!(StandardScaler::new(vec![0.0], vec![1.0]).is_ok());
    }

    #[test]
    fn test_deserialized_scaler_fails_check() {
        let scaler: StandardScaler =
            serde_json::from_str(r#"{"mean":[0.0,1.0],"scale":[1.0]}"#).expect("parse");
        assert!(scaler.check().is_err());
    }
}
