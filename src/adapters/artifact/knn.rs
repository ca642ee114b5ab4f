//! k-nearest-neighbours classifier over scaled feature vectors.
//!
//! Euclidean distance; neighbours vote for class 0 or 1, either uniformly or
//! weighted by inverse distance. Ties between equidistant samples resolve to
//! the lower sample index, and a tied vote predicts class 0.

use serde::{Deserialize, Serialize};

use crate::ports::{Classifier, ClassifierError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnnWeights {
    #[default]
    Uniform,
    Distance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnClassifier {
    n_neighbors: usize,
    #[serde(default)]
    weights: KnnWeights,
    samples: Vec<Vec<f64>>,
    labels: Vec<u8>,
}

impl KnnClassifier {
    /// Build a classifier from fitted samples and labels.
    ///
    /// # Errors
    /// Returns `ClassifierError::InvalidArtifact` if `k` is out of range, the
    /// samples are empty, ragged or non-finite, or a label is not 0 or 1.
    pub fn new(
        n_neighbors: usize,
        weights: KnnWeights,
        samples: Vec<Vec<f64>>,
        labels: Vec<u8>,
    ) -> Result<Self, ClassifierError> {
        let model = Self {
            n_neighbors,
            weights,
            samples,
            labels,
        };
        model.check()?;
        Ok(model)
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    pub(super) fn check(&self) -> Result<(), ClassifierError> {
        if self.samples.is_empty() {
            return Err(ClassifierError::InvalidArtifact(
                "Classifier has no training samples".into(),
            ));
        }
        if self.samples.len() != self.labels.len() {
            return Err(ClassifierError::InvalidArtifact(format!(
                "Sample/label count mismatch: {} vs {}",
                self.samples.len(),
                self.labels.len()
            )));
        }
        if self.n_neighbors == 0 || self.n_neighbors > self.samples.len() {
            return Err(ClassifierError::InvalidArtifact(format!(
                "n_neighbors must be in [1, {}], got {}",
                self.samples.len(),
                self.n_neighbors
            )));
        }

        let n = self.n_features();
        if n == 0 {
            return Err(ClassifierError::InvalidArtifact(
                "Training samples have no features".into(),
            ));
        }
        for (i, sample) in self.samples.iter().enumerate() {
            if sample.len() != n {
                return Err(ClassifierError::InvalidArtifact(format!(
                    "Sample {i} has {} features, expected {n}",
                    sample.len()
                )));
            }
            if sample.iter().any(|v| !v.is_finite()) {
                return Err(ClassifierError::InvalidArtifact(format!(
                    "Sample {i} contains a non-finite value"
                )));
            }
        }
        if let Some(bad) = self.labels.iter().find(|&&l| l > 1) {
            return Err(ClassifierError::InvalidArtifact(format!(
                "Labels must be 0 or 1, found {bad}"
            )));
        }
        Ok(())
    }

    /// Indices and distances of the `k` nearest samples, nearest first.
    fn neighbours(&self, x: &[f64]) -> Result<Vec<(usize, f64)>, ClassifierError> {
        if x.len() != self.n_features() {
            return Err(ClassifierError::FeatureCount {
                got: x.len(),
                expected: self.n_features(),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::Prediction(
                "Input vector contains a non-finite value".into(),
            ));
        }

        let mut dists: Vec<(usize, f64)> = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, s)| {
                if s.len() != x.len() {
                    return Err(ClassifierError::Prediction(format!(
                        "Sample {i} has {} features, expected {}",
                        s.len(),
                        x.len()
                    )));
                }
                let d2: f64 = s.iter().zip(x).map(|(a, b)| (a - b) * (a - b)).sum();
                Ok((i, d2.sqrt()))
            })
            .collect::<Result<_, _>>()?;

        // Stable sort keeps index order among equal distances.
        dists.sort_by(|a, b| a.1.total_cmp(&b.1));
        dists.truncate(self.n_neighbors);
        Ok(dists)
    }

    /// Vote slot for sample `i`. Deserialized models may skip `check`.
    fn class_of(&self, i: usize) -> Result<usize, ClassifierError> {
        match self.labels.get(i) {
            Some(&label) if label <= 1 => Ok(usize::from(label)),
            Some(&label) => Err(ClassifierError::Prediction(format!(
                "Sample {i} has label {label}, expected 0 or 1"
            ))),
            None => Err(ClassifierError::Prediction(format!(
                "Sample {i} has no label"
            ))),
        }
    }
}

impl Classifier for KnnClassifier {
    fn predict(&self, scaled: &[f64]) -> Result<u8, ClassifierError> {
        let [p0, p1] = self.predict_proba(scaled)?;
        Ok(if p1 > p0 { 1 } else { 0 })
    }

    fn predict_proba(&self, scaled: &[f64]) -> Result<[f64; 2], ClassifierError> {
        let neighbours = self.neighbours(scaled)?;
        let mut votes = [0.0_f64; 2];

        match self.weights {
            KnnWeights::Uniform => {
                for (i, _) in &neighbours {
                    votes[self.class_of(*i)?] += 1.0;
                }
            }
            KnnWeights::Distance => {
                // Exact matches take the whole vote.
                let exact: Vec<usize> = neighbours
                    .iter()
                    .filter(|(_, d)| *d == 0.0)
                    .map(|(i, _)| *i)
                    .collect();
                if exact.is_empty() {
                    for (i, d) in &neighbours {
                        votes[self.class_of(*i)?] += 1.0 / d;
                    }
                } else {
                    for i in exact {
                        votes[self.class_of(i)?] += 1.0;
                    }
                }
            }
        }

        let total = votes[0] + votes[1];
        if !(total.is_finite() && total > 0.0) {
            return Err(ClassifierError::Prediction(
                "Neighbour vote did not produce a probability".into(),
            ));
        }
        Ok([votes[0] / total, votes[1] / total])
    }
}
