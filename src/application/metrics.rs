//! Aggregate assessment counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::domain::{RiskAssessment, RiskLevel};

/// Process-wide assessment counters, shared by `Arc`.
#[derive(Debug, Default)]
pub struct Metrics {
    total: AtomicU64,
    high_risk: AtomicU64,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed assessment.
    pub fn record(&self, assessment: &RiskAssessment) {
        self.total.fetch_add(1, Ordering::Release);
        if assessment.level() == RiskLevel::High {
            self.high_risk.fetch_add(1, Ordering::Release);
        }
    }

    /// Counters are read high-risk first, so a concurrent `record` can only
    /// make `total` run ahead.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let high_risk = self.high_risk.load(Ordering::Acquire);
        let total = self.total.load(Ordering::Acquire);
        MetricsSnapshot {
            total,
            high_risk: high_risk.min(total),
        }
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub total: u64,
    pub high_risk: u64,
}

impl MetricsSnapshot {
    /// Fraction of assessments classified High, in [0, 1]; 0 before any
    /// assessment.
    #[must_use]
    pub fn high_risk_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.high_risk.min(self.total) as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Label;
    use std::sync::Arc;

    #[test]
    fn test_empty_snapshot() {
        let snap = Metrics::new().snapshot();
        assert_eq!(snap.total, 0);
        assert_eq!(snap.high_risk, 0);
        assert_eq!(snap.high_risk_rate(), 0.0);
    }

    #[test]
    fn test_counts_levels() {
        let metrics = Metrics::new();
        metrics.record(&RiskAssessment::from_classifier(Label::Disease, 0.82));
        metrics.record(&RiskAssessment::from_classifier(Label::NoDisease, 0.10));
        metrics.record(&RiskAssessment::from_heuristic(67.0));
        metrics.record(&RiskAssessment::from_heuristic(71.0));

        let snap = metrics.snapshot();
        assert_eq!(snap.total, 4);
        assert_eq!(snap.high_risk, 2);
        assert!((snap.high_risk_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rate_never_exceeds_one() {
        let skewed = MetricsSnapshot {
            total: 3,
            high_risk: 5,
        };
        assert_eq!(skewed.high_risk_rate(), 1.0);
    }

    #[test]
    fn test_snapshot_consistent_under_concurrent_recording() {
        let metrics = Arc::new(Metrics::new());
        let writer = {
            let m = Arc::clone(&metrics);
            std::thread::spawn(move || {
                for _ in 0..20_000 {
                    m.record(&RiskAssessment::from_heuristic(90.0));
                }
            })
        };
        for _ in 0..20_000 {
            let snap = metrics.snapshot();
            assert!(snap.high_risk <= snap.total, "{snap:?}");
            assert!(snap.high_risk_rate() <= 1.0);
        }
        writer.join().expect("thread");
    }

    #[test]
    fn test_concurrent_recording() {
        let metrics = Arc::new(Metrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        m.record(&RiskAssessment::from_heuristic(90.0));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread");
        }
        let snap = metrics.snapshot();
        assert_eq!(snap.total, 1000);
        assert_eq!(snap.high_risk, 1000);
    }
}
