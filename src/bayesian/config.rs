// Configuration for Bayesian win-probability estimation
//
// The Monte Carlo draw count and the normal-approximation cutoff have no
// derivation beyond "accurate enough for a dashboard"; both are exposed
// here instead of being fixed in the estimator.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Default number of posterior draws on the Monte Carlo path
pub const DEFAULT_MONTE_CARLO_SAMPLES: usize = 10_000;

/// Default per-arm visit count that must be exceeded for the normal path
pub const DEFAULT_NORMAL_APPROXIMATION_THRESHOLD: u64 = 30;

/// Configuration for [`BayesianEstimator`](super::BayesianEstimator)
///
/// # Example
/// ```
/// use abstat::bayesian::BayesianConfig;
///
/// let config = BayesianConfig::default();
/// assert_eq!(config.monte_carlo_samples, 10_000);
/// assert_eq!(config.normal_approximation_threshold, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BayesianConfig {
    /// Number of paired posterior draws on the Monte Carlo path
    ///
    /// The Monte Carlo standard error is `sqrt(p(1-p)/n)`, so the default
    /// of 10,000 keeps it at or below 0.005.
    pub monte_carlo_samples: usize,

    /// Both arms need strictly more visits than this to use the normal
    /// approximation; otherwise the Monte Carlo path runs
    pub normal_approximation_threshold: u64,
}

impl Default for BayesianConfig {
    fn default() -> Self {
        Self {
            monte_carlo_samples: DEFAULT_MONTE_CARLO_SAMPLES,
            normal_approximation_threshold: DEFAULT_NORMAL_APPROXIMATION_THRESHOLD,
        }
    }
}

impl BayesianConfig {
    /// Fewer draws (standard error up to ~0.011) for interactive use
    pub fn fast() -> Self {
        Self {
            monte_carlo_samples: 2_000,
            ..Self::default()
        }
    }

    /// More draws (standard error up to ~0.0016) for reports
    pub fn precise() -> Self {
        Self {
            monte_carlo_samples: 100_000,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.monte_carlo_samples == 0 {
            return Err(AnalysisError::InvalidConfig(
                "monte_carlo_samples must be >= 1, got 0".to_string(),
            ));
        }
        Ok(())
    }
}
