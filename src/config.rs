//! Analysis configuration
//!
//! Groups the Bayesian, SRM and classification settings so a dashboard or
//! the CLI can load them from a single TOML file. Every section is
//! optional and falls back to its defaults.
//!
//! ```toml
//! [bayesian]
//! monte_carlo_samples = 20000
//!
//! [srm]
//! warning_level = 0.01
//!
//! [secondary_thresholds]
//! unfavorable_max = 1.0
//! inconclusive_low_max = 5.0
//! inconclusive_high_min = 95.0
//! favorable_min = 99.0
//! ```

use crate::bayesian::{BayesianConfig, BayesianEstimator, ClassificationThresholds, MetricRole};
use crate::error::Result;
use crate::srm::{SrmConfig, SrmDetector};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub bayesian: BayesianConfig,
    pub srm: SrmConfig,
    pub primary_thresholds: ClassificationThresholds,
    pub secondary_thresholds: ClassificationThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bayesian: BayesianConfig::default(),
            srm: SrmConfig::default(),
            primary_thresholds: ClassificationThresholds::primary(),
            secondary_thresholds: ClassificationThresholds::secondary(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading analysis configuration");
        Self::from_toml_str(&contents)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.bayesian.validate()?;
        self.srm.validate()?;
        self.primary_thresholds.validate()?;
        self.secondary_thresholds.validate()?;
        Ok(())
    }

    pub fn thresholds(&self, role: MetricRole) -> &ClassificationThresholds {
        match role {
            MetricRole::Primary => &self.primary_thresholds,
            MetricRole::Secondary => &self.secondary_thresholds,
        }
    }

    pub fn estimator(&self) -> BayesianEstimator {
        BayesianEstimator::new(self.bayesian.clone())
    }

    pub fn srm_detector(&self) -> SrmDetector {
        SrmDetector::new(self.srm.clone())
    }
}
