// Significance levels for sample ratio mismatch detection

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Chi-squared critical value for p = 0.05 at 1 degree of freedom
pub const CHI_SQUARED_WARNING: f64 = 3.841;

/// Chi-squared critical value for p = 0.001 at 1 degree of freedom
pub const CHI_SQUARED_CRITICAL: f64 = 10.828;

/// Configuration for [`SrmDetector`](super::SrmDetector)
///
/// # Example
/// ```
/// use abstat::srm::SrmConfig;
///
/// let config = SrmConfig::default();
/// assert_eq!(config.warning_level, 0.05);
/// assert_eq!(config.critical_level, 0.001);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrmConfig {
    /// p-values below this are reported as a warning
    pub warning_level: f64,

    /// p-values below this are reported as critical
    pub critical_level: f64,
}

impl Default for SrmConfig {
    fn default() -> Self {
        Self {
            warning_level: 0.05,
            critical_level: 0.001,
        }
    }
}

impl SrmConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, level) in [
            ("warning_level", self.warning_level),
            ("critical_level", self.critical_level),
        ] {
            if !(level > 0.0 && level < 1.0) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{name} must be in (0, 1), got {level}"
                )));
            }
        }

        if self.critical_level >= self.warning_level {
            return Err(AnalysisError::InvalidConfig(format!(
                "critical_level ({}) must be below warning_level ({})",
                self.critical_level, self.warning_level
            )));
        }

        Ok(())
    }
}
