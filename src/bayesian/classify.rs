// Traffic-light classification of win probabilities
//
// Primary metrics use wider bands than secondary metrics: a secondary
// metric needs 98% (or 2%) before it is called either way.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Category a rendering layer maps to a cell color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    Unfavorable,
    Inconclusive,
    Favorable,
    /// Middle of the range; no highlighting
    None,
}

impl CellClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellClass::Unfavorable => "unfavorable",
            CellClass::Inconclusive => "inconclusive",
            CellClass::Favorable => "favorable",
            CellClass::None => "none",
        }
    }
}

impl std::fmt::Display for CellClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a metric is the experiment's primary or a secondary metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricRole {
    Primary,
    Secondary,
}

impl MetricRole {
    pub fn from_is_primary(is_primary: bool) -> Self {
        if is_primary {
            MetricRole::Primary
        } else {
            MetricRole::Secondary
        }
    }
}

/// Band edges, in percent
///
/// With `p = probability * 100`:
/// - `[0, unfavorable_max]` → unfavorable
/// - `(unfavorable_max, inconclusive_low_max]` → inconclusive
/// - `[inconclusive_high_min, favorable_min)` → inconclusive
/// - `[favorable_min, 100]` → favorable
/// - anything else → none
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    pub unfavorable_max: f64,
    pub inconclusive_low_max: f64,
    pub inconclusive_high_min: f64,
    pub favorable_min: f64,
}

impl ClassificationThresholds {
    pub fn primary() -> Self {
        Self {
            unfavorable_max: 5.0,
            inconclusive_low_max: 15.0,
            inconclusive_high_min: 85.0,
            favorable_min: 95.0,
        }
    }

    pub fn secondary() -> Self {
        Self {
            unfavorable_max: 2.0,
            inconclusive_low_max: 10.0,
            inconclusive_high_min: 90.0,
            favorable_min: 98.0,
        }
    }

    pub fn for_role(role: MetricRole) -> Self {
        match role {
            MetricRole::Primary => Self::primary(),
            MetricRole::Secondary => Self::secondary(),
        }
    }

    /// Classify a probability in [0, 1]
    ///
    /// Edges are compared as `percent / 100` so a literal such as `0.05`
    /// lands exactly on the 5% edge.
    pub fn classify(&self, probability: f64) -> CellClass {
        let edge = |percent: f64| percent / 100.0;
        let p = probability;

        let low_inconclusive =
            p > edge(self.unfavorable_max) && p <= edge(self.inconclusive_low_max);
        let high_inconclusive =
            p >= edge(self.inconclusive_high_min) && p < edge(self.favorable_min);

        if (0.0..=edge(self.unfavorable_max)).contains(&p) {
            CellClass::Unfavorable
        } else if low_inconclusive || high_inconclusive {
            CellClass::Inconclusive
        } else if (edge(self.favorable_min)..=1.0).contains(&p) {
            CellClass::Favorable
        } else {
            CellClass::None
        }
    }

    /// Validate that the band edges are ordered within [0, 100]
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let edges = [
            0.0,
            self.unfavorable_max,
            self.inconclusive_low_max,
            self.inconclusive_high_min,
            self.favorable_min,
            100.0,
        ];
        if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[0] > w[1]) {
            return Err(AnalysisError::InvalidConfig(format!(
                "classification thresholds must satisfy 0 <= {} <= {} <= {} <= {} <= 100",
                self.unfavorable_max,
                self.inconclusive_low_max,
                self.inconclusive_high_min,
                self.favorable_min
            )));
        }
        Ok(())
    }
}

/// Classify with the built-in primary or secondary thresholds
///
/// # Example
/// ```
/// use abstat::{classify, CellClass};
///
/// assert_eq!(classify(0.97, true), CellClass::Favorable);
/// assert_eq!(classify(0.97, false), CellClass::Inconclusive);
/// ```
pub fn classify(probability: f64, is_primary_metric: bool) -> CellClass {
    ClassificationThresholds::for_role(MetricRole::from_is_primary(is_primary_metric))
        .classify(probability)
}
