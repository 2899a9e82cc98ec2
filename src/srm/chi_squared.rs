// Pearson chi-squared test of two arm counts against a 50/50 split

use crate::error::InputError;
use crate::normal::normal_sf;
use serde::Serialize;

/// How serious an observed mismatch is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Warning,
    Critical,
}

impl Severity {
    /// Classify a p-value against warning and critical levels
    pub fn from_p_value(p_value: f64, warning_level: f64, critical_level: f64) -> Self {
        if p_value < critical_level {
            Severity::Critical
        } else if p_value < warning_level {
            Severity::Warning
        } else {
            Severity::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the chi-squared goodness-of-fit test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquaredResult {
    /// Pearson statistic, 1 degree of freedom
    pub chi_squared: f64,

    /// Two-tailed p-value in [0, 1]
    pub p_value: f64,

    pub severity: Severity,

    pub control_count: u64,
    pub variant_count: u64,
    pub total: u64,
    pub expected_control: f64,
    pub expected_variant: f64,

    /// Set when the counts could not be tested; the rest of the result then
    /// reads as "no mismatch"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<InputError>,
}

impl ChiSquaredResult {
    /// True for warning and critical severities
    pub fn is_significant(&self) -> bool {
        self.severity != Severity::None
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    pub(crate) fn invalid(control_count: u64, variant_count: u64) -> Self {
        Self {
            chi_squared: 0.0,
            p_value: 1.0,
            severity: Severity::None,
            control_count,
            variant_count,
            total: control_count.saturating_add(variant_count),
            expected_control: 0.0,
            expected_variant: 0.0,
            error: Some(InputError::InvalidCounts {
                control: control_count,
                variant: variant_count,
            }),
        }
    }
}

/// Pearson statistic for two counts with equal expected share
pub fn chi_squared_statistic(control_count: u64, variant_count: u64) -> f64 {
    let total = control_count as f64 + variant_count as f64;
    let expected = total / 2.0;
    if expected <= 0.0 {
        return 0.0;
    }
    let control_dev = control_count as f64 - expected;
    let variant_dev = variant_count as f64 - expected;
    control_dev * control_dev / expected + variant_dev * variant_dev / expected
}

/// p-value of a 1-d.o.f. chi-squared statistic
///
/// With one degree of freedom `χ² = z²`, so `p = 2·(1 − Φ(√χ²))`.
pub fn p_value_from_chi_squared(chi_squared: f64) -> f64 {
    if chi_squared.is_nan() || chi_squared <= 0.0 {
        return 1.0;
    }
    let z = chi_squared.sqrt();
    (2.0 * normal_sf(z)).clamp(0.0, 1.0)
}

/// Run the test; zero counts yield an error-flagged, non-significant result
pub fn calculate_chi_squared(
    control_count: u64,
    variant_count: u64,
    warning_level: f64,
    critical_level: f64,
) -> ChiSquaredResult {
    if control_count == 0 || variant_count == 0 {
        return ChiSquaredResult::invalid(control_count, variant_count);
    }

    let total = control_count.saturating_add(variant_count);
    let expected = (control_count as f64 + variant_count as f64) / 2.0;
    let chi_squared = chi_squared_statistic(control_count, variant_count);
    let p_value = p_value_from_chi_squared(chi_squared);

    ChiSquaredResult {
        chi_squared,
        p_value,
        severity: Severity::from_p_value(p_value, warning_level, critical_level),
        control_count,
        variant_count,
        total,
        expected_control: expected,
        expected_variant: expected,
        error: None,
    }
}
