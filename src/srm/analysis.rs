// Sample ratio analysis: chi-squared result plus descriptive ratios
//
// Invalid counts never surface as errors here; they produce a flagged
// result without a breakdown, which callers render as "no mismatch".

use crate::srm::chi_squared::{calculate_chi_squared, ChiSquaredResult};
use crate::srm::config::SrmConfig;
use serde::Serialize;

pub const RECOMMENDATION_MISMATCH: &str =
    "Sample ratio mismatch detected. Consider investigating data collection or randomisation issues.";

pub const RECOMMENDATION_OK: &str = "Sample ratios are within acceptable range.";

/// Descriptive view of the traffic split
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioBreakdown {
    /// Control share of total traffic, percent, 2 decimal places
    pub control_ratio: f64,

    /// Variant share of total traffic, percent, 2 decimal places
    pub variant_ratio: f64,

    /// Absolute difference between the arm counts
    pub difference: u64,

    /// Difference as a percentage of total traffic, 1 decimal place
    pub percent_difference: f64,

    pub recommendation: String,
}

/// Full sample ratio mismatch analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRatioAnalysis {
    #[serde(flatten)]
    pub result: ChiSquaredResult,

    /// Absent when the counts were invalid
    #[serde(flatten)]
    pub breakdown: Option<RatioBreakdown>,
}

impl SampleRatioAnalysis {
    pub fn is_significant(&self) -> bool {
        self.result.is_significant()
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        let result = &self.result;

        if let Some(err) = &result.error {
            report.push_str("⚠️  SRM CHECK SKIPPED\n\n");
            report.push_str(&format!("Reason: {}\n", err));
            return report;
        }

        if result.is_significant() {
            report.push_str(&format!(
                "❌ SAMPLE RATIO MISMATCH ({})\n\n",
                result.severity.as_str().to_uppercase()
            ));
        } else {
            report.push_str("✅ NO SAMPLE RATIO MISMATCH\n\n");
        }

        report.push_str(&format!(
            "Control: {} (expected {:.1})\n",
            result.control_count, result.expected_control
        ));
        report.push_str(&format!(
            "Variant: {} (expected {:.1})\n",
            result.variant_count, result.expected_variant
        ));
        report.push_str(&format!(
            "Chi-squared: {:.4} (p={:.6})\n",
            result.chi_squared, result.p_value
        ));

        if let Some(breakdown) = &self.breakdown {
            report.push_str(&format!(
                "Split: {:.2}% / {:.2}% (difference {}, {:.1}%)\n",
                breakdown.control_ratio,
                breakdown.variant_ratio,
                breakdown.difference,
                breakdown.percent_difference
            ));
            report.push_str(&format!("\n{}\n", breakdown.recommendation));
        }

        report
    }
}

/// Sample ratio mismatch detector against an intended 50/50 split
///
/// # Example
/// ```
/// use abstat::srm::{Severity, SrmDetector};
///
/// let analysis = SrmDetector::default().analyze(1500, 500);
/// assert_eq!(analysis.result.severity, Severity::Critical);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SrmDetector {
    config: SrmConfig,
}

impl SrmDetector {
    pub fn new(config: SrmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SrmConfig {
        &self.config
    }

    /// Chi-squared test only
    pub fn chi_squared(&self, control_count: u64, variant_count: u64) -> ChiSquaredResult {
        calculate_chi_squared(
            control_count,
            variant_count,
            self.config.warning_level,
            self.config.critical_level,
        )
    }

    /// Chi-squared test plus ratios and a recommendation
    pub fn analyze(&self, control_count: u64, variant_count: u64) -> SampleRatioAnalysis {
        let result = self.chi_squared(control_count, variant_count);

        if result.error.is_some() {
            return SampleRatioAnalysis {
                result,
                breakdown: None,
            };
        }

        let total = control_count as f64 + variant_count as f64;
        let difference = control_count.abs_diff(variant_count);
        let recommendation = if result.is_significant() {
            RECOMMENDATION_MISMATCH
        } else {
            RECOMMENDATION_OK
        };

        let breakdown = RatioBreakdown {
            control_ratio: round_to(control_count as f64 / total * 100.0, 2),
            variant_ratio: round_to(variant_count as f64 / total * 100.0, 2),
            difference,
            percent_difference: round_to(difference as f64 / total * 100.0, 1),
            recommendation: recommendation.to_string(),
        };

        SampleRatioAnalysis {
            result,
            breakdown: Some(breakdown),
        }
    }

    pub fn is_significant_mismatch(&self, control_count: u64, variant_count: u64) -> bool {
        self.chi_squared(control_count, variant_count)
            .is_significant()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Analyze a 50/50 split with default significance levels
pub fn analyze_sample_ratio(control_count: u64, variant_count: u64) -> SampleRatioAnalysis {
    SrmDetector::default().analyze(control_count, variant_count)
}

/// True when the split deviates from 50/50 at p < 0.05
pub fn is_significant_mismatch(control_count: u64, variant_count: u64) -> bool {
    SrmDetector::default().is_significant_mismatch(control_count, variant_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srm::chi_squared::Severity;

    #[test]
    fn test_breakdown_values() {
        let analysis = analyze_sample_ratio(1200, 800);
        let breakdown = analysis.breakdown.as_ref().unwrap();
        assert_eq!(breakdown.control_ratio, 60.0);
        assert_eq!(breakdown.variant_ratio, 40.0);
        assert_eq!(breakdown.difference, 400);
        assert_eq!(breakdown.percent_difference, 20.0);
        assert_eq!(breakdown.recommendation, RECOMMENDATION_MISMATCH);
    }

    #[test]
    fn test_ratio_rounding() {
        // 1/3 and 2/3 of the traffic
        let analysis = analyze_sample_ratio(100, 200);
        let breakdown = analysis.breakdown.unwrap();
        assert_eq!(breakdown.control_ratio, 33.33);
        assert_eq!(breakdown.variant_ratio, 66.67);
        assert_eq!(breakdown.percent_difference, 33.3);
    }

    #[test]
    fn test_balanced_recommendation() {
        let analysis = analyze_sample_ratio(1000, 1000);
        assert_eq!(analysis.result.severity, Severity::None);
        assert_eq!(
            analysis.breakdown.unwrap().recommendation,
            RECOMMENDATION_OK
        );
    }

    #[test]
    fn test_invalid_counts_have_no_breakdown() {
        let analysis = analyze_sample_ratio(0, 100);
        assert!(analysis.breakdown.is_none());
        assert!(!analysis.is_significant());
        assert!(analysis.to_report_string().contains("SKIPPED"));
    }

    #[test]
    fn test_custom_levels() {
        // chi2 = 5 gives p ~ 0.025: a warning at 0.05, nothing at 0.01
        let strict = SrmDetector::new(SrmConfig {
            warning_level: 0.01,
            critical_level: 0.0001,
        });
        assert!(!strict.is_significant_mismatch(1050, 950));
        assert!(is_significant_mismatch(1050, 950));
    }

    #[test]
    fn test_report_string() {
        let report = analyze_sample_ratio(1500, 500).to_report_string();
        assert!(report.contains("SAMPLE RATIO MISMATCH (CRITICAL)"));
        assert!(report.contains("75.00% / 25.00%"));
        assert!(report.contains(RECOMMENDATION_MISMATCH));

        let report = analyze_sample_ratio(1000, 1000).to_report_string();
        assert!(report.contains("NO SAMPLE RATIO MISMATCH"));
    }

    #[test]
    fn test_json_is_flat() {
        let json = serde_json::to_value(analyze_sample_ratio(1200, 800)).unwrap();
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["control_ratio"], 60.0);
        assert!(json.get("error").is_none());

        let json = serde_json::to_value(analyze_sample_ratio(0, 10)).unwrap();
        assert_eq!(json["p_value"], 1.0);
        assert_eq!(json["error"]["kind"], "invalid_counts");
        assert!(json.get("recommendation").is_none());
    }
}
