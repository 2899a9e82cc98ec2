// Sample Ratio Mismatch (SRM) detection with a chi-squared test
//
// An experiment that intends a 50/50 split but observes a lopsided one
// usually has an instrumentation or randomisation bug, and its results
// cannot be trusted. The detector tests observed arm counts against the
// intended split:
//
// - Pearson chi-squared with 1 degree of freedom
// - p-value through the shared normal CDF (χ² = z² at 1 d.o.f.)
// - Severity: critical below 0.001, warning below 0.05
//
// Counts that cannot be tested yield a flagged "no mismatch" result rather
// than an error, so a dashboard never needs a special case for them.

mod analysis;
mod chi_squared;
mod config;

pub use analysis::{
    analyze_sample_ratio, is_significant_mismatch, RatioBreakdown, SampleRatioAnalysis,
    SrmDetector, RECOMMENDATION_MISMATCH, RECOMMENDATION_OK,
};
pub use chi_squared::{
    calculate_chi_squared, chi_squared_statistic, p_value_from_chi_squared, ChiSquaredResult,
    Severity,
};
pub use config::{SrmConfig, CHI_SQUARED_CRITICAL, CHI_SQUARED_WARNING};
