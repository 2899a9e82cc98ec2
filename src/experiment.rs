//! Multi-variant experiment evaluation
//!
//! A dashboard compares one control arm against up to three variants
//! (B, C, D). Each variant gets its own win probability, cell class and
//! uplift, and its own sample ratio check against control.

use crate::bayesian::{
    BayesianEstimate, BayesianEstimator, CellClass, ClassificationThresholds, MetricRole,
};
use crate::sample::BinomialSample;
use crate::srm::{SampleRatioAnalysis, Severity, SrmDetector};
use rand::Rng;
use serde::Serialize;

/// One non-control arm of an experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantArm {
    pub label: String,
    pub sample: BinomialSample,
}

impl VariantArm {
    pub fn new(label: impl Into<String>, sample: BinomialSample) -> Self {
        Self {
            label: label.into(),
            sample,
        }
    }
}

/// Evaluation of one variant against control for a binomial metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantComparison {
    pub label: String,
    #[serde(flatten)]
    pub estimate: BayesianEstimate,
    pub class: CellClass,
    /// Relative change in conversion rate, percent
    pub uplift_percent: Option<f64>,
}

/// Compare every usable variant against control
///
/// Variants whose sample is unusable are skipped, as are all variants when
/// control itself is unusable.
pub fn compare_variants(
    control: &BinomialSample,
    variants: &[VariantArm],
    thresholds: &ClassificationThresholds,
    estimator: &BayesianEstimator,
) -> Vec<VariantComparison> {
    compare_variants_with_rng(control, variants, thresholds, estimator, &mut rand::thread_rng())
}

/// [`compare_variants`] with a caller-supplied random source
pub fn compare_variants_with_rng<R: Rng + ?Sized>(
    control: &BinomialSample,
    variants: &[VariantArm],
    thresholds: &ClassificationThresholds,
    estimator: &BayesianEstimator,
    rng: &mut R,
) -> Vec<VariantComparison> {
    if !control.is_usable() {
        tracing::debug!(
            visits = control.visits,
            conversions = control.conversions,
            "Skipping variant comparison: unusable control"
        );
        return Vec::new();
    }

    variants
        .iter()
        .filter(|arm| arm.sample.is_usable())
        .map(|arm| {
            let estimate = estimator.estimate_with_rng(control, &arm.sample, rng);
            VariantComparison {
                label: arm.label.clone(),
                class: thresholds.classify(estimate.probability),
                uplift_percent: rate_uplift(control, &arm.sample),
                estimate,
            }
        })
        .collect()
}

/// Convenience wrapper choosing thresholds by metric role
pub fn compare_variants_for_role(
    control: &BinomialSample,
    variants: &[VariantArm],
    role: MetricRole,
    estimator: &BayesianEstimator,
) -> Vec<VariantComparison> {
    compare_variants(
        control,
        variants,
        &ClassificationThresholds::for_role(role),
        estimator,
    )
}

/// Relative change in conversion rate, in percent
///
/// `+∞` when control never converts but the variant does, `0` when neither
/// converts, `None` when either arm has no visits.
pub fn rate_uplift(control: &BinomialSample, variant: &BinomialSample) -> Option<f64> {
    let control_rate = control.rate()?;
    let variant_rate = variant.rate()?;

    if control_rate > 0.0 {
        Some((variant_rate - control_rate) / control_rate * 100.0)
    } else if variant_rate > 0.0 {
        Some(f64::INFINITY)
    } else {
        Some(0.0)
    }
}

/// Percentage change between two metric values
///
/// `None` when either value is zero or not finite.
pub fn percentage_change(control: f64, variant: f64) -> Option<f64> {
    if control == 0.0 || variant == 0.0 || !control.is_finite() || !variant.is_finite() {
        return None;
    }
    Some((variant - control) / control * 100.0)
}

/// A variant flagged by the sample ratio screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffectedVariant {
    pub label: String,
    pub control_ratio: f64,
    pub variant_ratio: f64,
    pub p_value: f64,
    pub severity: Severity,
}

/// Sample ratio checks of every variant against control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SrmScreening {
    pub has_mismatch: bool,
    pub affected: Vec<AffectedVariant>,
    pub analyses: Vec<(String, SampleRatioAnalysis)>,
}

impl SrmScreening {
    /// Most severe finding across all variants
    pub fn worst_severity(&self) -> Severity {
        self.affected
            .iter()
            .map(|a| a.severity)
            .max()
            .unwrap_or(Severity::None)
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        if self.has_mismatch {
            let labels: Vec<&str> = self.affected.iter().map(|a| a.label.as_str()).collect();
            report.push_str(&format!(
                "❌ SAMPLE RATIO MISMATCH in {} variant(s): {}\n\n",
                self.affected.len(),
                labels.join(", ")
            ));
            for affected in &self.affected {
                report.push_str(&format!(
                    "  {} [{}] split {:.2}% / {:.2}% (p={:.6})\n",
                    affected.label,
                    affected.severity,
                    affected.control_ratio,
                    affected.variant_ratio,
                    affected.p_value
                ));
            }
        } else {
            report.push_str(&format!(
                "✅ NO SAMPLE RATIO MISMATCH ({} variant(s) checked)\n",
                self.analyses.len()
            ));
        }

        report
    }
}

/// Check each variant's visits against control's for a 50/50 split
pub fn screen_sample_ratios(
    control_visits: u64,
    variants: &[(String, u64)],
    detector: &SrmDetector,
) -> SrmScreening {
    let mut affected = Vec::new();
    let mut analyses = Vec::with_capacity(variants.len());

    for (label, visits) in variants {
        let analysis = detector.analyze(control_visits, *visits);
        tracing::debug!(
            variant = %label,
            chi_squared = analysis.result.chi_squared,
            p_value = analysis.result.p_value,
            severity = %analysis.result.severity,
            "SRM analysis"
        );

        if analysis.is_significant() {
            if let Some(breakdown) = &analysis.breakdown {
                affected.push(AffectedVariant {
                    label: label.clone(),
                    control_ratio: breakdown.control_ratio,
                    variant_ratio: breakdown.variant_ratio,
                    p_value: analysis.result.p_value,
                    severity: analysis.result.severity,
                });
            }
        }
        analyses.push((label.clone(), analysis));
    }

    if !affected.is_empty() {
        tracing::info!(
            variants = ?affected.iter().map(|a| a.label.as_str()).collect::<Vec<_>>(),
            "Sample ratio mismatch detected"
        );
    }

    SrmScreening {
        has_mismatch: !affected.is_empty(),
        affected,
        analyses,
    }
}
