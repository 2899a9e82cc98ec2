// Bayesian probability that a variant's conversion rate beats control's
//
// Control and variant rates get Beta posteriors under a uniform prior.
// Large samples use a Gaussian approximation of the posterior difference;
// small samples fall back to Monte Carlo over paired posterior draws.
//
// Invalid input never produces an error: the estimator answers 0.5
// ("no information") so a dashboard can keep rendering.

use crate::bayesian::config::BayesianConfig;
use crate::bayesian::posterior::BetaPosterior;
use crate::normal::normal_cdf;
use crate::sample::BinomialSample;
use rand::Rng;
use serde::Serialize;

/// Probability returned when the data carries no information
pub const NEUTRAL_PROBABILITY: f64 = 0.5;

/// Which computation produced an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    /// Closed-form Gaussian approximation of the posterior difference
    NormalApproximation,
    /// Fraction of paired posterior draws where the variant wins
    MonteCarlo,
    /// Inputs were unusable; the neutral probability was returned
    Fallback,
}

impl EstimationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimationMethod::NormalApproximation => "normal approximation",
            EstimationMethod::MonteCarlo => "monte carlo",
            EstimationMethod::Fallback => "fallback",
        }
    }
}

/// Win probability together with the method that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BayesianEstimate {
    /// P(variant rate > control rate), in [0, 1]
    pub probability: f64,
    pub method: EstimationMethod,
}

impl BayesianEstimate {
    fn fallback() -> Self {
        Self {
            probability: NEUTRAL_PROBABILITY,
            method: EstimationMethod::Fallback,
        }
    }
}

/// Beta-Binomial win-probability estimator
///
/// # Example
/// ```
/// use abstat::bayesian::{BayesianEstimator, EstimationMethod};
/// use abstat::BinomialSample;
///
/// let estimator = BayesianEstimator::default();
/// let estimate = estimator.estimate(
///     &BinomialSample::new(1000, 100),
///     &BinomialSample::new(1000, 130),
/// );
/// assert_eq!(estimate.method, EstimationMethod::NormalApproximation);
/// assert!(estimate.probability > 0.95);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BayesianEstimator {
    config: BayesianConfig,
}

impl BayesianEstimator {
    pub fn new(config: BayesianConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BayesianConfig {
        &self.config
    }

    /// Estimate using the thread-local system RNG for the Monte Carlo path
    pub fn estimate(&self, control: &BinomialSample, variant: &BinomialSample) -> BayesianEstimate {
        self.estimate_with_rng(control, variant, &mut rand::thread_rng())
    }

    /// Estimate with a caller-supplied random source
    ///
    /// Only the Monte Carlo path consumes randomness; seeding `rng` makes
    /// results reproducible.
    pub fn estimate_with_rng<R: Rng + ?Sized>(
        &self,
        control: &BinomialSample,
        variant: &BinomialSample,
        rng: &mut R,
    ) -> BayesianEstimate {
        if let Err(e) = control.validate().and_then(|_| variant.validate()) {
            tracing::warn!(
                control_visits = control.visits,
                control_conversions = control.conversions,
                variant_visits = variant.visits,
                variant_conversions = variant.conversions,
                "Invalid Bayesian inputs: {}",
                e
            );
            return BayesianEstimate::fallback();
        }

        let control_posterior = BetaPosterior::from_sample(control);
        let variant_posterior = BetaPosterior::from_sample(variant);

        if self.uses_normal_approximation(control, variant) {
            tracing::debug!(
                control_visits = control.visits,
                variant_visits = variant.visits,
                "Using normal approximation"
            );
            BayesianEstimate {
                probability: normal_approximation(&control_posterior, &variant_posterior),
                method: EstimationMethod::NormalApproximation,
            }
        } else {
            tracing::debug!(
                control_visits = control.visits,
                variant_visits = variant.visits,
                samples = self.config.monte_carlo_samples,
                "Using Monte Carlo simulation"
            );
            BayesianEstimate {
                probability: monte_carlo(
                    &control_posterior,
                    &variant_posterior,
                    self.config.monte_carlo_samples,
                    rng,
                ),
                method: EstimationMethod::MonteCarlo,
            }
        }
    }

    /// True iff both arms exceed the normal-approximation threshold
    pub fn uses_normal_approximation(
        &self,
        control: &BinomialSample,
        variant: &BinomialSample,
    ) -> bool {
        let threshold = self.config.normal_approximation_threshold;
        control.visits > threshold && variant.visits > threshold
    }
}

/// Φ(mean difference / combined standard deviation)
fn normal_approximation(control: &BetaPosterior, variant: &BetaPosterior) -> f64 {
    let mean_diff = variant.mean() - control.mean();
    let std_dev = (control.variance() + variant.variance()).sqrt();

    if std_dev == 0.0 {
        return NEUTRAL_PROBABILITY;
    }

    normal_cdf(mean_diff / std_dev)
}

fn monte_carlo<R: Rng + ?Sized>(
    control: &BetaPosterior,
    variant: &BetaPosterior,
    samples: usize,
    rng: &mut R,
) -> f64 {
    if samples == 0 {
        return NEUTRAL_PROBABILITY;
    }

    let variant_wins = (0..samples)
        .filter(|_| {
            let control_draw = control.sample(rng);
            let variant_draw = variant.sample(rng);
            variant_draw > control_draw
        })
        .count();

    variant_wins as f64 / samples as f64
}

/// Probability that the variant beats control, using default configuration
///
/// Returns exactly 0.5 when either arm has no visits or more conversions
/// than visits.
///
/// # Example
/// ```
/// use abstat::estimate_probability_variant_better;
///
/// assert_eq!(estimate_probability_variant_better(0, 0, 100, 10), 0.5);
/// assert_eq!(estimate_probability_variant_better(100, 150, 100, 10), 0.5);
/// ```
pub fn estimate_probability_variant_better(
    control_visits: u64,
    control_conversions: u64,
    variant_visits: u64,
    variant_conversions: u64,
) -> f64 {
    BayesianEstimator::default()
        .estimate(
            &BinomialSample::new(control_visits, control_conversions),
            &BinomialSample::new(variant_visits, variant_conversions),
        )
        .probability
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(0x5EED)
    }

    #[test]
    fn test_invalid_inputs_return_neutral() {
        let estimator = BayesianEstimator::default();
        let cases = [
            ((0, 0), (100, 10)),
            ((100, 10), (0, 0)),
            ((100, 150), (100, 10)),
            ((100, 10), (100, 101)),
        ];
        for ((cv, cc), (vv, vc)) in cases {
            let estimate = estimator.estimate(
                &BinomialSample::new(cv, cc),
                &BinomialSample::new(vv, vc),
            );
            assert_eq!(estimate.probability, 0.5);
            assert_eq!(estimate.method, EstimationMethod::Fallback);
        }
    }

    #[test]
    fn test_normal_path_matches_closed_form() {
        let control = BinomialSample::new(1000, 100);
        let variant = BinomialSample::new(1000, 120);
        let estimate = BayesianEstimator::default().estimate(&control, &variant);

        // alpha/beta: control (101, 901), variant (121, 881)
        let (ma, mb) = (101.0 / 1002.0, 121.0 / 1002.0);
        let va = 101.0 * 901.0 / (1002.0_f64.powi(2) * 1003.0);
        let vb = 121.0 * 881.0 / (1002.0_f64.powi(2) * 1003.0);
        let expected = normal_cdf((mb - ma) / (va + vb).sqrt());

        assert_eq!(estimate.method, EstimationMethod::NormalApproximation);
        assert!((estimate.probability - expected).abs() < 1e-12);
        assert!(estimate.probability > 0.9 && estimate.probability < 0.95);
    }

    #[test]
    fn test_identical_large_arms_are_exactly_neutral() {
        let arm = BinomialSample::new(500, 50);
        let estimate = BayesianEstimator::default().estimate(&arm, &arm);
        assert_eq!(estimate.probability, 0.5);
    }

    #[test]
    fn test_threshold_boundary() {
        let estimator = BayesianEstimator::default();
        let at_31 = BinomialSample::new(31, 5);
        let at_30 = BinomialSample::new(30, 5);

        assert!(estimator.uses_normal_approximation(&at_31, &at_31));
        assert!(!estimator.uses_normal_approximation(&at_30, &at_30));
        assert!(!estimator.uses_normal_approximation(&at_31, &at_30));

        let normal = estimator.estimate_with_rng(&at_31, &at_31, &mut seeded());
        assert_eq!(normal.method, EstimationMethod::NormalApproximation);
        assert_eq!(normal.probability, 0.5);

        let mc = estimator.estimate_with_rng(&at_30, &at_30, &mut seeded());
        assert_eq!(mc.method, EstimationMethod::MonteCarlo);
        assert!((mc.probability - 0.5).abs() < 0.03);
    }

    #[test]
    fn test_monte_carlo_is_reproducible_with_seed() {
        let estimator = BayesianEstimator::default();
        let control = BinomialSample::new(20, 4);
        let variant = BinomialSample::new(25, 9);

        let first = estimator.estimate_with_rng(&control, &variant, &mut seeded());
        let second = estimator.estimate_with_rng(&control, &variant, &mut seeded());
        assert_eq!(first, second);
    }

    #[test]
    fn test_monte_carlo_resolution_follows_sample_count() {
        let estimator = BayesianEstimator::new(BayesianConfig {
            monte_carlo_samples: 4,
            ..BayesianConfig::default()
        });
        let estimate = estimator.estimate_with_rng(
            &BinomialSample::new(10, 2),
            &BinomialSample::new(10, 3),
            &mut seeded(),
        );
        assert!([0.0, 0.25, 0.5, 0.75, 1.0].contains(&estimate.probability));
    }

    #[test]
    fn test_clear_small_sample_winner() {
        let estimate = BayesianEstimator::default().estimate_with_rng(
            &BinomialSample::new(20, 1),
            &BinomialSample::new(20, 15),
            &mut seeded(),
        );
        assert_eq!(estimate.method, EstimationMethod::MonteCarlo);
        assert!(estimate.probability > 0.99);
    }

    #[test]
    fn test_extreme_counts_do_not_overflow() {
        // Every visit converted on a saturated control arm
        let p = estimate_probability_variant_better(u64::MAX, u64::MAX, 100, 10);
        assert!((0.0..1e-6).contains(&p), "p = {}", p);

        let p = estimate_probability_variant_better(100, 10, u64::MAX, u64::MAX);
        assert!(p > 1.0 - 1e-6, "p = {}", p);
    }

    #[test]
    fn test_small_arm_against_large_arm_is_fast() {
        // Monte Carlo path: the small arm is below the threshold
        let start = std::time::Instant::now();
        let estimate = BayesianEstimator::default().estimate_with_rng(
            &BinomialSample::new(30, 3),
            &BinomialSample::new(20_000, 2_000),
            &mut seeded(),
        );
        let elapsed = start.elapsed();

        assert_eq!(estimate.method, EstimationMethod::MonteCarlo);
        // P(Beta(4, 28) < ~0.1) is about 0.376
        assert!(
            estimate.probability > 0.34 && estimate.probability < 0.41,
            "p = {}",
            estimate.probability
        );
        assert!(elapsed < std::time::Duration::from_secs(5), "took {:?}", elapsed);
    }

    #[test]
    fn test_convenience_function() {
        assert_eq!(estimate_probability_variant_better(0, 0, 100, 10), 0.5);
        assert_eq!(estimate_probability_variant_better(100, 150, 100, 10), 0.5);
        let p = estimate_probability_variant_better(5000, 500, 5000, 400);
        assert!(p < 0.001);
    }
}
