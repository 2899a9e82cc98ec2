// Scenario tests for Bayesian win-probability estimation
//
// Monte Carlo estimates carry a standard error of at most 0.005 at 10,000
// draws; assertions on that path use seeded RNGs and tolerances of several
// standard errors.

use super::*;
use crate::sample::BinomialSample;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn estimate_seeded(control: (u64, u64), variant: (u64, u64), seed: u64) -> BayesianEstimate {
    BayesianEstimator::default().estimate_with_rng(
        &BinomialSample::new(control.0, control.1),
        &BinomialSample::new(variant.0, variant.1),
        &mut StdRng::seed_from_u64(seed),
    )
}

/// Checkout redesign with a clear lift on a large sample
///
/// Expected: strong evidence for the variant, favorable on a primary metric
#[test]
fn test_checkout_redesign_clear_winner() {
    let estimate = estimate_seeded((20_000, 1_000), (20_000, 1_150), 1);

    assert_eq!(estimate.method, EstimationMethod::NormalApproximation);
    assert!(estimate.probability > 0.99);
    assert_eq!(classify(estimate.probability, true), CellClass::Favorable);
    assert_eq!(classify(estimate.probability, false), CellClass::Favorable);
}

/// Banner change with a tiny difference in conversions
///
/// Expected: no signal either way, no highlighting
#[test]
fn test_banner_change_no_signal() {
    let estimate = estimate_seeded((10_000, 500), (10_000, 503), 2);

    assert!(estimate.probability > 0.4 && estimate.probability < 0.65);
    assert_eq!(classify(estimate.probability, true), CellClass::None);
}

/// Variant hurts the metric
///
/// Expected: probability near zero, unfavorable
#[test]
fn test_harmful_variant_is_unfavorable() {
    let estimate = estimate_seeded((8_000, 800), (8_000, 600), 3);

    assert!(estimate.probability < 0.001);
    assert_eq!(classify(estimate.probability, true), CellClass::Unfavorable);
}

/// Normal path: swapping arms complements the probability to float rounding
#[test]
fn test_normal_path_symmetry_is_exact() {
    let cases = [
        ((1000, 100), (1000, 115)),
        ((31, 3), (45, 9)),
        ((5000, 4999), (4000, 3999)),
        ((250, 0), (300, 2)),
    ];
    for (a, b) in cases {
        let forward = estimate_seeded(a, b, 0).probability;
        let backward = estimate_seeded(b, a, 0).probability;
        assert!(
            (forward + backward - 1.0).abs() < 1e-12,
            "{a:?} vs {b:?}: {forward} + {backward}"
        );
    }
}

/// Monte Carlo path: swapping arms complements the probability within
/// sampling tolerance
#[test]
fn test_monte_carlo_symmetry_within_tolerance() {
    let cases = [((20, 3), (25, 8)), ((10, 1), (12, 2)), ((30, 10), (500, 100))];
    for (seed, (a, b)) in cases.into_iter().enumerate() {
        let forward = estimate_seeded(a, b, seed as u64);
        let backward = estimate_seeded(b, a, seed as u64 + 100);
        assert_eq!(forward.method, EstimationMethod::MonteCarlo);
        assert!(
            (forward.probability + backward.probability - 1.0).abs() < 0.03,
            "{a:?} vs {b:?}: {} + {}",
            forward.probability,
            backward.probability
        );
    }
}

/// Identical small arms sit at 0.5 within sampling tolerance
#[test]
fn test_identical_small_arms_near_neutral() {
    for seed in 0..5 {
        let estimate = estimate_seeded((15, 4), (15, 4), seed);
        assert!((estimate.probability - 0.5).abs() < 0.03);
    }
}

/// Monte Carlo and normal paths agree where both are reasonable
///
/// Forcing the Monte Carlo path on a mid-sized sample should land within a
/// few standard errors of the Gaussian answer.
#[test]
fn test_monte_carlo_agrees_with_normal_approximation() {
    let control = BinomialSample::new(200, 40);
    let variant = BinomialSample::new(200, 50);

    let normal = BayesianEstimator::default().estimate(&control, &variant);
    let forced_mc = BayesianEstimator::new(BayesianConfig {
        normal_approximation_threshold: u64::MAX,
        ..BayesianConfig::default()
    })
    .estimate_with_rng(&control, &variant, &mut StdRng::seed_from_u64(9));

    assert_eq!(normal.method, EstimationMethod::NormalApproximation);
    assert_eq!(forced_mc.method, EstimationMethod::MonteCarlo);
    assert!((normal.probability - forced_mc.probability).abs() < 0.03);
}

/// Zero conversions on both large arms: variance is positive, means equal
#[test]
fn test_zero_conversion_arms() {
    let estimate = estimate_seeded((1000, 0), (1000, 0), 4);
    assert_eq!(estimate.probability, 0.5);
}

/// Lowering the threshold moves small samples onto the normal path
#[test]
fn test_custom_threshold() {
    let estimator = BayesianEstimator::new(BayesianConfig {
        normal_approximation_threshold: 5,
        ..BayesianConfig::default()
    });
    let estimate = estimator.estimate(&BinomialSample::new(10, 2), &BinomialSample::new(10, 2));
    assert_eq!(estimate.method, EstimationMethod::NormalApproximation);
    assert_eq!(estimate.probability, 0.5);
}
