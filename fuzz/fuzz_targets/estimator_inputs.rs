#![no_main]

use abstat::bayesian::{BayesianConfig, BayesianEstimator};
use abstat::srm::SrmDetector;
use abstat::BinomialSample;
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::SeedableRng;

fuzz_target!(|input: (BinomialSample, BinomialSample, u64)| {
    let (control, variant, seed) = input;

    let estimator = BayesianEstimator::new(BayesianConfig {
        monte_carlo_samples: 64,
        ..BayesianConfig::default()
    });
    let mut rng = StdRng::seed_from_u64(seed);

    // Any counts, on either path, must give a probability
    let estimate = estimator.estimate_with_rng(&control, &variant, &mut rng);
    assert!((0.0..=1.0).contains(&estimate.probability));

    let analysis = SrmDetector::default().analyze(control.visits, variant.visits);
    assert!((0.0..=1.0).contains(&analysis.result.p_value));
});
