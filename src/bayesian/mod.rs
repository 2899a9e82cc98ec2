// Bayesian win-probability estimation for A/B tests
//
// Control and variant conversion rates are modelled with the Beta-Binomial
// conjugate pair under a uniform Beta(1,1) prior. The estimator answers
// P(variant rate > control rate):
//
// - Both arms above the normal-approximation threshold: each posterior is
//   replaced by a Gaussian with matching mean and variance, and the answer
//   is Φ(mean difference / combined standard deviation).
// - Otherwise: Monte Carlo over paired posterior draws.
//
// The classifier turns a probability into the traffic-light category a
// dashboard cell is rendered with.

mod classify;
mod config;
mod estimator;
mod posterior;

pub use classify::{classify, CellClass, ClassificationThresholds, MetricRole};
pub use config::{
    BayesianConfig, DEFAULT_MONTE_CARLO_SAMPLES, DEFAULT_NORMAL_APPROXIMATION_THRESHOLD,
};
pub use estimator::{
    estimate_probability_variant_better, BayesianEstimate, BayesianEstimator, EstimationMethod,
    NEUTRAL_PROBABILITY,
};
pub use posterior::BetaPosterior;

#[cfg(test)]
mod tests;
