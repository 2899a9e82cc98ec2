//! abstat - Statistical inference for A/B test dashboards
//!
//! This library provides the numerical core of an experiment dashboard:
//! Bayesian win probabilities for binomial metrics, sample ratio mismatch
//! detection, traffic-light classification, and completion projections.
//! Every statistical entry point is a pure function that degrades to a
//! neutral answer instead of failing, so a dashboard never stops rendering.

pub mod bayesian;
pub mod cli;
pub mod config;
pub mod error;
pub mod experiment;
pub mod normal;
pub mod projection;
pub mod sample;
pub mod srm;

pub use bayesian::{classify, estimate_probability_variant_better, BayesianEstimator, CellClass};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, InputError};
pub use sample::BinomialSample;
pub use srm::{analyze_sample_ratio, SrmDetector};
