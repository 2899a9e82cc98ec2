// Beta posteriors under a uniform Beta(1,1) prior

use crate::sample::BinomialSample;
use rand::Rng;
use rand_distr::{Distribution, Gamma};

/// Largest shape drawn as an explicit sum of Exp(1) variates
///
/// Arms on the Monte Carlo path have at most a few dozen visits, so their
/// shapes stay below this. Larger shapes come from `rand_distr::Gamma`,
/// which costs the same per draw whatever the shape.
pub const ERLANG_MAX_SHAPE: f64 = 64.0;

/// Beta(alpha, beta) posterior for one arm's conversion rate
///
/// Shapes are whole numbers (the prior is Beta(1,1) and observations are
/// counts) but are stored as `f64` so any `u64` count converts without
/// overflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaPosterior {
    pub alpha: f64,
    pub beta: f64,
}

impl BetaPosterior {
    /// Update the uniform prior with an observed sample
    ///
    /// The sample must already be validated.
    pub fn from_sample(sample: &BinomialSample) -> Self {
        Self {
            alpha: 1.0 + sample.conversions as f64,
            beta: 1.0 + sample.failures() as f64,
        }
    }

    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    pub fn variance(&self) -> f64 {
        let sum = self.alpha + self.beta;
        (self.alpha * self.beta) / (sum * sum * (sum + 1.0))
    }

    /// Draw one value as `X / (X + Y)` with `X ~ Gamma(alpha, 1)` and
    /// `Y ~ Gamma(beta, 1)`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let x = gamma(self.alpha, rng);
        let y = gamma(self.beta, rng);
        x / (x + y)
    }
}

/// Gamma(shape, 1) draw for a whole-number shape ≥ 1
fn gamma<R: Rng + ?Sized>(shape: f64, rng: &mut R) -> f64 {
    if shape <= ERLANG_MAX_SHAPE {
        return erlang(shape as u64, rng);
    }
    match Gamma::new(shape, 1.0) {
        Ok(distribution) => distribution.sample(rng),
        // Unreachable for finite shapes above the cutoff
        Err(_) => shape,
    }
}

/// Sum of `shape` independent Exp(1) draws
fn erlang<R: Rng + ?Sized>(shape: u64, rng: &mut R) -> f64 {
    (0..shape).map(|_| exponential(rng)).sum()
}

/// Exp(1) via `-ln(U)`, `U` in (0, 1] so the log is finite
fn exponential<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u = 1.0 - rng.gen::<f64>();
    -u.ln()
}
