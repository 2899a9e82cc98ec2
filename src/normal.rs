//! Standard normal distribution helpers
//!
//! Both the Bayesian normal approximation and the SRM p-value go through
//! this one routine. The error function uses the Abramowitz & Stegun 7.1.26
//! rational approximation (|ε| ≤ 1.5e-7).
//!
//! # References
//!
//! Abramowitz, M., & Stegun, I. A. (1964). Handbook of Mathematical Functions.
//! National Bureau of Standards, formula 7.1.26.

const A1: f64 = 0.254829592;
const A2: f64 = -0.284496736;
const A3: f64 = 1.421413741;
const A4: f64 = -1.453152027;
const A5: f64 = 1.061405429;
const P: f64 = 0.3275911;

/// Complementary error function for x ≥ 0 (A&S 7.1.26 tail form)
fn erfc_nonnegative(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    poly * (-x * x).exp()
}

/// Error function
///
/// `erf(0)` is exactly zero and `erf(-x) == -erf(x)`.
pub fn erf(x: f64) -> f64 {
    let y = 1.0 - erfc_nonnegative(x.abs());
    if x >= 0.0 {
        y
    } else {
        -y
    }
}

/// Complementary error function, `1 - erf(x)`, without cancellation in the
/// upper tail
pub fn erfc(x: f64) -> f64 {
    if x >= 0.0 {
        erfc_nonnegative(x)
    } else {
        2.0 - erfc_nonnegative(-x)
    }
}

/// Standard normal CDF, Φ(z)
///
/// `normal_cdf(0.0)` is exactly 0.5.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

/// Standard normal survival function, 1 - Φ(z)
pub fn normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / std::f64::consts::SQRT_2)
}
