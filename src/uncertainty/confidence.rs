//! # Confidence Interval Calculations
//!
//! Profile-likelihood confidence intervals: the `n`-sigma interval of a
//! parameter is bounded by the crossings of `fmin + up·n²`, each found with a
//! full re-minimization of the other parameters.

use serde::{Deserialize, Serialize};

use super::minos::Minos;
use crate::error::{MinosError, Result};
use crate::minimize::ConstrainedReminimizer;
use crate::objective::Objective;

/// A confidence interval for one parameter at one sigma level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Number of standard deviations
    pub sigma: f64,
    /// The probability level (e.g., 0.6827 for 1-sigma)
    pub probability: f64,
    /// The lower bound of the confidence interval
    pub lower: f64,
    /// The upper bound of the confidence interval
    pub upper: f64,
    /// Whether the lower crossing converged (a limit or failure otherwise)
    pub lower_valid: bool,
    /// Whether the upper crossing converged
    pub upper_valid: bool,
}

/// Profile confidence intervals of parameter `index` at each sigma level.
///
/// # Errors
///
/// Fails on a non-positive sigma or if the crossing searches cannot be set
/// up (unknown or fixed parameter).
pub fn profile_confidence_intervals<O, R>(
    minos: &Minos<'_, O, R>,
    index: usize,
    sigmas: &[f64],
) -> Result<Vec<ConfidenceInterval>>
where
    O: Objective,
    R: ConstrainedReminimizer,
{
    sigmas
        .iter()
        .map(|&sigma| {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(MinosError::InvalidInput(format!(
                    "Sigma level must be positive, got {}",
                    sigma
                )));
            }

            let errors = minos.minos_error_at(index, minos.up() * sigma * sigma)?;
            Ok(ConfidenceInterval {
                sigma,
                probability: sigma_to_probability(sigma),
                lower: errors.lower.value(),
                upper: errors.upper.value(),
                lower_valid: errors.lower_valid(),
                upper_valid: errors.upper_valid(),
            })
        })
        .collect()
}

/// Convert sigma levels to probability values.
///
/// Two-sided coverage of a normal distribution: 1-sigma corresponds to 68.27%.
pub fn sigma_to_probability(sigma: f64) -> f64 {
    approximate_erf(sigma / std::f64::consts::SQRT_2)
}

/// Convert probability values to sigma levels, the inverse of
/// [`sigma_to_probability`]. Returns NaN outside `[0, 1)`.
pub fn probability_to_sigma(prob: f64) -> f64 {
    if !(0.0..1.0).contains(&prob) {
        return f64::NAN;
    }

    // sigma_to_probability is monotone; bisect on [0, 40]
    let (mut lo, mut hi) = (0.0_f64, 40.0_f64);
    for _ in 0..100 {
        let mid = 0.5 * (lo + hi);
        if sigma_to_probability(mid) < prob {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Approximate error function (erf).
///
/// Abramowitz and Stegun, formula 7.1.26; absolute error below 1.5e-7.
fn approximate_erf(x: f64) -> f64 {
    let x_abs = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x_abs);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    let result = 1.0 - poly * (-x_abs * x_abs).exp();

    if x < 0.0 {
        -result
    } else {
        result
    }
}
