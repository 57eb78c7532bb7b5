//! Precision and budget settings for the crossing search.

use serde::{Deserialize, Serialize};

use crate::error::{MinosError, Result};

/// Configuration bundle for a crossing search.
///
/// The three presets follow the usual Minuit strategy levels: `low()` trades
/// precision for fewer function calls, `high()` the reverse.
///
/// # Examples
///
/// ```
/// use minos_rs::cross::Strategy;
///
/// let strategy = Strategy::high().with_max_calls(5000);
/// assert_eq!(strategy.max_calls, Some(5000));
/// assert!(strategy.tolerance < Strategy::default().tolerance);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strategy {
    /// Convergence tolerance on the objective, as a fraction of the target
    /// delta. Default: 0.01
    pub tolerance: f64,

    /// Maximum number of trial points per crossing. Default: 15
    pub max_iterations: usize,

    /// Relative noise floor below the minimum before a trial counts as a new
    /// minimum, scaled by `max(|fmin|, delta)`. Default: 1e-9
    pub new_minimum_tolerance: f64,

    /// Largest allowed ratio between successive trial steps. Default: 2.0
    pub step_cap_factor: f64,

    /// Number of invalid re-minimizations tolerated before giving up. Default: 2
    pub max_invalid_reminimizations: usize,

    /// Call budget per crossing used by the Minos driver when none is given.
    /// `None` derives it from the number of free parameters.
    pub max_calls: Option<usize>,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::medium()
    }
}

impl Strategy {
    /// Strategy level 0.
    pub fn low() -> Self {
        Self {
            tolerance: 0.05,
            max_iterations: 10,
            new_minimum_tolerance: 1e-9,
            step_cap_factor: 2.0,
            max_invalid_reminimizations: 1,
            max_calls: None,
        }
    }

    /// Strategy level 1.
    pub fn medium() -> Self {
        Self {
            tolerance: 0.01,
            max_iterations: 15,
            new_minimum_tolerance: 1e-9,
            step_cap_factor: 2.0,
            max_invalid_reminimizations: 2,
            max_calls: None,
        }
    }

    /// Strategy level 2.
    pub fn high() -> Self {
        Self {
            tolerance: 0.005,
            max_iterations: 30,
            new_minimum_tolerance: 1e-9,
            step_cap_factor: 2.0,
            max_invalid_reminimizations: 3,
            max_calls: None,
        }
    }

    /// Preset for a Minuit strategy level; anything above 2 maps to `high()`.
    pub fn from_level(level: u32) -> Self {
        match level {
            0 => Self::low(),
            1 => Self::medium(),
            _ => Self::high(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_new_minimum_tolerance(mut self, tolerance: f64) -> Self {
        self.new_minimum_tolerance = tolerance;
        self
    }

    pub fn with_step_cap_factor(mut self, factor: f64) -> Self {
        self.step_cap_factor = factor;
        self
    }

    pub fn with_max_invalid_reminimizations(mut self, count: usize) -> Self {
        self.max_invalid_reminimizations = count;
        self
    }

    pub fn with_max_calls(mut self, max_calls: usize) -> Self {
        self.max_calls = Some(max_calls);
        self
    }

    /// Reject settings the search cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(MinosError::InvalidInput(format!(
                "Strategy tolerance must be in (0, 1), got {}",
                self.tolerance
            )));
        }
        if !(self.step_cap_factor.is_finite() && self.step_cap_factor > 0.0) {
            return Err(MinosError::InvalidInput(format!(
                "Step cap factor must be positive, got {}",
                self.step_cap_factor
            )));
        }
        if !(self.new_minimum_tolerance.is_finite() && self.new_minimum_tolerance >= 0.0) {
            return Err(MinosError::InvalidInput(format!(
                "New-minimum tolerance must be non-negative, got {}",
                self.new_minimum_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(MinosError::InvalidInput(
                "Strategy allows no iterations".to_string(),
            ));
        }
        Ok(())
    }

    /// Call budget for a crossing over `n_free` free parameters.
    ///
    /// An explicit `max_calls` wins; otherwise `2·(n+1)·(200 + 100n + 5n²)`.
    pub fn call_budget(&self, n_free: usize) -> usize {
        self.max_calls
            .unwrap_or_else(|| 2 * (n_free + 1) * (200 + 100 * n_free + 5 * n_free * n_free))
    }
}
