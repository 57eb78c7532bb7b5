//! # MINOS errors
//!
//! Asymmetric errors from the profile of the objective: for each direction the
//! parameter is moved until the objective, re-minimized over all other free
//! parameters, has risen by `up` above the minimum.
//!
//! Before each search the other free parameters are shifted along the
//! correlation given by the error matrix, so that for a near-quadratic
//! objective the first re-minimization starts close to its answer.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cross::{CrossingRequest, CrossingResult, CrossingStatus, FunctionCross, Strategy};
use crate::error::{MinosError, Result};
use crate::minimize::{ConstrainedReminimizer, FunctionMinimum};
use crate::objective::Objective;

/// Lower and upper profile errors of one parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsymmetricError {
    /// Parameter name
    pub name: String,

    /// Parameter index in the state
    pub index: usize,

    /// Value at the minimum
    pub value: f64,

    /// Symmetric error from the error matrix
    pub parabolic_error: f64,

    /// Crossing below the minimum
    pub lower: CrossingResult,

    /// Crossing above the minimum
    pub upper: CrossingResult,
}

impl AsymmetricError {
    /// Signed lower error, `lower crossing - value` (negative).
    pub fn lower_error(&self) -> f64 {
        self.lower.value() - self.value
    }

    /// Signed upper error, `upper crossing - value` (positive).
    pub fn upper_error(&self) -> f64 {
        self.upper.value() - self.value
    }

    pub fn lower_valid(&self) -> bool {
        self.lower.converged()
    }

    pub fn upper_valid(&self) -> bool {
        self.upper.converged()
    }

    /// Both crossings were found.
    pub fn is_valid(&self) -> bool {
        self.lower_valid() && self.upper_valid()
    }

    pub fn at_lower_limit(&self) -> bool {
        self.lower.at_limit()
    }

    pub fn at_upper_limit(&self) -> bool {
        self.upper.at_limit()
    }

    /// Either search went below the minimum it started from.
    pub fn new_minimum_found(&self) -> bool {
        self.lower.new_minimum_found() || self.upper.new_minimum_found()
    }

    /// Objective calls spent on both searches.
    pub fn nfcn(&self) -> usize {
        self.lower.nfcn + self.upper.nfcn
    }
}

impl fmt::Display for AsymmetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>12} = {:.6e}  parabolic {:.3e}  lower {:+.3e} ({})  upper {:+.3e} ({})",
            self.name,
            self.value,
            self.parabolic_error,
            self.lower_error(),
            self.lower.status,
            self.upper_error(),
            self.upper.status
        )
    }
}

/// Computes MINOS errors around a minimum.
///
/// # Examples
///
/// ```
/// use minos_rs::cross::Strategy;
/// use minos_rs::minimize::NewtonMinimizer;
/// use minos_rs::objective::FnObjective;
/// use minos_rs::parameters::ParameterState;
/// use minos_rs::uncertainty::Minos;
///
/// // Steeper above the minimum than below it
/// let objective = FnObjective::new(|p: &ndarray::Array1<f64>| {
///     let x = p[0] - 1.0;
///     Ok(if x > 0.0 { 4.0 * x * x } else { x * x })
/// });
/// let mut state = ParameterState::new();
/// state.add_param("x", 0.0, 1.0).unwrap();
///
/// let minimizer = NewtonMinimizer::new();
/// let minimum = minimizer.minimize(&objective, &state, 10_000).unwrap();
///
/// let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);
/// let errors = minos.minos_error(0).unwrap();
/// assert!((errors.upper_error() - 0.5).abs() < 0.01);
/// assert!((errors.lower_error() + 1.0).abs() < 0.01);
/// ```
pub struct Minos<'a, O, R> {
    objective: O,
    minimum: &'a FunctionMinimum,
    strategy: Strategy,
    reminimizer: R,
}

impl<'a, O, R> Minos<'a, O, R>
where
    O: Objective,
    R: ConstrainedReminimizer,
{
    pub fn new(objective: O, minimum: &'a FunctionMinimum, strategy: Strategy, reminimizer: R) -> Self {
        Self {
            objective,
            minimum,
            strategy,
            reminimizer,
        }
    }

    pub fn minimum(&self) -> &FunctionMinimum {
        self.minimum
    }

    /// Objective increase for one standard error.
    pub fn up(&self) -> f64 {
        self.objective.up()
    }

    /// Crossing below the minimum at `fmin + up`.
    pub fn lower(&self, index: usize) -> Result<CrossingResult> {
        self.crossing(index, -1.0, self.objective.up())
    }

    /// Crossing above the minimum at `fmin + up`.
    pub fn upper(&self, index: usize) -> Result<CrossingResult> {
        self.crossing(index, 1.0, self.objective.up())
    }

    /// Both crossings at `fmin + up`.
    pub fn minos_error(&self, index: usize) -> Result<AsymmetricError> {
        self.minos_error_at(index, self.objective.up())
    }

    /// Both crossings at `fmin + delta`.
    pub fn minos_error_at(&self, index: usize, delta: f64) -> Result<AsymmetricError> {
        let param = self.minimum.state.parameter(index)?;
        let lower = self.crossing(index, -1.0, delta)?;
        let upper = self.crossing(index, 1.0, delta)?;

        Ok(AsymmetricError {
            name: param.name().to_string(),
            index,
            value: param.value(),
            parabolic_error: param.error(),
            lower,
            upper,
        })
    }

    /// MINOS errors of every free parameter, in state order.
    pub fn all_errors(&self) -> Result<Vec<AsymmetricError>> {
        self.minimum
            .state
            .free_indices()
            .into_iter()
            .map(|index| self.minos_error(index))
            .collect()
    }

    /// Crossing of `fmin + delta` moving parameter `index` in the direction
    /// of the sign of `direction`.
    ///
    /// # Errors
    ///
    /// Fails if the parameter does not exist or is fixed, or if `delta` is
    /// not positive.
    pub fn crossing(&self, index: usize, direction: f64, delta: f64) -> Result<CrossingResult> {
        let state = &self.minimum.state;
        let param = state.parameter(index)?;
        if !param.vary() {
            return Err(MinosError::ParameterError(format!(
                "Parameter '{}' is fixed",
                param.name()
            )));
        }
        if !(delta.is_finite() && delta > 0.0) {
            return Err(MinosError::InvalidInput(format!(
                "Target delta must be positive, got {}",
                delta
            )));
        }

        let up = self.objective.up();
        let direction = if direction < 0.0 { -1.0 } else { 1.0 };
        let value = param.value();

        // Parabolic guess for the crossing, clipped to the limits
        let guess = param.bounds().clamp(value + direction * param.error() * (delta / up).sqrt());
        let err = guess - value;

        if err.abs() <= f64::EPSILON * value.abs().max(1.0) {
            debug!("parameter '{}' already at its limit", param.name());
            return Ok(CrossingResult {
                values: vec![value],
                line_value: -1.0,
                fval: self.minimum.fval,
                status: CrossingStatus::AtLimit,
                nfcn: 0,
                iterations: 0,
                state: state.clone(),
                trials: Vec::new(),
            });
        }

        let mut start = state.clone();
        if let (Some(cov), Some(k)) = (self.minimum.covariance.as_ref(), self.minimum.covariance_index(index)) {
            let variance = cov[[k, k]];
            if variance > 0.0 {
                for (j, other) in state.free_indices().into_iter().enumerate() {
                    if other == index {
                        continue;
                    }
                    let shifted = state.value(other)? + cov[[j, k]] / variance * err;
                    let bounds = *state.parameter(other)?.bounds();
                    start.set_value(other, bounds.clamp(shifted))?;
                }
            }
        }

        let request = CrossingRequest::single(
            index,
            direction,
            err.abs(),
            delta,
            self.strategy.call_budget(state.n_free()),
        );

        debug!(
            "minos on '{}': direction {:+}, first trial {:.6e}, delta {}",
            param.name(),
            direction,
            guess,
            delta
        );

        FunctionCross::new(
            &self.objective,
            &start,
            self.minimum.fval,
            self.strategy.clone(),
            &self.reminimizer,
        )
        .solve(&request)
    }
}
