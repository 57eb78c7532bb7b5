//! Objective function definitions.
//!
//! The crossing search only needs two things from the function it studies:
//! its value on a full parameter vector and the `up` scale (the increase over
//! the minimum that defines one standard error, 1.0 for a chi-square and 0.5
//! for a negative log-likelihood).
//!
//! Least-squares problems are supported through the [`Problem`] trait and the
//! [`ChiSquare`] adapter.

use crate::error::{MinosError, Result};
use ndarray::Array1;

/// A scalar objective, lower is better.
pub trait Objective {
    /// Evaluate the objective on the full parameter vector.
    fn eval(&self, params: &Array1<f64>) -> Result<f64>;

    /// The objective increase corresponding to one standard error.
    fn up(&self) -> f64 {
        1.0
    }
}

impl<T: Objective + ?Sized> Objective for &T {
    fn eval(&self, params: &Array1<f64>) -> Result<f64> {
        (**self).eval(params)
    }

    fn up(&self) -> f64 {
        (**self).up()
    }
}

/// An objective backed by a closure.
///
/// # Examples
///
/// ```
/// use minos_rs::objective::{FnObjective, Objective};
/// use ndarray::array;
///
/// let nll = FnObjective::with_up(|p: &ndarray::Array1<f64>| Ok((p[0] - 2.0).powi(2)), 0.5);
/// assert_eq!(nll.eval(&array![3.0]).unwrap(), 1.0);
/// assert_eq!(nll.up(), 0.5);
/// ```
pub struct FnObjective<F> {
    f: F,
    up: f64,
}

impl<F> FnObjective<F>
where
    F: Fn(&Array1<f64>) -> Result<f64>,
{
    /// Wrap a closure with `up = 1.0`.
    pub fn new(f: F) -> Self {
        Self { f, up: 1.0 }
    }

    /// Wrap a closure with a custom `up`.
    pub fn with_up(f: F, up: f64) -> Self {
        Self { f, up }
    }
}

impl<F> Objective for FnObjective<F>
where
    F: Fn(&Array1<f64>) -> Result<f64>,
{
    fn eval(&self, params: &Array1<f64>) -> Result<f64> {
        (self.f)(params)
    }

    fn up(&self) -> f64 {
        self.up
    }
}

/// A trait representing a nonlinear least squares problem.
pub trait Problem {
    /// Evaluate the residuals at the given parameters.
    ///
    /// For a weighted fit the residuals should already be divided by their
    /// uncertainties, so that the sum of squares is a chi-square.
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>>;

    /// Get the number of parameters in the problem.
    fn parameter_count(&self) -> usize;

    /// Get the number of residuals in the problem.
    fn residual_count(&self) -> usize;

    /// Evaluate the sum of squared residuals at the given parameters.
    fn eval_cost(&self, params: &Array1<f64>) -> Result<f64> {
        let residuals = self.eval(params)?;
        Ok(residuals.iter().map(|r| r.powi(2)).sum())
    }
}

/// Chi-square objective of a least-squares [`Problem`], with `up = 1.0`.
pub struct ChiSquare<P: Problem> {
    problem: P,
}

impl<P: Problem> ChiSquare<P> {
    pub fn new(problem: P) -> Self {
        Self { problem }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }
}

impl<P: Problem> Objective for ChiSquare<P> {
    fn eval(&self, params: &Array1<f64>) -> Result<f64> {
        let n_params = self.problem.parameter_count();
        if params.len() != n_params {
            return Err(MinosError::DimensionMismatch(format!(
                "Expected {} parameters, got {}",
                n_params,
                params.len()
            )));
        }

        let residuals = self.problem.eval(params)?;
        if residuals.len() != self.problem.residual_count() {
            return Err(MinosError::DimensionMismatch(format!(
                "Expected {} residuals, got {}",
                self.problem.residual_count(),
                residuals.len()
            )));
        }

        Ok(residuals.iter().map(|r| r.powi(2)).sum())
    }
}
