//! Damped Newton minimizer.
//!
//! Levenberg-Marquardt damping applied to a general scalar objective: each
//! iteration takes a finite-difference gradient `g` and Hessian `H` over the
//! free parameters and solves `(H + λ·diag(H)) δ = -g`. Accepted steps shrink
//! λ, rejected ones grow it. Bounds are enforced by projecting the trial point
//! onto the box, so a minimum on a limit is reached with a zero projected step.
//!
//! On convergence the error matrix `2·up·H⁻¹` is attached to the result and
//! the errors of the free parameters are updated from its diagonal.

use log::debug;
use ndarray::{Array1, Array2};
use std::cell::Cell;

use super::config::MinimizerConfig;
use super::convergence::{ConvergenceCriteria, ConvergenceStatus};
use super::minimum::FunctionMinimum;
use super::ConstrainedReminimizer;
use crate::error::Result;
use crate::objective::Objective;
use crate::parameters::{Bounds, ParameterState};
use crate::utils::finite_difference::{evaluation_count, gradient_and_hessian, step_size};
use crate::uncertainty::covariance::error_matrix;
use crate::utils::matrix_convert::{
    nalgebra_vec_to_ndarray, ndarray_to_nalgebra, ndarray_vec_to_nalgebra,
};

/// Evaluates the objective on free-parameter vectors and counts the calls.
struct CountingObjective<'a> {
    objective: &'a dyn Objective,
    state: &'a ParameterState,
    calls: Cell<usize>,
}

impl<'a> CountingObjective<'a> {
    fn new(objective: &'a dyn Objective, state: &'a ParameterState) -> Self {
        Self {
            objective,
            state,
            calls: Cell::new(0),
        }
    }

    fn eval_free(&self, free: &Array1<f64>) -> Result<f64> {
        self.calls.set(self.calls.get() + 1);
        let full = self.state.expand_free(free)?;
        self.objective.eval(&full)
    }

    fn calls(&self) -> usize {
        self.calls.get()
    }
}

/// The damped Newton minimizer.
#[derive(Debug, Clone, Default)]
pub struct NewtonMinimizer {
    config: MinimizerConfig,
}

impl NewtonMinimizer {
    /// Create a new minimizer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new minimizer with the given configuration.
    pub fn with_config(config: MinimizerConfig) -> Self {
        Self { config }
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the estimated-distance-to-minimum tolerance.
    pub fn with_edm_tolerance(mut self, edm_tolerance: f64) -> Self {
        self.config.edm_tolerance = edm_tolerance;
        self
    }

    /// Set the initial value for the damping parameter.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.config.initial_lambda = lambda;
        self
    }

    /// Set the relative finite-difference step.
    pub fn with_fd_epsilon(mut self, epsilon: f64) -> Self {
        self.config.fd_epsilon = epsilon;
        self
    }

    pub fn config(&self) -> &MinimizerConfig {
        &self.config
    }

    /// Minimize `objective` over the free parameters of `state`.
    ///
    /// At most `max_calls` objective evaluations are made; running out is
    /// reported as [`ConvergenceStatus::CallLimitReached`]. The reported
    /// `nfcn` counts every evaluation, failed ones included.
    ///
    /// A failed evaluation at a trial step rejects the step. A failure while
    /// taking derivatives ends the search with
    /// [`ConvergenceStatus::NumericalError`].
    ///
    /// # Errors
    ///
    /// An error from the evaluation at the starting point is propagated.
    pub fn minimize(
        &self,
        objective: &dyn Objective,
        state: &ParameterState,
        max_calls: usize,
    ) -> Result<FunctionMinimum> {
        let up = objective.up();
        let free_indices = state.free_indices();
        let n = free_indices.len();

        let mut bounds = Vec::with_capacity(n);
        let mut scales = Array1::zeros(n);
        for (k, &i) in free_indices.iter().enumerate() {
            let param = state.parameter(i)?;
            bounds.push(*param.bounds());
            scales[k] = param.error();
        }

        let counter = CountingObjective::new(objective, state);
        let mut x = project(&state.free_values(), &bounds);

        if max_calls == 0 {
            return self.finish(
                state,
                &free_indices,
                &x,
                f64::NAN,
                f64::INFINITY,
                0,
                0,
                ConvergenceStatus::CallLimitReached,
                None,
            );
        }

        let mut f = counter.eval_free(&x)?;
        if !f.is_finite() {
            return self.finish(
                state,
                &free_indices,
                &x,
                f,
                f64::INFINITY,
                counter.calls(),
                0,
                ConvergenceStatus::NumericalError,
                None,
            );
        }

        if n == 0 {
            return self.finish(
                state,
                &free_indices,
                &x,
                f,
                0.0,
                counter.calls(),
                0,
                ConvergenceStatus::NoFreeParameters,
                Some(Array2::zeros((0, 0))),
            );
        }

        let criteria = ConvergenceCriteria::new(
            self.config.xtol,
            self.config.ftol,
            self.config.max_iterations,
        );
        let mut lambda = self.config.initial_lambda;
        let mut iterations = 0;
        let mut edm = f64::INFINITY;
        let mut hessian: Option<Array2<f64>> = None;
        let mut hessian_at_x = false;

        let status = loop {
            if iterations >= self.config.max_iterations {
                break ConvergenceStatus::MaxIterationsReached;
            }
            if counter.calls() + evaluation_count(n) > max_calls {
                break ConvergenceStatus::CallLimitReached;
            }

            let steps: Array1<f64> = (0..n)
                .map(|k| step_size(x[k], scales[k], self.config.fd_epsilon))
                .collect();
            let (g, h) = match gradient_and_hessian(|p| counter.eval_free(p), &x, f, &steps) {
                Ok(derivatives) => derivatives,
                Err(err) => {
                    debug!("newton derivatives failed after {} calls: {}", counter.calls(), err);
                    hessian = None;
                    break ConvergenceStatus::NumericalError;
                }
            };

            edm = estimated_distance(&g, &h);
            hessian = Some(h.clone());
            hessian_at_x = true;
            debug!(
                "newton iteration {}: f = {:.10e}, edm = {:.3e}, lambda = {:.1e}, calls = {}",
                iterations,
                f,
                edm,
                lambda,
                counter.calls()
            );

            if edm < self.config.edm_tolerance * up {
                break ConvergenceStatus::EdmConvergence;
            }
            iterations += 1;

            // Inner loop: grow lambda until a step lowers the objective
            let outcome = loop {
                let delta = match damped_step(&g, &h, lambda) {
                    Some(delta) => delta,
                    None => {
                        lambda *= self.config.lambda_up_factor;
                        if lambda > self.config.max_lambda {
                            break Err(ConvergenceStatus::NumericalError);
                        }
                        continue;
                    }
                };

                let x_new = project(&(&x + &delta), &bounds);
                if ConvergenceCriteria::relative_step(&x, &x_new) < self.config.xtol {
                    break Err(ConvergenceStatus::ParameterConvergence);
                }
                if counter.calls() >= max_calls {
                    break Err(ConvergenceStatus::CallLimitReached);
                }

                // A failed evaluation is a rejected step
                let f_new = counter.eval_free(&x_new).unwrap_or(f64::NAN);
                if f_new.is_finite() && f_new < f {
                    lambda = (lambda * self.config.lambda_down_factor).max(self.config.min_lambda);
                    break Ok((x_new, f_new));
                }

                lambda *= self.config.lambda_up_factor;
                if lambda > self.config.max_lambda {
                    break Err(ConvergenceStatus::NumericalError);
                }
            };

            match outcome {
                Ok((x_new, f_new)) => {
                    let status = criteria.check(&x, &x_new, f, f_new, iterations);
                    x = x_new;
                    f = f_new;
                    hessian_at_x = false;
                    if status.is_terminated() {
                        break status;
                    }
                }
                Err(status) => break status,
            }
        };

        debug!(
            "newton finished: {} after {} iterations, f = {:.10e}, calls = {}",
            status.description(),
            iterations,
            f,
            counter.calls()
        );

        // The error matrix must belong to the returned point
        if !hessian_at_x && hessian.is_some() {
            hessian = None;
            if counter.calls() + evaluation_count(n) <= max_calls {
                let steps: Array1<f64> = (0..n)
                    .map(|k| step_size(x[k], scales[k], self.config.fd_epsilon))
                    .collect();
                if let Ok((g, h)) = gradient_and_hessian(|p| counter.eval_free(p), &x, f, &steps) {
                    edm = estimated_distance(&g, &h);
                    hessian = Some(h);
                }
            }
        }
        let covariance = hessian.as_ref().and_then(|h| error_matrix(h, up).ok());

        self.finish(
            state,
            &free_indices,
            &x,
            f,
            edm,
            counter.calls(),
            iterations,
            status,
            covariance,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        state: &ParameterState,
        free_indices: &[usize],
        x: &Array1<f64>,
        fval: f64,
        edm: f64,
        nfcn: usize,
        iterations: usize,
        status: ConvergenceStatus,
        covariance: Option<Array2<f64>>,
    ) -> Result<FunctionMinimum> {
        let mut result_state = state.clone();
        result_state.set_free_values(x)?;

        if let Some(cov) = covariance.as_ref() {
            for (k, &i) in free_indices.iter().enumerate() {
                let variance = cov[[k, k]];
                if variance.is_finite() && variance > 0.0 {
                    result_state.set_error(i, variance.sqrt())?;
                }
            }
        }

        Ok(FunctionMinimum {
            state: result_state,
            fval,
            edm,
            nfcn,
            iterations,
            status,
            covariance,
        })
    }
}

impl ConstrainedReminimizer for NewtonMinimizer {
    fn reminimize(
        &self,
        objective: &dyn Objective,
        state: &ParameterState,
        max_calls: usize,
    ) -> Result<FunctionMinimum> {
        self.minimize(objective, state, max_calls)
    }
}

/// Project a point onto the box defined by the bounds.
fn project(x: &Array1<f64>, bounds: &[Bounds]) -> Array1<f64> {
    x.iter()
        .zip(bounds)
        .map(|(&value, b)| b.clamp(value))
        .collect()
}

/// `0.5·gᵀH⁻¹g`, or infinity if `H` is not positive definite.
fn estimated_distance(g: &Array1<f64>, h: &Array2<f64>) -> f64 {
    let chol = match ndarray_to_nalgebra(h).cholesky() {
        Some(chol) => chol,
        None => return f64::INFINITY,
    };
    let g_vec = ndarray_vec_to_nalgebra(g);
    let v = chol.solve(&g_vec);
    0.5 * g_vec.dot(&v)
}

/// Solve `(H + λ·D) δ = -g` with `D` the (floored) absolute Hessian diagonal.
fn damped_step(g: &Array1<f64>, h: &Array2<f64>, lambda: f64) -> Option<Array1<f64>> {
    let n = g.len();
    let max_diag = h.diag().iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let floor = max_diag * 1e-8 + 1e-12;

    let mut a = h.clone();
    for k in 0..n {
        a[[k, k]] += lambda * h[[k, k]].abs().max(floor);
    }

    let chol = ndarray_to_nalgebra(&a).cholesky()?;
    let rhs = ndarray_vec_to_nalgebra(&g.mapv(|v| -v));
    let delta = nalgebra_vec_to_ndarray(&chol.solve(&rhs));

    if delta.iter().all(|v| v.is_finite()) {
        Some(delta)
    } else {
        None
    }
}
