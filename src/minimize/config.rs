//! Configuration options for the damped Newton minimizer.

use serde::{Deserialize, Serialize};

/// Configuration options for [`super::NewtonMinimizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimizerConfig {
    /// Maximum number of Newton iterations. Default: 200
    pub max_iterations: usize,

    /// Relative tolerance for change in objective value. Default: 1e-12
    pub ftol: f64,

    /// Relative tolerance for change in parameter values. Default: 1e-10
    pub xtol: f64,

    /// Estimated distance to minimum, in units of `up`, below which the
    /// minimization is converged. Default: 1e-8
    pub edm_tolerance: f64,

    /// Initial value for the damping parameter. Default: 1e-3
    pub initial_lambda: f64,

    /// Factor by which to increase lambda after a rejected step. Default: 10.0
    pub lambda_up_factor: f64,

    /// Factor by which to decrease lambda after an accepted step. Default: 0.1
    pub lambda_down_factor: f64,

    /// Minimum value for lambda. Default: 1e-12
    pub min_lambda: f64,

    /// Maximum value for lambda. Default: 1e10
    pub max_lambda: f64,

    /// Relative step for the finite-difference gradient and Hessian. Default: 1e-4
    pub fd_epsilon: f64,
}

impl Default for MinimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: 1e-12,
            xtol: 1e-10,
            edm_tolerance: 1e-8,
            initial_lambda: 1e-3,
            lambda_up_factor: 10.0,
            lambda_down_factor: 0.1,
            min_lambda: 1e-12,
            max_lambda: 1e10,
            fd_epsilon: crate::utils::finite_difference::DEFAULT_EPSILON,
        }
    }
}
