//! Convergence criteria for the damped Newton minimizer.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Possible convergence states of a minimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    /// The algorithm is still running.
    Running,

    /// Nothing to minimize: every parameter is fixed.
    NoFreeParameters,

    /// The estimated distance to the minimum dropped below tolerance.
    EdmConvergence,

    /// The algorithm has converged due to a small parameter change.
    ParameterConvergence,

    /// The algorithm has converged due to a small function value change.
    FunctionValueConvergence,

    /// The algorithm has terminated due to reaching the maximum number of iterations.
    MaxIterationsReached,

    /// The function-call budget ran out.
    CallLimitReached,

    /// The algorithm has terminated due to a numerical error.
    NumericalError,
}

impl ConvergenceStatus {
    /// Returns true if the minimization has terminated (either converged or failed).
    pub fn is_terminated(&self) -> bool {
        !matches!(self, ConvergenceStatus::Running)
    }

    /// Returns true if the minimization has converged.
    pub fn is_converged(&self) -> bool {
        matches!(
            self,
            ConvergenceStatus::NoFreeParameters
                | ConvergenceStatus::EdmConvergence
                | ConvergenceStatus::ParameterConvergence
                | ConvergenceStatus::FunctionValueConvergence
        )
    }

    /// Returns a description of the convergence status.
    pub fn description(&self) -> &'static str {
        match self {
            ConvergenceStatus::Running => "Minimization is still running",
            ConvergenceStatus::NoFreeParameters => "Converged: no free parameters",
            ConvergenceStatus::EdmConvergence => "Converged: small estimated distance to minimum",
            ConvergenceStatus::ParameterConvergence => "Converged: small parameter change",
            ConvergenceStatus::FunctionValueConvergence => "Converged: small function value change",
            ConvergenceStatus::MaxIterationsReached => "Terminated: maximum iterations reached",
            ConvergenceStatus::CallLimitReached => "Terminated: function call limit reached",
            ConvergenceStatus::NumericalError => "Terminated: numerical error",
        }
    }
}

/// Criteria for deciding that an accepted step finished the minimization.
#[derive(Debug, Clone)]
pub struct ConvergenceCriteria {
    /// Tolerance for change in parameter values.
    pub xtol: f64,

    /// Tolerance for change in function value.
    pub ftol: f64,

    /// Maximum number of iterations.
    pub max_iterations: usize,
}

impl Default for ConvergenceCriteria {
    fn default() -> Self {
        Self {
            xtol: 1e-10,
            ftol: 1e-12,
            max_iterations: 200,
        }
    }
}

impl ConvergenceCriteria {
    pub fn new(xtol: f64, ftol: f64, max_iterations: usize) -> Self {
        Self {
            xtol,
            ftol,
            max_iterations,
        }
    }

    /// Relative size of a parameter step, `max_i |Δx_i| / max(|x_i|, 1)`.
    pub fn relative_step(params: &Array1<f64>, new_params: &Array1<f64>) -> f64 {
        new_params
            .iter()
            .zip(params.iter())
            .map(|(a, b)| (a - b).abs() / b.abs().max(1.0))
            .fold(0.0, f64::max)
    }

    /// Checks whether the minimization has converged after a step from
    /// `params` to `new_params`.
    pub fn check(
        &self,
        params: &Array1<f64>,
        new_params: &Array1<f64>,
        cost: f64,
        new_cost: f64,
        iterations: usize,
    ) -> ConvergenceStatus {
        if iterations >= self.max_iterations {
            return ConvergenceStatus::MaxIterationsReached;
        }

        if Self::relative_step(params, new_params) < self.xtol {
            return ConvergenceStatus::ParameterConvergence;
        }

        let cost_change = (cost - new_cost).abs() / cost.abs().max(1.0);
        if cost_change < self.ftol {
            return ConvergenceStatus::FunctionValueConvergence;
        }

        ConvergenceStatus::Running
    }
}
