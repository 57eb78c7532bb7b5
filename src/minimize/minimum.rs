//! The result of a (constrained) minimization.

use ndarray::Array2;
use std::fmt;

use super::convergence::ConvergenceStatus;
use crate::parameters::ParameterState;

/// A local minimum found by a minimizer.
///
/// `state` holds the parameter values at the minimum, with the errors of the
/// free parameters updated from the covariance when one was computed. The
/// covariance is indexed by position among the free parameters of `state`.
#[derive(Debug, Clone)]
pub struct FunctionMinimum {
    /// Parameters at the minimum
    pub state: ParameterState,

    /// Objective value at the minimum
    pub fval: f64,

    /// Estimated distance to the minimum at termination
    pub edm: f64,

    /// Number of objective evaluations consumed
    pub nfcn: usize,

    /// Number of iterations performed
    pub iterations: usize,

    /// Why the minimization stopped
    pub status: ConvergenceStatus,

    /// Error matrix of the free parameters, `2·up·H⁻¹`
    pub covariance: Option<Array2<f64>>,
}

impl FunctionMinimum {
    /// A minimum is valid when the minimizer converged to a finite value.
    pub fn is_valid(&self) -> bool {
        self.status.is_converged() && self.fval.is_finite()
    }

    /// True if the call budget ran out before convergence.
    pub fn reached_call_limit(&self) -> bool {
        self.status == ConvergenceStatus::CallLimitReached
    }

    /// Position of parameter `index` among the free parameters, i.e. its
    /// row in the covariance matrix.
    pub fn covariance_index(&self, index: usize) -> Option<usize> {
        self.state.free_indices().iter().position(|&i| i == index)
    }
}

impl fmt::Display for FunctionMinimum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Function minimum:")?;
        writeln!(f, "  Valid: {}", self.is_valid())?;
        writeln!(f, "  Status: {}", self.status.description())?;
        writeln!(f, "  Fval: {:.6e}", self.fval)?;
        writeln!(f, "  Edm: {:.2e}", self.edm)?;
        writeln!(f, "  Function calls: {}", self.nfcn)?;
        for param in self.state.iter() {
            writeln!(
                f,
                "  {:>12} = {:.6e} +/- {:.3e}{}",
                param.name(),
                param.value(),
                param.error(),
                if param.vary() { "" } else { " (fixed)" }
            )?;
        }
        Ok(())
    }
}
