//! Constrained re-minimization.
//!
//! The crossing search treats the inner minimizer as a black box behind the
//! one-operation [`ConstrainedReminimizer`] trait: given a state in which some
//! parameters are fixed, return the minimum over the remaining free ones.
//! [`NewtonMinimizer`] is the implementation shipped with the crate.

pub mod config;
pub mod convergence;
pub mod minimum;
pub mod newton;

pub use config::MinimizerConfig;
pub use convergence::{ConvergenceCriteria, ConvergenceStatus};
pub use minimum::FunctionMinimum;
pub use newton::NewtonMinimizer;

use crate::error::Result;
use crate::objective::Objective;
use crate::parameters::ParameterState;

/// Minimizes an objective over the free parameters of a state.
pub trait ConstrainedReminimizer {
    /// Minimize `objective` over the free parameters of `state`, starting from
    /// the state's values and using at most `max_calls` objective evaluations.
    ///
    /// Running out of budget or failing to converge is reported through the
    /// returned minimum's status; `Err` is for evaluation failures and
    /// malformed input.
    fn reminimize(
        &self,
        objective: &dyn Objective,
        state: &ParameterState,
        max_calls: usize,
    ) -> Result<FunctionMinimum>;
}

impl<T: ConstrainedReminimizer + ?Sized> ConstrainedReminimizer for &T {
    fn reminimize(
        &self,
        objective: &dyn Objective,
        state: &ParameterState,
        max_calls: usize,
    ) -> Result<FunctionMinimum> {
        (**self).reminimize(objective, state, max_calls)
    }
}
