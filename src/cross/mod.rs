//! # Function crossing
//!
//! Given a minimum `fmin` of an objective and a target increase `delta`, find
//! where the profile of the objective along a line through the minimum
//! reaches `fmin + delta`. The profile at each trial point is obtained by
//! fixing the moved parameters and re-minimizing over the rest through a
//! [`ConstrainedReminimizer`](crate::minimize::ConstrainedReminimizer).
//!
//! - [`FunctionCross`]: the solver
//! - [`CrossingRequest`] / [`CrossingResult`]: its input and output
//! - [`ParabolicExtrapolator`]: proposes trial points from the last three
//! - [`Strategy`]: tolerance, iteration and call budgets

pub mod extrapolator;
pub mod history;
pub mod request;
pub mod solver;
pub mod strategy;

pub use extrapolator::ParabolicExtrapolator;
pub use history::{TrialHistory, TrialPoint, HISTORY_CAPACITY};
pub use request::{CrossingRequest, CrossingResult, CrossingStatus};
pub use solver::FunctionCross;
pub use strategy::Strategy;
