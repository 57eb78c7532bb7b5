//! Inputs and outputs of a crossing search.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::history::TrialPoint;
use crate::error::{MinosError, Result};
use crate::parameters::ParameterState;

/// What to search for: which parameters move, in which direction, and the
/// objective increase to reach.
///
/// The search line is `x_i(a) = current_i + (1 + a)·directions_i·step_guesses_i`,
/// so the first trial (`a = 0`) sits one step guess away from the minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingRequest {
    /// Indices of the moved parameters
    pub indices: Vec<usize>,

    /// Sign gives the search direction, magnitude a relative weight
    pub directions: Vec<f64>,

    /// Step per parameter, typically the parabolic error
    pub step_guesses: Vec<f64>,

    /// Increase over the minimum that defines the crossing
    pub target_delta: f64,

    /// Budget of objective calls for the whole search
    pub max_calls: usize,
}

impl CrossingRequest {
    pub fn new(
        indices: Vec<usize>,
        directions: Vec<f64>,
        step_guesses: Vec<f64>,
        target_delta: f64,
        max_calls: usize,
    ) -> Self {
        Self {
            indices,
            directions,
            step_guesses,
            target_delta,
            max_calls,
        }
    }

    /// Search along one parameter; `direction` should be `+1.0` or `-1.0`.
    pub fn single(
        index: usize,
        direction: f64,
        step_guess: f64,
        target_delta: f64,
        max_calls: usize,
    ) -> Self {
        Self::new(
            vec![index],
            vec![direction],
            vec![step_guess],
            target_delta,
            max_calls,
        )
    }

    /// Check the request against the state it will be run on.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is empty or inconsistent, if a moved
    /// parameter does not exist, is fixed, or sits outside its bounds, or if a
    /// direction or step is zero or not finite.
    pub fn validate(&self, state: &ParameterState) -> Result<()> {
        if self.indices.is_empty() {
            return Err(MinosError::InvalidInput(
                "Crossing request moves no parameters".to_string(),
            ));
        }
        if self.directions.len() != self.indices.len()
            || self.step_guesses.len() != self.indices.len()
        {
            return Err(MinosError::DimensionMismatch(format!(
                "{} indices, {} directions, {} step guesses",
                self.indices.len(),
                self.directions.len(),
                self.step_guesses.len()
            )));
        }
        if !(self.target_delta.is_finite() && self.target_delta > 0.0) {
            return Err(MinosError::InvalidInput(format!(
                "Target delta must be positive, got {}",
                self.target_delta
            )));
        }
        if self.max_calls == 0 {
            return Err(MinosError::InvalidInput(
                "Call budget must be positive".to_string(),
            ));
        }

        for (k, &index) in self.indices.iter().enumerate() {
            if self.indices[..k].contains(&index) {
                return Err(MinosError::InvalidInput(format!(
                    "Parameter {} appears twice in the crossing request",
                    index
                )));
            }

            let param = state.parameter(index)?;
            if !param.vary() {
                return Err(MinosError::ParameterError(format!(
                    "Parameter '{}' is fixed and cannot be scanned",
                    param.name()
                )));
            }
            param.bounds().check(param.value())?;

            let (direction, step) = (self.directions[k], self.step_guesses[k]);
            if !(direction.is_finite() && direction != 0.0) {
                return Err(MinosError::InvalidInput(format!(
                    "Direction for '{}' must be finite and non-zero, got {}",
                    param.name(),
                    direction
                )));
            }
            if !(step.is_finite() && step > 0.0) {
                return Err(MinosError::InvalidInput(format!(
                    "Step guess for '{}' must be positive, got {}",
                    param.name(),
                    step
                )));
            }
        }

        Ok(())
    }
}

/// How a crossing search ended. Exactly one of these holds per result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossingStatus {
    /// The profile reached the target within tolerance.
    Converged,

    /// A parameter limit was hit before the profile reached the target.
    AtLimit,

    /// A trial went below the supplied minimum.
    NewMinimum,

    /// The iteration or call budget ran out.
    CallLimit,

    /// Too many re-minimizations failed.
    InvalidReminimization,
}

impl CrossingStatus {
    pub fn description(&self) -> &'static str {
        match self {
            CrossingStatus::Converged => "crossing found",
            CrossingStatus::AtLimit => "parameter limit reached before crossing",
            CrossingStatus::NewMinimum => "new minimum found",
            CrossingStatus::CallLimit => "call limit exceeded",
            CrossingStatus::InvalidReminimization => "re-minimization failed",
        }
    }
}

impl fmt::Display for CrossingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of a crossing search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossingResult {
    /// Values of the moved parameters at the returned point
    pub values: Vec<f64>,

    /// Line coordinate of the returned point
    pub line_value: f64,

    /// Profile objective at the returned point
    pub fval: f64,

    /// Why the search stopped
    pub status: CrossingStatus,

    /// Objective calls spent, re-minimizations included
    pub nfcn: usize,

    /// Number of trial points evaluated
    pub iterations: usize,

    /// Re-minimized state at the returned point, moved parameters fixed
    pub state: ParameterState,

    /// Every trial in evaluation order, failed ones included
    pub trials: Vec<TrialPoint>,
}

impl CrossingResult {
    /// Value of the first moved parameter.
    pub fn value(&self) -> f64 {
        self.values.first().copied().unwrap_or(f64::NAN)
    }

    pub fn converged(&self) -> bool {
        self.status == CrossingStatus::Converged
    }

    pub fn at_limit(&self) -> bool {
        self.status == CrossingStatus::AtLimit
    }

    pub fn new_minimum_found(&self) -> bool {
        self.status == CrossingStatus::NewMinimum
    }

    pub fn max_calls_exceeded(&self) -> bool {
        self.status == CrossingStatus::CallLimit
    }

    pub fn invalid_reminimization(&self) -> bool {
        self.status == CrossingStatus::InvalidReminimization
    }
}
