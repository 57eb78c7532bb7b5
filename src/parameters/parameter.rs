//! Parameter definition and implementation
//!
//! A [`Parameter`] is one named coordinate of the objective: its current value,
//! a step size that doubles as the parabolic error estimate once a minimum has
//! been found, optional hard limits, and whether it is free to vary.

use crate::parameters::bounds::{Bounds, BoundsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Bounds error: {0}")]
    BoundsError(#[from] BoundsError),

    #[error("Parameter '{name}' not found")]
    ParameterNotFound { name: String },

    #[error("Parameter index {index} out of range for {len} parameters")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Parameter '{name}' already exists")]
    DuplicateName { name: String },

    #[error("Parameter '{name}' has invalid step size {error}: must be positive and finite")]
    InvalidError { name: String, error: f64 },
}

/// A parameter of the objective function.
///
/// # Examples
///
/// ```
/// use minos_rs::parameters::Parameter;
///
/// let mut param = Parameter::with_error("mass", 91.2, 0.05);
/// assert_eq!(param.value(), 91.2);
/// assert_eq!(param.error(), 0.05);
/// assert!(param.vary());
///
/// param.fix();
/// assert!(!param.vary());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name of the parameter
    name: String,

    /// Current value of the parameter
    value: f64,

    /// Step size, or the parabolic error after a minimization
    error: f64,

    /// Whether this parameter can be varied during minimization
    vary: bool,

    /// Minimum and maximum bounds for the parameter value
    #[serde(default)]
    bounds: Bounds,
}

/// Step size used when none is given: 10% of the value, or 0.1 at zero.
fn default_error(value: f64) -> f64 {
    if value != 0.0 && value.is_finite() {
        0.1 * value.abs()
    } else {
        0.1
    }
}

impl Parameter {
    /// Create a new free, unbounded parameter with a default step size.
    pub fn new(name: &str, value: f64) -> Self {
        Self::with_error(name, value, default_error(value))
    }

    /// Create a new free, unbounded parameter with the given step size.
    pub fn with_error(name: &str, value: f64, error: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            error,
            vary: true,
            bounds: Bounds::default(),
        }
    }

    /// Create a new parameter with bounds.
    ///
    /// The value is clamped into the bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use minos_rs::parameters::Parameter;
    ///
    /// let param = Parameter::with_bounds("width", 12.0, 0.0, 10.0).unwrap();
    /// assert_eq!(param.value(), 10.0);
    /// assert_eq!(param.max(), 10.0);
    /// ```
    pub fn with_bounds(name: &str, value: f64, min: f64, max: f64) -> Result<Self, ParameterError> {
        let bounds = Bounds::new(min, max)?;
        let value = bounds.clamp(value);

        Ok(Self {
            name: name.to_string(),
            value,
            error: default_error(value),
            vary: true,
            bounds,
        })
    }

    /// Get the name of the parameter
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current value of the parameter
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the value of the parameter, rejecting values outside the bounds
    pub fn set_value(&mut self, value: f64) -> Result<(), ParameterError> {
        self.bounds.check(value)?;
        self.value = value;
        Ok(())
    }

    /// Step size / parabolic error
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Set the step size / parabolic error
    pub fn set_error(&mut self, error: f64) -> Result<(), ParameterError> {
        if !(error.is_finite() && error > 0.0) {
            return Err(ParameterError::InvalidError {
                name: self.name.clone(),
                error,
            });
        }
        self.error = error;
        Ok(())
    }

    /// Check if the parameter is varied during minimization
    pub fn vary(&self) -> bool {
        self.vary
    }

    /// Set whether the parameter is varied during minimization
    pub fn set_vary(&mut self, vary: bool) {
        self.vary = vary;
    }

    /// Hold the parameter at its current value.
    pub fn fix(&mut self) {
        self.vary = false;
    }

    /// Let the parameter vary again.
    pub fn release(&mut self) {
        self.vary = true;
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Get the minimum allowed value for the parameter
    pub fn min(&self) -> f64 {
        self.bounds.min
    }

    /// Get the maximum allowed value for the parameter
    pub fn max(&self) -> f64 {
        self.bounds.max
    }

    pub fn has_limits(&self) -> bool {
        self.bounds.has_limits()
    }

    /// Set the bounds for the parameter, clamping the current value into them
    pub fn set_bounds(&mut self, min: f64, max: f64) -> Result<(), ParameterError> {
        let bounds = Bounds::new(min, max)?;
        self.bounds = bounds;
        self.value = bounds.clamp(self.value);
        Ok(())
    }

    /// Remove both limits.
    pub fn remove_bounds(&mut self) {
        self.bounds = Bounds::unbounded();
    }
}
