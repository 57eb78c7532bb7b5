//! Parameter state container
//!
//! [`ParameterState`] is the ordered collection of parameters the objective is
//! evaluated on. Order matters: the objective receives the full value vector
//! in insertion order, and crossing requests address parameters by index.

use crate::error::Result;
use crate::parameters::parameter::{Parameter, ParameterError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// An ordered collection of parameters.
///
/// # Examples
///
/// ```
/// use minos_rs::parameters::ParameterState;
///
/// let mut state = ParameterState::new();
/// state.add_param("slope", 2.0, 0.1).unwrap();
/// state.add_param_with_bounds("width", 1.0, 0.2, 0.0, 5.0).unwrap();
///
/// let fixed = state.with_fixed(&[0], &[2.5]).unwrap();
/// assert_eq!(fixed.values().to_vec(), vec![2.5, 1.0]);
/// assert_eq!(fixed.free_indices(), vec![1]);
///
/// // the original is untouched
/// assert_eq!(state.free_indices(), vec![0, 1]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterState {
    params: Vec<Parameter>,
}

impl ParameterState {
    /// Create a new empty state
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Append a parameter; names must be unique.
    pub fn add(&mut self, param: Parameter) -> std::result::Result<usize, ParameterError> {
        if self.index_of(param.name()).is_some() {
            return Err(ParameterError::DuplicateName {
                name: param.name().to_string(),
            });
        }
        self.params.push(param);
        Ok(self.params.len() - 1)
    }

    /// Append a free, unbounded parameter with the given step size.
    pub fn add_param(
        &mut self,
        name: &str,
        value: f64,
        error: f64,
    ) -> std::result::Result<usize, ParameterError> {
        let mut param = Parameter::new(name, value);
        param.set_error(error)?;
        self.add(param)
    }

    /// Append a free, bounded parameter with the given step size.
    pub fn add_param_with_bounds(
        &mut self,
        name: &str,
        value: f64,
        error: f64,
        min: f64,
        max: f64,
    ) -> std::result::Result<usize, ParameterError> {
        let mut param = Parameter::with_bounds(name, value, min, max)?;
        param.set_error(error)?;
        self.add(param)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Parameter> {
        self.params.get_mut(index)
    }

    /// Like [`get`](Self::get), but with an error for a bad index.
    pub fn parameter(&self, index: usize) -> std::result::Result<&Parameter, ParameterError> {
        let len = self.params.len();
        self.params
            .get(index)
            .ok_or(ParameterError::IndexOutOfRange { index, len })
    }

    fn parameter_mut(&mut self, index: usize) -> std::result::Result<&mut Parameter, ParameterError> {
        let len = self.params.len();
        self.params
            .get_mut(index)
            .ok_or(ParameterError::IndexOutOfRange { index, len })
    }

    /// Position of the parameter with the given name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Full value vector, in parameter order.
    pub fn values(&self) -> Array1<f64> {
        self.params.iter().map(|p| p.value()).collect()
    }

    pub fn value(&self, index: usize) -> std::result::Result<f64, ParameterError> {
        Ok(self.parameter(index)?.value())
    }

    pub fn error(&self, index: usize) -> std::result::Result<f64, ParameterError> {
        Ok(self.parameter(index)?.error())
    }

    pub fn set_value(&mut self, index: usize, value: f64) -> std::result::Result<(), ParameterError> {
        self.parameter_mut(index)?.set_value(value)
    }

    pub fn set_error(&mut self, index: usize, error: f64) -> std::result::Result<(), ParameterError> {
        self.parameter_mut(index)?.set_error(error)
    }

    pub fn fix(&mut self, index: usize) -> std::result::Result<(), ParameterError> {
        self.parameter_mut(index)?.fix();
        Ok(())
    }

    pub fn release(&mut self, index: usize) -> std::result::Result<(), ParameterError> {
        self.parameter_mut(index)?.release();
        Ok(())
    }

    /// Indices of the parameters that are free to vary, in order.
    pub fn free_indices(&self) -> Vec<usize> {
        self.params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.vary())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn n_free(&self) -> usize {
        self.params.iter().filter(|p| p.vary()).count()
    }

    /// Values of the free parameters only.
    pub fn free_values(&self) -> Array1<f64> {
        self.params
            .iter()
            .filter(|p| p.vary())
            .map(|p| p.value())
            .collect()
    }

    /// Build the full value vector from the free values, taking fixed
    /// parameters from the state.
    pub fn expand_free(&self, free: &Array1<f64>) -> Result<Array1<f64>> {
        let n_free = self.n_free();
        if free.len() != n_free {
            return Err(crate::error::MinosError::DimensionMismatch(format!(
                "Expected {} free values, got {}",
                n_free,
                free.len()
            )));
        }

        let mut full = self.values();
        for (k, i) in self.free_indices().into_iter().enumerate() {
            full[i] = free[k];
        }
        Ok(full)
    }

    /// Write free values back into the state.
    pub fn set_free_values(&mut self, free: &Array1<f64>) -> Result<()> {
        let indices = self.free_indices();
        if free.len() != indices.len() {
            return Err(crate::error::MinosError::DimensionMismatch(format!(
                "Expected {} free values, got {}",
                indices.len(),
                free.len()
            )));
        }

        for (k, i) in indices.into_iter().enumerate() {
            self.params[i].set_value(free[k])?;
        }
        Ok(())
    }

    /// Clone the state with the given parameters set to the given values and
    /// fixed there.
    ///
    /// # Errors
    ///
    /// Fails on mismatched lengths, a bad index, or a value outside the
    /// parameter's bounds.
    pub fn with_fixed(&self, indices: &[usize], values: &[f64]) -> Result<ParameterState> {
        if indices.len() != values.len() {
            return Err(crate::error::MinosError::DimensionMismatch(format!(
                "{} indices but {} values",
                indices.len(),
                values.len()
            )));
        }

        let mut fixed = self.clone();
        for (&index, &value) in indices.iter().zip(values) {
            let param = fixed.parameter_mut(index)?;
            param.set_value(value)?;
            param.fix();
        }
        Ok(fixed)
    }

    /// Save the state to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Serialize the state to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a state from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Parse a state from a JSON string, validating names and bounds.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: ParameterState = serde_json::from_str(json)?;

        // Re-add one by one so duplicate names and out-of-bounds values are rejected
        let mut state = ParameterState::new();
        for param in raw.params {
            param.bounds().check(param.value())?;
            state.add(param)?;
        }
        Ok(state)
    }
}
