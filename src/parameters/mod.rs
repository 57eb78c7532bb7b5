//! # Parameter System
//!
//! The parameter state the objective is evaluated on and that crossing searches
//! move through.
//!
//! - [`Parameter`]: a named value with a step size / error, optional bounds,
//!   and a free/fixed flag
//! - [`ParameterState`]: the ordered collection, with helpers to clone the
//!   state with some parameters fixed and to move between full and free-only
//!   value vectors
//! - [`Bounds`]: hard limits on a parameter
//!
//! ## Example Usage
//!
//! ```rust
//! use minos_rs::parameters::ParameterState;
//!
//! let mut state = ParameterState::new();
//! state.add_param("norm", 10.0, 1.0).unwrap();
//! state.add_param_with_bounds("sigma", 0.5, 0.05, 0.0, f64::INFINITY).unwrap();
//!
//! // Parameters are addressed by position
//! let sigma = state.index_of("sigma").unwrap();
//! assert_eq!(state.value(sigma).unwrap(), 0.5);
//!
//! // Hold one parameter fixed for a constrained minimization
//! let profile_state = state.with_fixed(&[sigma], &[0.6]).unwrap();
//! assert_eq!(profile_state.n_free(), 1);
//! ```

pub mod bounds;
pub mod parameter;
pub mod state;

pub use bounds::{Bounds, BoundsError};
pub use parameter::{Parameter, ParameterError};
pub use state::ParameterState;
