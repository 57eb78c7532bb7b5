//! # minos-rs
//!
//! `minos-rs` computes asymmetric ("MINOS") parameter errors: instead of
//! reading a symmetric error off the curvature at the minimum, it searches
//! for the parameter values where the *profile* of the objective, re-minimized
//! over all other free parameters, has risen by a given amount above the
//! minimum.
//!
//! The library provides:
//! - A parameter state with bounds, fixed/free flags and JSON round-tripping
//! - A damped Newton minimizer used for the constrained re-minimizations
//! - The function-crossing solver with its parabolic extrapolation
//! - MINOS errors and profile confidence intervals on top of it
//!
//! ## Basic Usage
//!
//! ```
//! use minos_rs::cross::Strategy;
//! use minos_rs::minimize::NewtonMinimizer;
//! use minos_rs::objective::FnObjective;
//! use minos_rs::parameters::ParameterState;
//! use minos_rs::uncertainty::Minos;
//! use ndarray::Array1;
//!
//! // Correlated quadratic with its minimum at (1, 2)
//! let objective = FnObjective::new(|p: &Array1<f64>| {
//!     let (x, y) = (p[0] - 1.0, p[1] - 2.0);
//!     Ok(x * x + y * y + x * y)
//! });
//!
//! let mut state = ParameterState::new();
//! state.add_param("x", 0.0, 0.5).unwrap();
//! state.add_param("y", 0.0, 0.5).unwrap();
//!
//! let minimizer = NewtonMinimizer::new();
//! let minimum = minimizer.minimize(&objective, &state, 10_000).unwrap();
//! assert!(minimum.is_valid());
//!
//! let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);
//! let x_errors = minos.minos_error(0).unwrap();
//!
//! // Profile of x is 0.75·(x - 1)², so the crossings sit at ±sqrt(4/3)
//! let expected = (4.0f64 / 3.0).sqrt();
//! assert!((x_errors.upper_error() - expected).abs() < 1e-2);
//! assert!((x_errors.lower_error() + expected).abs() < 1e-2);
//! ```

pub mod cross;
pub mod error;
pub mod minimize;
pub mod objective;
pub mod parameters;
pub mod uncertainty;
pub mod utils;

// Re-exports for convenience
pub use cross::{CrossingRequest, CrossingResult, CrossingStatus, FunctionCross, Strategy};
pub use error::{MinosError, Result};
pub use minimize::{ConstrainedReminimizer, FunctionMinimum, NewtonMinimizer};
pub use objective::{FnObjective, Objective};
pub use parameters::{Parameter, ParameterState};
pub use uncertainty::{AsymmetricError, Minos};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
