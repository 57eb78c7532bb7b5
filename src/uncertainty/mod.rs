//! # Uncertainty Calculation
//!
//! Parameter uncertainties around a minimum found by a
//! [`ConstrainedReminimizer`](crate::minimize::ConstrainedReminimizer):
//!
//! - Parabolic errors and correlations from the error matrix
//! - Asymmetric MINOS errors from the profile of the objective
//! - Profile confidence intervals at several sigma levels

pub mod confidence;
pub mod covariance;
pub mod minos;

pub use confidence::{
    probability_to_sigma, profile_confidence_intervals, sigma_to_probability, ConfidenceInterval,
};
pub use covariance::{calculate_correlation, error_matrix, standard_errors_from_covariance};
pub use minos::{AsymmetricError, Minos};
