//! # Covariance Matrix Calculations
//!
//! Helpers around the error matrix of the free parameters: building it from a
//! Hessian, reading standard errors off its diagonal and normalizing it to a
//! correlation matrix.

use ndarray::{Array1, Array2};

use crate::error::{MinosError, Result};
use crate::utils::matrix_convert::{nalgebra_to_ndarray, ndarray_to_nalgebra};

/// Error matrix `2·up·H⁻¹` from the Hessian of the objective.
///
/// For a chi-square (`up = 1`) with Hessian `2·JᵀJ` this is the familiar
/// `(JᵀJ)⁻¹`.
///
/// # Errors
///
/// Returns [`MinosError::SingularMatrix`] if the Hessian is not positive
/// definite.
pub fn error_matrix(hessian: &Array2<f64>, up: f64) -> Result<Array2<f64>> {
    if hessian.nrows() != hessian.ncols() {
        return Err(MinosError::DimensionMismatch(format!(
            "Hessian must be square, got {}x{}",
            hessian.nrows(),
            hessian.ncols()
        )));
    }

    let cholesky = ndarray_to_nalgebra(hessian)
        .cholesky()
        .ok_or(MinosError::SingularMatrix)?;
    Ok(nalgebra_to_ndarray(&cholesky.inverse()) * (2.0 * up))
}

/// Calculate correlation matrix from covariance matrix.
///
/// `correl[i,j] = covar[i,j] / sqrt(covar[i,i] * covar[j,j])`; rows with a
/// non-positive variance get zero correlation.
pub fn calculate_correlation(covar: &Array2<f64>) -> Array2<f64> {
    Array2::from_shape_fn(covar.raw_dim(), |(i, j)| {
        if i == j {
            return 1.0;
        }
        let denom = (covar[[i, i]] * covar[[j, j]]).sqrt();
        if denom > 0.0 {
            covar[[i, j]] / denom
        } else {
            0.0
        }
    })
}

/// Standard errors: square roots of the diagonal, zero where it is not positive.
pub fn standard_errors_from_covariance(covar: &Array2<f64>) -> Array1<f64> {
    covar
        .diag()
        .mapv(|v| if v > 0.0 { v.sqrt() } else { 0.0 })
}
