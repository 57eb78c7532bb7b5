//! Finite difference methods for numerical differentiation.
//!
//! The bundled minimizer needs a gradient and a Hessian of the objective over
//! the free parameters. Both are taken from one set of central-difference
//! evaluations: the `±h_i` points give the gradient and the Hessian diagonal,
//! the four-corner points give the off-diagonal terms.

use crate::error::{MinosError, Result};
use ndarray::{Array1, Array2};

/// Default relative step for the central differences.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Step for coordinate `j`, scaled by the larger of `|x_j|` and `scale_j`.
pub fn step_size(x: f64, scale: f64, epsilon: f64) -> f64 {
    let magnitude = x.abs().max(scale.abs());
    if magnitude > 0.0 {
        magnitude * epsilon
    } else {
        epsilon
    }
}

/// Number of function calls made by [`gradient_and_hessian`] for `n` coordinates.
pub fn evaluation_count(n: usize) -> usize {
    2 * n * n
}

/// Compute the gradient and Hessian of `f` at `params` by central differences.
///
/// `f0` is the already known value `f(params)`; `steps[j]` is the absolute
/// step for coordinate `j`.
///
/// # Errors
///
/// Propagates evaluation errors, and fails on a non-positive step or a
/// non-finite function value.
pub fn gradient_and_hessian<F>(
    f: F,
    params: &Array1<f64>,
    f0: f64,
    steps: &Array1<f64>,
) -> Result<(Array1<f64>, Array2<f64>)>
where
    F: Fn(&Array1<f64>) -> Result<f64>,
{
    let n = params.len();
    if steps.len() != n {
        return Err(MinosError::DimensionMismatch(format!(
            "Expected {} finite-difference steps, got {}",
            n,
            steps.len()
        )));
    }
    if let Some(bad) = steps.iter().find(|h| !(h.is_finite() && **h > 0.0)) {
        return Err(MinosError::InvalidInput(format!(
            "Finite-difference step must be positive, got {}",
            bad
        )));
    }

    let eval = |p: &Array1<f64>| -> Result<f64> {
        let value = f(p)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(MinosError::FunctionEvaluation(format!(
                "Objective returned {} during differentiation",
                value
            )))
        }
    };

    let mut grad = Array1::zeros(n);
    let mut hess = Array2::zeros((n, n));

    for i in 0..n {
        let h = steps[i];

        let mut forward = params.clone();
        forward[i] += h;
        let mut backward = params.clone();
        backward[i] -= h;

        let f_forward = eval(&forward)?;
        let f_backward = eval(&backward)?;

        grad[i] = (f_forward - f_backward) / (2.0 * h);
        hess[[i, i]] = (f_forward - 2.0 * f0 + f_backward) / (h * h);
    }

    for i in 0..n {
        for j in 0..i {
            let (hi, hj) = (steps[i], steps[j]);

            let mut pp = params.clone();
            pp[i] += hi;
            pp[j] += hj;
            let mut pm = params.clone();
            pm[i] += hi;
            pm[j] -= hj;
            let mut mp = params.clone();
            mp[i] -= hi;
            mp[j] += hj;
            let mut mm = params.clone();
            mm[i] -= hi;
            mm[j] -= hj;

            let mixed = (eval(&pp)? - eval(&pm)? - eval(&mp)? + eval(&mm)?) / (4.0 * hi * hj);
            hess[[i, j]] = mixed;
            hess[[j, i]] = mixed;
        }
    }

    Ok((grad, hess))
}
