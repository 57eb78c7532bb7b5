//! Tests for the MINOS driver
//!
//! - Correlated quadratics reproduce the analytic profile errors
//! - Asymmetric objectives give asymmetric errors
//! - Limits and new minima are reported, not hidden

use approx::assert_relative_eq;
use minos_rs::cross::Strategy;
use minos_rs::minimize::{FunctionMinimum, NewtonMinimizer};
use minos_rs::objective::{FnObjective, Objective};
use minos_rs::parameters::ParameterState;
use minos_rs::uncertainty::{calculate_correlation, Minos};
use ndarray::Array1;

fn minimize<O: Objective>(objective: &O, state: &ParameterState) -> FunctionMinimum {
    let minimum = NewtonMinimizer::new().minimize(objective, state, 10_000).unwrap();
    assert!(minimum.is_valid(), "{}", minimum);
    minimum
}

fn two_params(x: f64, y: f64) -> ParameterState {
    let mut state = ParameterState::new();
    state.add_param("x", x, 0.5).unwrap();
    state.add_param("y", y, 0.5).unwrap();
    state
}

#[test]
fn test_correlated_quadratic_matches_error_matrix() {
    // Hessian [[2, 1.6], [1.6, 2]]: strongly correlated
    let objective = FnObjective::new(|p: &Array1<f64>| {
        let (x, y) = (p[0] - 1.0, p[1] + 1.0);
        Ok(x * x + y * y + 1.6 * x * y)
    });
    let minimum = minimize(&objective, &two_params(0.0, 0.0));

    // V = 2·H⁻¹, profile errors are sqrt(V_ii)
    let det: f64 = 4.0 - 1.6 * 1.6;
    let sigma = (2.0 * 2.0 / det).sqrt();

    let minimizer = NewtonMinimizer::new();
    let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);

    for index in 0..2 {
        let errors = minos.minos_error(index).unwrap();
        assert!(errors.is_valid(), "{}", errors);
        assert_relative_eq!(errors.parabolic_error, sigma, epsilon = 1e-3);
        assert_relative_eq!(errors.upper_error(), sigma, epsilon = 1e-2);
        assert_relative_eq!(errors.lower_error(), -sigma, epsilon = 1e-2);
    }

    let correlation = calculate_correlation(minimum.covariance.as_ref().unwrap());
    assert_relative_eq!(correlation[[0, 1]], -0.8, epsilon = 1e-3);
}

#[test]
fn test_correlated_shift_saves_calls() {
    let objective = FnObjective::new(|p: &Array1<f64>| {
        let (x, y) = (p[0], p[1]);
        Ok(x * x + y * y + 1.9 * x * y)
    });
    let minimum = minimize(&objective, &two_params(0.3, -0.2));

    let minimizer = NewtonMinimizer::new();
    let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);
    let upper = minos.upper(0).unwrap();

    assert!(upper.converged());
    // the other parameter ends near its conditional minimum -0.95·x
    let y = upper.state.value(1).unwrap();
    assert_relative_eq!(y, -0.95 * upper.value(), epsilon = 1e-3);
    // one or two trials when the start is already on the profile valley
    assert!(upper.iterations <= 2, "{} trials", upper.iterations);
}

#[test]
fn test_asymmetric_profile() {
    // Poisson negative log-likelihood for 10 observed events
    let objective = FnObjective::with_up(
        |p: &Array1<f64>| {
            let x = p[0];
            if x <= 0.0 {
                return Err(minos_rs::MinosError::FunctionEvaluation(
                    "rate must be positive".to_string(),
                ));
            }
            Ok(x - 10.0 * x.ln())
        },
        0.5,
    );
    let mut state = ParameterState::new();
    state
        .add_param_with_bounds("rate", 8.0, 1.0, 1e-6, f64::INFINITY)
        .unwrap();
    let minimum = minimize(&objective, &state);
    assert_relative_eq!(minimum.state.value(0).unwrap(), 10.0, epsilon = 1e-3);

    let minimizer = NewtonMinimizer::new();
    let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);
    let errors = minos.minos_error(0).unwrap();

    assert!(errors.is_valid(), "{}", errors);
    // Likelihood-ratio interval for n = 10 at up = 0.5: -2.838 / +3.504
    assert_relative_eq!(errors.lower_error(), -2.838, epsilon = 0.03);
    assert_relative_eq!(errors.upper_error(), 3.504, epsilon = 0.03);
    assert!(errors.upper_error() > -errors.lower_error());
}

#[test]
fn test_limit_inside_interval() {
    let objective = FnObjective::new(|p: &Array1<f64>| Ok(p[0] * p[0] + p[1] * p[1]));
    let mut state = ParameterState::new();
    state.add_param_with_bounds("x", 0.5, 0.5, -0.4, 2.0).unwrap();
    state.add_param("y", 0.5, 0.5).unwrap();
    let minimum = minimize(&objective, &state);

    let minimizer = NewtonMinimizer::new();
    let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);
    let errors = minos.minos_error(0).unwrap();

    assert!(errors.at_lower_limit());
    assert!(!errors.lower_valid());
    assert_relative_eq!(errors.lower.value(), -0.4, epsilon = 1e-12);
    assert!(errors.upper_valid());
    assert_relative_eq!(errors.upper_error(), 1.0, epsilon = 1e-2);
}

#[test]
fn test_new_minimum_is_reported() {
    // A second, deeper well at x = 3 beyond a low barrier
    let objective = FnObjective::new(|p: &Array1<f64>| {
        let x = p[0];
        Ok(x * x * (x - 3.0) * (x - 3.0) / 4.0 - 0.3 * x)
    });
    let mut state = ParameterState::new();
    state.add_param("x", -0.2, 0.5).unwrap();
    let minimum = minimize(&objective, &state);
    assert!(minimum.state.value(0).unwrap() < 0.5);

    let minimizer = NewtonMinimizer::new();
    let strategy = Strategy::default().with_max_iterations(30);
    let minos = Minos::new(&objective, &minimum, strategy, &minimizer);

    let upper = minos.crossing(0, 1.0, 25.0).unwrap();
    assert!(upper.new_minimum_found(), "{:?}", upper.status);
    assert!(upper.fval < minimum.fval);
}

#[test]
fn test_all_errors_serialize() {
    let objective = FnObjective::new(|p: &Array1<f64>| Ok(p[0] * p[0] + 4.0 * p[1] * p[1]));
    let minimum = minimize(&objective, &two_params(1.0, 1.0));

    let minimizer = NewtonMinimizer::new();
    let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);
    let errors = minos.all_errors().unwrap();

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].name, "x");
    assert_relative_eq!(errors[1].upper_error(), 0.5, epsilon = 1e-2);

    let json = serde_json::to_string(&errors).unwrap();
    assert!(json.contains("\"Converged\""));
}
