//! Tests for profile confidence intervals

use approx::assert_relative_eq;
use minos_rs::cross::Strategy;
use minos_rs::minimize::NewtonMinimizer;
use minos_rs::objective::FnObjective;
use minos_rs::parameters::ParameterState;
use minos_rs::uncertainty::{
    probability_to_sigma, profile_confidence_intervals, sigma_to_probability, Minos,
};
use ndarray::Array1;

#[test]
fn test_quadratic_intervals_scale_with_sigma() {
    // Gaussian negative log-likelihood, mean 2, width 0.5
    let objective = FnObjective::with_up(
        |p: &Array1<f64>| Ok(0.5 * ((p[0] - 2.0) / 0.5).powi(2)),
        0.5,
    );
    let mut state = ParameterState::new();
    state.add_param("mu", 1.0, 0.1).unwrap();

    let minimizer = NewtonMinimizer::new();
    let minimum = minimizer.minimize(&objective, &state, 10_000).unwrap();
    let minos = Minos::new(&objective, &minimum, Strategy::high(), &minimizer);

    let intervals = profile_confidence_intervals(&minos, 0, &[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(intervals.len(), 3);

    for interval in &intervals {
        assert!(interval.lower_valid && interval.upper_valid);
        assert_relative_eq!(interval.lower, 2.0 - 0.5 * interval.sigma, epsilon = 5e-3);
        assert_relative_eq!(interval.upper, 2.0 + 0.5 * interval.sigma, epsilon = 5e-3);
    }

    assert_relative_eq!(intervals[0].probability, 0.6827, epsilon = 1e-4);
    assert_relative_eq!(intervals[1].probability, 0.9545, epsilon = 1e-4);
    assert_relative_eq!(intervals[2].probability, 0.9973, epsilon = 1e-4);
}

#[test]
fn test_intervals_nest() {
    let objective = FnObjective::new(|p: &Array1<f64>| {
        let (x, y) = (p[0], p[1] - 1.0);
        Ok(x * x + 2.0 * y * y + x * y + 0.1 * x.powi(4))
    });
    let mut state = ParameterState::new();
    state.add_param("x", 0.5, 0.5).unwrap();
    state.add_param("y", 0.5, 0.5).unwrap();

    let minimizer = NewtonMinimizer::new();
    let minimum = minimizer.minimize(&objective, &state, 10_000).unwrap();
    let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);

    let intervals = profile_confidence_intervals(&minos, 0, &[0.5, 1.0, 2.0]).unwrap();
    for pair in intervals.windows(2) {
        assert!(pair[1].lower < pair[0].lower);
        assert!(pair[1].upper > pair[0].upper);
    }

    // The quartic term pulls the wider crossings in
    let one = &intervals[1];
    let two = &intervals[2];
    assert!(two.upper - two.lower < 2.0 * (one.upper - one.lower));
}

#[test]
fn test_interval_at_bound() {
    let objective = FnObjective::new(|p: &Array1<f64>| Ok(p[0] * p[0]));
    let mut state = ParameterState::new();
    state.add_param_with_bounds("x", 0.2, 0.5, -1.5, 10.0).unwrap();

    let minimizer = NewtonMinimizer::new();
    let minimum = minimizer.minimize(&objective, &state, 10_000).unwrap();
    let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);

    let intervals = profile_confidence_intervals(&minos, 0, &[1.0, 2.0]).unwrap();
    assert!(intervals[0].lower_valid);
    assert_relative_eq!(intervals[0].lower, -1.0, epsilon = 1e-2);

    assert!(!intervals[1].lower_valid);
    assert_relative_eq!(intervals[1].lower, -1.5, epsilon = 1e-12);
    assert!(intervals[1].upper_valid);
    assert_relative_eq!(intervals[1].upper, 2.0, epsilon = 2e-2);
}

#[test]
fn test_rejects_bad_sigma() {
    let objective = FnObjective::new(|p: &Array1<f64>| Ok(p[0] * p[0]));
    let mut state = ParameterState::new();
    state.add_param("x", 0.2, 0.5).unwrap();

    let minimizer = NewtonMinimizer::new();
    let minimum = minimizer.minimize(&objective, &state, 10_000).unwrap();
    let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);

    assert!(profile_confidence_intervals(&minos, 0, &[1.0, -1.0]).is_err());
    assert!(profile_confidence_intervals(&minos, 0, &[0.0]).is_err());
    assert!(profile_confidence_intervals(&minos, 3, &[1.0]).is_err());
    assert!(profile_confidence_intervals(&minos, 0, &[]).unwrap().is_empty());
}

#[test]
fn test_sigma_probability_inverse() {
    for sigma in [0.5, 1.0, 1.5, 2.0, 3.0] {
        let prob = sigma_to_probability(sigma);
        assert_relative_eq!(probability_to_sigma(prob), sigma, epsilon = 1e-4);
    }
    assert!(probability_to_sigma(1.0).is_nan());
    assert!(probability_to_sigma(-0.1).is_nan());
}
