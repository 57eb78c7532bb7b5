//! Poisson likelihood fit of an exponential decay
//!
//! Counts are taken at their expectation, `round(100·exp(-t/5))` for
//! `t = 0..=20`, so the best fit and its profile errors are fixed numbers.

use approx::assert_relative_eq;
use minos_rs::cross::Strategy;
use minos_rs::error::MinosError;
use minos_rs::minimize::NewtonMinimizer;
use minos_rs::objective::FnObjective;
use minos_rs::parameters::ParameterState;
use minos_rs::uncertainty::{profile_confidence_intervals, Minos};
use ndarray::Array1;

fn decay_counts() -> Vec<(f64, f64)> {
    (0..=20)
        .map(|t| {
            let t = t as f64;
            (t, (100.0 * (-t / 5.0).exp()).round())
        })
        .collect()
}

fn decay_nll(data: &[(f64, f64)], p: &Array1<f64>) -> minos_rs::Result<f64> {
    let (amplitude, lifetime) = (p[0], p[1]);
    let mut nll = 0.0;
    for &(t, n) in data {
        let mu = amplitude * (-t / lifetime).exp();
        if !(mu > 0.0) {
            return Err(MinosError::FunctionEvaluation(format!(
                "non-positive expectation {} at t = {}",
                mu, t
            )));
        }
        nll += mu - n * mu.ln();
    }
    Ok(nll)
}

fn decay_state() -> ParameterState {
    let mut state = ParameterState::new();
    state
        .add_param_with_bounds("amplitude", 90.0, 5.0, 1e-3, f64::INFINITY)
        .unwrap();
    state
        .add_param_with_bounds("lifetime", 4.5, 0.5, 0.1, 100.0)
        .unwrap();
    state
}

#[test]
fn test_decay_errors_are_asymmetric() {
    let data = decay_counts();
    let objective = FnObjective::with_up(|p: &Array1<f64>| decay_nll(&data, p), 0.5);

    let minimizer = NewtonMinimizer::new();
    let minimum = minimizer.minimize(&objective, &decay_state(), 10_000).unwrap();
    assert!(minimum.is_valid(), "{}", minimum);
    assert_relative_eq!(minimum.state.value(0).unwrap(), 100.246, epsilon = 1e-2);
    assert_relative_eq!(minimum.state.value(1).unwrap(), 4.992, epsilon = 1e-3);

    let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);
    let errors = minos.all_errors().unwrap();

    let amplitude = &errors[0];
    assert!(amplitude.is_valid(), "{}", amplitude);
    assert_relative_eq!(amplitude.lower_error(), -5.897, epsilon = 0.05);
    assert_relative_eq!(amplitude.upper_error(), 6.178, epsilon = 0.05);

    let lifetime = &errors[1];
    assert!(lifetime.is_valid(), "{}", lifetime);
    assert_relative_eq!(lifetime.lower_error(), -0.2415, epsilon = 5e-3);
    assert_relative_eq!(lifetime.upper_error(), 0.2621, epsilon = 5e-3);

    // The parabolic error sits between the two
    assert!(lifetime.parabolic_error > -lifetime.lower_error());
    assert!(lifetime.parabolic_error < lifetime.upper_error());
}

#[test]
fn test_decay_search_stays_within_budget() {
    let data = decay_counts();
    let objective = FnObjective::with_up(|p: &Array1<f64>| decay_nll(&data, p), 0.5);

    let minimizer = NewtonMinimizer::new();
    let minimum = minimizer.minimize(&objective, &decay_state(), 10_000).unwrap();
    let strategy = Strategy::low();
    let budget = strategy.call_budget(2);
    let minos = Minos::new(&objective, &minimum, strategy, &minimizer);

    for direction in [-1.0, 1.0] {
        let result = minos.crossing(1, direction, 0.5).unwrap();
        assert!(result.converged(), "{:?}", result.status);
        assert!(result.nfcn <= budget);
        assert!(result.iterations <= Strategy::low().max_iterations);
    }
}

#[test]
fn test_decay_two_sigma_interval_is_wider() {
    let data = decay_counts();
    let objective = FnObjective::with_up(|p: &Array1<f64>| decay_nll(&data, p), 0.5);

    let minimizer = NewtonMinimizer::new();
    let minimum = minimizer.minimize(&objective, &decay_state(), 10_000).unwrap();
    let minos = Minos::new(&objective, &minimum, Strategy::default(), &minimizer);

    let intervals = profile_confidence_intervals(&minos, 1, &[1.0, 2.0]).unwrap();
    let (one, two) = (&intervals[0], &intervals[1]);
    assert!(one.lower_valid && one.upper_valid);
    assert!(two.lower_valid && two.upper_valid);

    let tau = minimum.state.value(1).unwrap();
    assert!(two.lower < one.lower && two.upper > one.upper);
    // Skew grows with the interval
    assert!((two.upper - tau) - (tau - two.lower) > (one.upper - tau) - (tau - one.lower));
}
