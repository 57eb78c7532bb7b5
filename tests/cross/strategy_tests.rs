//! Tests for how strategy settings steer a crossing search

use minos_rs::cross::{CrossingRequest, FunctionCross, Strategy};
use minos_rs::minimize::NewtonMinimizer;
use minos_rs::objective::FnObjective;
use minos_rs::parameters::ParameterState;
use ndarray::Array1;

fn quartic_state() -> ParameterState {
    let mut state = ParameterState::new();
    state.add_param("x", 0.0, 0.1).unwrap();
    state
}

#[test]
fn test_tighter_tolerance_lands_closer() {
    // x⁴ is far from parabolic, so the search needs several trials
    let objective = FnObjective::new(|p: &Array1<f64>| Ok(p[0].powi(4)));
    let state = quartic_state();
    let minimizer = NewtonMinimizer::new();
    let request = CrossingRequest::single(0, 1.0, 0.1, 1.0, 1000);

    let mut misses = Vec::new();
    for strategy in [Strategy::low(), Strategy::medium(), Strategy::high()] {
        let tolerance = strategy.tolerance;
        let cross = FunctionCross::new(&objective, &state, 0.0, strategy, &minimizer);
        let result = cross.solve(&request).unwrap();
        assert!(result.converged(), "{:?}", result.status);
        assert!((result.fval - 1.0).abs() < tolerance);
        assert!((result.value() - 1.0).abs() < tolerance);
        misses.push((result.fval - 1.0).abs());
    }

    assert!(misses[2] < Strategy::low().tolerance);
}

#[test]
fn test_iteration_limit_keeps_best_trial() {
    let objective = FnObjective::new(|p: &Array1<f64>| Ok(p[0].powi(4)));
    let state = quartic_state();
    let minimizer = NewtonMinimizer::new();
    let strategy = Strategy::default().with_max_iterations(3);
    let cross = FunctionCross::new(&objective, &state, 0.0, strategy, &minimizer);

    let result = cross
        .solve(&CrossingRequest::single(0, 1.0, 0.1, 1.0, 1000))
        .unwrap();

    assert!(result.max_calls_exceeded());
    assert_eq!(result.iterations, 3);
    assert_eq!(result.trials.len(), 3);

    let closest = result
        .trials
        .iter()
        .map(|t| (t.fval - 1.0).abs())
        .fold(f64::INFINITY, f64::min);
    assert_eq!((result.fval - 1.0).abs(), closest);
}

#[test]
fn test_step_cap_bounds_every_step() {
    let objective = FnObjective::new(|p: &Array1<f64>| Ok(p[0].powi(4)));
    let state = quartic_state();
    let minimizer = NewtonMinimizer::new();

    for factor in [1.5, 2.0, 4.0] {
        let strategy = Strategy::default()
            .with_step_cap_factor(factor)
            .with_max_iterations(40);
        let cross = FunctionCross::new(&objective, &state, 0.0, strategy, &minimizer);
        let result = cross
            .solve(&CrossingRequest::single(0, 1.0, 0.01, 1.0, 5000))
            .unwrap();
        assert!(result.converged(), "factor {}: {:?}", factor, result.status);

        let mut last_a = -1.0;
        let mut previous = 1.0;
        for trial in &result.trials {
            let step = (trial.a - last_a).abs();
            assert!(step <= factor * previous + 1e-12, "factor {}: {} after {}", factor, step, previous);
            last_a = trial.a;
            previous = step;
        }
    }
}
