//! Tests for ParameterState as the crossing search uses it
//!
//! - Fixing moved parameters in a clone without touching the original
//! - Moving between free-only and full value vectors
//! - JSON persistence of a fit result

use minos_rs::error::MinosError;
use minos_rs::parameters::{Bounds, Parameter, ParameterState};
use ndarray::array;

fn fit_state() -> ParameterState {
    let mut state = ParameterState::new();
    state.add_param("amplitude", 10.0, 0.5).unwrap();
    state
        .add_param_with_bounds("center", 5.0, 0.1, 0.0, 10.0)
        .unwrap();
    state
        .add_param_with_bounds("width", 1.0, 0.05, 0.0, f64::INFINITY)
        .unwrap();
    state
}

#[test]
fn test_with_fixed_leaves_original_untouched() {
    let state = fit_state();
    let fixed = state.with_fixed(&[1], &[5.3]).unwrap();

    assert_eq!(state.value(1).unwrap(), 5.0);
    assert!(state.get(1).unwrap().vary());

    assert_eq!(fixed.value(1).unwrap(), 5.3);
    assert!(!fixed.get(1).unwrap().vary());
    assert_eq!(fixed.free_indices(), vec![0, 2]);
    assert_eq!(fixed.free_values(), array![10.0, 1.0]);
}

#[test]
fn test_with_fixed_rejects_values_outside_bounds() {
    let state = fit_state();
    assert!(state.with_fixed(&[1], &[10.5]).is_err());
    assert!(state.with_fixed(&[2], &[-0.1]).is_err());
    assert!(matches!(
        state.with_fixed(&[0, 1], &[1.0]),
        Err(MinosError::DimensionMismatch(_))
    ));
    assert!(state.with_fixed(&[7], &[1.0]).is_err());
}

#[test]
fn test_expand_and_write_back_free_values() {
    let state = fit_state().with_fixed(&[0], &[12.0]).unwrap();

    let full = state.expand_free(&array![6.0, 2.0]).unwrap();
    assert_eq!(full, array![12.0, 6.0, 2.0]);

    let mut updated = state.clone();
    updated.set_free_values(&array![6.0, 2.0]).unwrap();
    assert_eq!(updated.values(), full);

    assert!(state.expand_free(&array![1.0]).is_err());
}

#[test]
fn test_index_lookup_and_duplicates() {
    let mut state = fit_state();
    assert_eq!(state.index_of("width"), Some(2));
    assert_eq!(state.index_of("missing"), None);
    assert!(state.add(Parameter::new("center", 1.0)).is_err());
    assert_eq!(state.len(), 3);
}

#[test]
fn test_json_round_trip() {
    let mut state = fit_state();
    state.fix(0).unwrap();
    state.set_error(1, 0.02).unwrap();

    let json = state.to_json().unwrap();
    let restored = ParameterState::from_json(&json).unwrap();
    assert_eq!(restored, state);
    assert_eq!(*restored.get(2).unwrap().bounds(), Bounds::min_only(0.0));
}

#[test]
fn test_json_file_round_trip() {
    let state = fit_state();
    let path = std::env::temp_dir().join(format!("minos-rs-state-{}.json", std::process::id()));

    state.save_json(&path).unwrap();
    let restored = ParameterState::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(restored, state);
}

#[test]
fn test_json_rejects_inconsistent_state() {
    let out_of_bounds = r#"{"params": [
        {"name": "x", "value": 3.0, "error": 0.1, "vary": true, "bounds": {"min": 0.0, "max": 1.0}}
    ]}"#;
    assert!(ParameterState::from_json(out_of_bounds).is_err());

    let duplicate = r#"{"params": [
        {"name": "x", "value": 0.5, "error": 0.1, "vary": true},
        {"name": "x", "value": 0.5, "error": 0.1, "vary": true}
    ]}"#;
    assert!(ParameterState::from_json(duplicate).is_err());
}
