//! The function-crossing solver.
//!
//! Moves one or more parameters along a line away from the minimum, fixes them
//! at each trial point, re-minimizes the objective over everything else and
//! stops when the profile objective reaches `fmin + delta`. Hitting a limit,
//! finding a lower minimum, failing re-minimizations and running out of budget
//! are all reported through [`CrossingStatus`].

use log::{debug, warn};

use super::extrapolator::ParabolicExtrapolator;
use super::history::{TrialHistory, TrialPoint};
use super::request::{CrossingRequest, CrossingResult, CrossingStatus};
use super::strategy::Strategy;
use crate::error::Result;
use crate::minimize::{ConstrainedReminimizer, FunctionMinimum};
use crate::objective::Objective;
use crate::parameters::{Bounds, ParameterState};

/// The search line through the moved parameters.
#[derive(Debug, Clone)]
struct SearchLine {
    current: Vec<f64>,
    unit: Vec<f64>,
    bounds: Vec<Bounds>,
    lower: f64,
    upper: f64,
}

impl SearchLine {
    /// `request` must already be validated against `state`.
    fn new(state: &ParameterState, request: &CrossingRequest) -> Result<Self> {
        let n = request.indices.len();
        let mut current = Vec::with_capacity(n);
        let mut unit = Vec::with_capacity(n);
        let mut bounds = Vec::with_capacity(n);
        let mut lower = f64::NEG_INFINITY;
        let mut upper = f64::INFINITY;

        for (k, &index) in request.indices.iter().enumerate() {
            let param = state.parameter(index)?;
            let step = request.directions[k] * request.step_guesses[k];
            let b = *param.bounds();

            // (1 + a)·step must stay inside [min - value, max - value]
            let to_min = (b.min - param.value()) / step - 1.0;
            let to_max = (b.max - param.value()) / step - 1.0;
            let (lo, hi) = if step > 0.0 {
                (to_min, to_max)
            } else {
                (to_max, to_min)
            };
            lower = lower.max(lo);
            upper = upper.min(hi);

            current.push(param.value());
            unit.push(step);
            bounds.push(b);
        }

        Ok(Self {
            current,
            unit,
            bounds,
            lower,
            upper,
        })
    }

    fn clamp(&self, a: f64) -> f64 {
        a.max(self.lower).min(self.upper)
    }

    fn at_upper_limit(&self, a: f64) -> bool {
        self.upper.is_finite() && a >= self.upper
    }

    /// Parameter values at `a`, kept inside the bounds against rounding.
    fn values(&self, a: f64) -> Vec<f64> {
        self.current
            .iter()
            .zip(&self.unit)
            .zip(&self.bounds)
            .map(|((&x, &u), b)| b.clamp(x + (1.0 + a) * u))
            .collect()
    }
}

/// A trial the search can fall back on.
struct Candidate {
    point: TrialPoint,
    state: ParameterState,
}

/// Finds where the profile objective crosses `fmin + delta`.
///
/// # Examples
///
/// ```
/// use minos_rs::cross::{CrossingRequest, FunctionCross, Strategy};
/// use minos_rs::minimize::NewtonMinimizer;
/// use minos_rs::objective::FnObjective;
/// use minos_rs::parameters::ParameterState;
///
/// let objective = FnObjective::new(|p: &ndarray::Array1<f64>| Ok((p[0] - 2.0).powi(2)));
/// let mut state = ParameterState::new();
/// state.add_param("x", 2.0, 1.0).unwrap();
///
/// let cross = FunctionCross::new(&objective, &state, 0.0, Strategy::default(), NewtonMinimizer::new());
/// let result = cross.solve(&CrossingRequest::single(0, 1.0, 1.0, 1.0, 1000)).unwrap();
/// assert!(result.converged());
/// assert!((result.value() - 3.0).abs() < 1e-6);
/// ```
pub struct FunctionCross<'a, O, R> {
    objective: O,
    state: &'a ParameterState,
    fmin: f64,
    strategy: Strategy,
    reminimizer: R,
}

impl<'a, O, R> FunctionCross<'a, O, R>
where
    O: Objective,
    R: ConstrainedReminimizer,
{
    /// Create a solver around a minimum `fmin` reached at `state`.
    pub fn new(
        objective: O,
        state: &'a ParameterState,
        fmin: f64,
        strategy: Strategy,
        reminimizer: R,
    ) -> Self {
        Self {
            objective,
            state,
            fmin,
            strategy,
            reminimizer,
        }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Run one crossing search.
    ///
    /// # Errors
    ///
    /// Only a malformed request or unusable strategy settings are errors; see
    /// [`CrossingRequest::validate`] and [`Strategy::validate`].
    pub fn solve(&self, request: &CrossingRequest) -> Result<CrossingResult> {
        request.validate(self.state)?;
        self.strategy.validate()?;

        let delta = request.target_delta;
        let aim = self.fmin + delta;
        let tolerance = self.strategy.tolerance * delta;
        let noise = self.strategy.new_minimum_tolerance * self.fmin.abs().max(delta);

        let line = SearchLine::new(self.state, request)?;
        let extrapolator = ParabolicExtrapolator::new(self.fmin, &self.strategy);

        let mut history = TrialHistory::new();
        let mut trials: Vec<TrialPoint> = Vec::new();
        let mut best: Option<Candidate> = None;
        let mut nfcn = 0;
        let mut iterations = 0;
        let mut failures = 0;
        let mut a = line.clamp(0.0);
        let mut previous_a = -1.0;

        debug!(
            "crossing search on {:?}: fmin = {:.10e}, aim = {:.10e}, line = [{:.4}, {:.4}]",
            request.indices, self.fmin, aim, line.lower, line.upper
        );

        loop {
            if iterations >= self.strategy.max_iterations || nfcn >= request.max_calls {
                warn!(
                    "crossing search on {:?} stopped after {} trials and {} calls",
                    request.indices, iterations, nfcn
                );
                return Ok(self.fallback(&line, best, CrossingStatus::CallLimit, nfcn, iterations, trials));
            }
            iterations += 1;
            let trial_step = (a - previous_a).abs();
            previous_a = a;

            let limit_set = line.at_upper_limit(a);
            let values = line.values(a);
            let fixed = self.state.with_fixed(&request.indices, &values)?;
            let remaining = request.max_calls - nfcn;

            let minimum = match self.reminimizer.reminimize(&self.objective, &fixed, remaining) {
                Ok(minimum) => {
                    nfcn += minimum.nfcn;
                    Some(minimum)
                }
                Err(err) => {
                    nfcn += 1;
                    debug!("re-minimization at a = {:.6} failed: {}", a, err);
                    None
                }
            };

            let valid = minimum.as_ref().map_or(false, FunctionMinimum::is_valid);
            let point = TrialPoint {
                a,
                values,
                fval: minimum.as_ref().map_or(f64::NAN, |m| m.fval),
                valid,
                nfcn: minimum.as_ref().map_or(1, |m| m.nfcn),
            };
            debug!(
                "trial {}: a = {:.6}, values = {:?}, f = {:.10e}, valid = {}, calls = {}",
                iterations, point.a, point.values, point.fval, valid, nfcn
            );
            trials.push(point.clone());

            let minimum = match minimum {
                Some(m) if m.reached_call_limit() => {
                    warn!(
                        "re-minimization on {:?} ran out of calls after {} total",
                        request.indices, nfcn
                    );
                    return Ok(self.fallback(&line, best, CrossingStatus::CallLimit, nfcn, iterations, trials));
                }
                Some(m) if valid => m,
                other => {
                    if let Some(m) = other {
                        if limit_set && m.fval.is_finite() && m.fval < aim {
                            return Ok(self.finish(point, m.state, CrossingStatus::AtLimit, nfcn, iterations, trials));
                        }
                    }

                    failures += 1;
                    if failures > self.strategy.max_invalid_reminimizations {
                        warn!(
                            "crossing search on {:?} abandoned after {} invalid re-minimizations",
                            request.indices, failures
                        );
                        return Ok(self.fallback(
                            &line,
                            best,
                            CrossingStatus::InvalidReminimization,
                            nfcn,
                            iterations,
                            trials,
                        ));
                    }

                    let anchor = history.last().map_or(-1.0, |p| p.a);
                    a = line.clamp(0.5 * (a + anchor));
                    continue;
                }
            };

            let f = minimum.fval;
            if f < self.fmin - noise {
                warn!(
                    "new minimum {:.10e} below {:.10e} while scanning {:?}",
                    f, self.fmin, request.indices
                );
                return Ok(self.finish(point, minimum.state, CrossingStatus::NewMinimum, nfcn, iterations, trials));
            }

            history.push(point.clone());
            let closer = best
                .as_ref()
                .map_or(true, |b| (f - aim).abs() < (b.point.fval - aim).abs());

            if (f - aim).abs() < tolerance {
                return Ok(self.finish(point, minimum.state, CrossingStatus::Converged, nfcn, iterations, trials));
            }
            if limit_set && f < aim {
                debug!("crossing on {:?} stopped at limit, f = {:.10e}", request.indices, f);
                return Ok(self.finish(point, minimum.state, CrossingStatus::AtLimit, nfcn, iterations, trials));
            }

            if closer {
                best = Some(Candidate {
                    point,
                    state: minimum.state,
                });
            }

            // Failed trials shorten the step too, so cap against the last trial made
            let proposal = extrapolator.next(&history, aim);
            let reach = self.strategy.step_cap_factor * trial_step;
            a = if reach > 0.0 {
                line.clamp(a + (proposal - a).clamp(-reach, reach))
            } else {
                line.clamp(proposal)
            };
        }
    }

    fn finish(
        &self,
        point: TrialPoint,
        state: ParameterState,
        status: CrossingStatus,
        nfcn: usize,
        iterations: usize,
        trials: Vec<TrialPoint>,
    ) -> CrossingResult {
        CrossingResult {
            values: point.values,
            line_value: point.a,
            fval: point.fval,
            status,
            nfcn,
            iterations,
            state,
            trials,
        }
    }

    /// Result built from the best valid trial, or from the minimum itself
    /// if no trial was valid.
    fn fallback(
        &self,
        line: &SearchLine,
        best: Option<Candidate>,
        status: CrossingStatus,
        nfcn: usize,
        iterations: usize,
        trials: Vec<TrialPoint>,
    ) -> CrossingResult {
        match best {
            Some(candidate) => self.finish(candidate.point, candidate.state, status, nfcn, iterations, trials),
            None => CrossingResult {
                values: line.current.clone(),
                line_value: -1.0,
                fval: self.fmin,
                status,
                nfcn,
                iterations,
                state: self.state.clone(),
                trials,
            },
        }
    }
}
