//! Proposal of the next trial point along the search line.
//!
//! Works in the line coordinate `a`, where the minimum sits at `a = -1` with
//! value `fmin`. With one trial the profile is assumed parabolic about the
//! minimum, with two a secant is used, and with three a parabola is fitted
//! through all of them. Every proposal is capped relative to the last step.

use super::history::{TrialHistory, TrialPoint};
use super::strategy::Strategy;

/// Separations in `a` below this are treated as coincident points.
const COINCIDENT: f64 = 1e-12;

/// Suggests the next line coordinate from the trial history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParabolicExtrapolator {
    fmin: f64,
    tolerance: f64,
    step_cap_factor: f64,
}

impl ParabolicExtrapolator {
    pub fn new(fmin: f64, strategy: &Strategy) -> Self {
        Self {
            fmin,
            tolerance: strategy.tolerance,
            step_cap_factor: strategy.step_cap_factor,
        }
    }

    /// Next line coordinate at which the profile should reach `aim`.
    ///
    /// An empty history gives the first trial, `a = 0`.
    pub fn next(&self, history: &TrialHistory, aim: f64) -> f64 {
        let points: Vec<&TrialPoint> = history.iter().collect();
        let last = match points.last() {
            Some(last) => last.a,
            None => return 0.0,
        };

        let proposal = match points.as_slice() {
            [p0] => self.from_one(p0, aim),
            [p0, p1] => self.from_two(p0, p1, aim),
            _ => self.from_three(&points[points.len() - 3..], aim),
        };

        let proposal = if proposal.is_finite() {
            proposal
        } else {
            last + 1.0
        };

        let limit = match history.last_step() {
            Some(step) if step > COINCIDENT => self.step_cap_factor * step,
            _ => 1.0,
        };
        last + (proposal - last).clamp(-limit, limit)
    }

    /// Scale the first trial so a parabola through the minimum hits `aim`.
    fn from_one(&self, p: &TrialPoint, aim: f64) -> f64 {
        let delta = aim - self.fmin;
        let scale = 1.0 + p.a;
        if scale <= f64::EPSILON {
            return p.a + 1.0;
        }

        let rise = (p.fval - self.fmin).max(0.1 * delta);
        let target = scale * (delta / rise).sqrt() - 1.0;
        p.a + (target - p.a).clamp(-0.5, 1.0)
    }

    fn from_two(&self, p0: &TrialPoint, p1: &TrialPoint, aim: f64) -> f64 {
        let da = p1.a - p0.a;
        if da.abs() <= COINCIDENT {
            return p1.a + 1.0;
        }

        let slope = (p1.fval - p0.fval) / da;
        if slope.is_finite() && slope > 0.0 {
            let lo = p0.a.min(p1.a) - 1.0;
            let hi = p0.a.max(p1.a) + 1.0;
            (p1.a + (aim - p1.fval) / slope).clamp(lo, hi)
        } else {
            p1.a + 2.0 * da.abs()
        }
    }

    /// `points` holds exactly three points, oldest first.
    fn from_three(&self, points: &[&TrialPoint], aim: f64) -> f64 {
        let (p0, p1, p2) = (points[0], points[1], points[2]);
        let (a0, a1, a2) = (p0.a, p1.a, p2.a);

        if (a1 - a0).abs() <= COINCIDENT
            || (a2 - a0).abs() <= COINCIDENT
            || (a2 - a1).abs() <= COINCIDENT
        {
            return self.from_two(p1, p2, aim);
        }

        let s01 = (p1.fval - p0.fval) / (a1 - a0);
        let s02 = (p2.fval - p0.fval) / (a2 - a0);
        let curvature = (s02 - s01) / (a2 - a1);
        let linear = s01 - curvature * (a0 + a1);
        let constant = p0.fval - curvature * a0 * a0 - linear * a0;

        if curvature.abs() <= COINCIDENT * (1.0 + linear.abs()) {
            return self.from_two(p1, p2, aim);
        }

        let discriminant = linear * linear - 4.0 * curvature * (constant - aim);
        let proposal = if discriminant < 0.0 {
            // No crossing on the parabola: Newton step along its slope
            let slope = 2.0 * curvature * a2 + linear;
            let secant = (p2.fval - p1.fval) / (a2 - a1);
            let denominator = slope.abs().max(secant.abs()).max(COINCIDENT);
            a2 + (aim - p2.fval) / denominator
        } else {
            let root = discriminant.sqrt();
            let roots = [
                (-linear + root) / (2.0 * curvature),
                (-linear - root) / (2.0 * curvature),
            ];

            let rising = roots
                .iter()
                .copied()
                .find(|&r| 2.0 * curvature * r + linear > 0.0);

            match rising {
                Some(r) => r,
                None => {
                    let best = points
                        .iter()
                        .min_by(|x, y| (x.fval - aim).abs().total_cmp(&(y.fval - aim).abs()))
                        .map_or(a2, |p| p.a);
                    if (roots[0] - best).abs() <= (roots[1] - best).abs() {
                        roots[0]
                    } else {
                        roots[1]
                    }
                }
            }
        };

        self.keep_in_bracket(points, aim, proposal)
    }

    /// Clamp into the tightest `f < aim < f` bracket, if the points form one.
    fn keep_in_bracket(&self, points: &[&TrialPoint], aim: f64, proposal: f64) -> f64 {
        let below = points
            .iter()
            .filter(|p| p.fval < aim)
            .map(|p| p.a)
            .fold(f64::NEG_INFINITY, f64::max);
        let above = points
            .iter()
            .filter(|p| p.fval > aim)
            .map(|p| p.a)
            .fold(f64::INFINITY, f64::min);

        if !(below.is_finite() && above.is_finite() && below < above) {
            return proposal;
        }

        let margin = 0.1 * self.tolerance * (above - below);
        proposal.clamp(below + margin, above - margin)
    }
}
