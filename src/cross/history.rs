//! Trial points of a crossing search.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of trial points the extrapolator looks at.
pub const HISTORY_CAPACITY: usize = 3;

/// One evaluation of the profile objective along the search line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialPoint {
    /// Line coordinate, `x = current + (1 + a)·direction·step`
    pub a: f64,

    /// Values of the moved parameters
    pub values: Vec<f64>,

    /// Re-minimized objective value, NaN if the re-minimization failed outright
    pub fval: f64,

    /// Whether the re-minimization was valid
    pub valid: bool,

    /// Objective calls spent on this trial
    pub nfcn: usize,
}

/// The last [`HISTORY_CAPACITY`] valid trial points, oldest first.
#[derive(Debug, Clone, Default)]
pub struct TrialHistory {
    points: VecDeque<TrialPoint>,
}

impl TrialHistory {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Append a point, evicting the oldest once the buffer is full.
    pub fn push(&mut self, point: TrialPoint) {
        if self.points.len() == HISTORY_CAPACITY {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent point.
    pub fn last(&self) -> Option<&TrialPoint> {
        self.points.back()
    }

    /// The point before the most recent one.
    pub fn previous(&self) -> Option<&TrialPoint> {
        let n = self.points.len();
        if n >= 2 {
            self.points.get(n - 2)
        } else {
            None
        }
    }

    /// Length of the most recent step in line units.
    pub fn last_step(&self) -> Option<f64> {
        match (self.previous(), self.last()) {
            (Some(prev), Some(last)) => Some((last.a - prev.a).abs()),
            _ => None,
        }
    }

    /// Points in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TrialPoint> {
        self.points.iter()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
