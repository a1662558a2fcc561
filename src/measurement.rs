//! Derived data products computed by driving the scheduler: inter-
//! collision time histograms, plus the small numeric helpers its tests
//! rely on.

use serde::{Deserialize, Serialize};

/// Equal-width histogram of inter-collision time gaps over `[t_min, t_max]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub centers: Vec<f64>,
    pub counts: Vec<u64>,
    pub width: f64,
}

impl Histogram {
    pub fn new(t_min: f64, t_max: f64, bins: usize) -> Self {
        let width = (t_max - t_min) / bins as f64;
        let centers = (0..bins)
            .map(|i| t_min + width * (i as f64 + 0.5))
            .collect();
        Histogram {
            centers,
            counts: vec![0; bins],
            width,
        }
    }

    /// Out-of-range values are silently discarded, matching the source's
    /// distributional sampling (it only ever plots what falls in range).
    pub fn record(&mut self, t_min: f64, t_max: f64, value: f64) {
        if value < t_min || value >= t_max || self.width <= 0.0 {
            return;
        }
        let bin = ((value - t_min) / self.width) as usize;
        if let Some(count) = self.counts.get_mut(bin.min(self.counts.len() - 1)) {
            *count += 1;
        }
    }
}

/// Greatest integer `n` such that `n*n <= x`, ported from the source's
/// `prelude.floor_sqrt`. Retained as one of this crate's testable
/// properties: `floor_sqrt(k*k) == k` and `floor_sqrt(k*k - 1) == k - 1`
/// for every `k >= 1`.
pub fn floor_sqrt(x: u64) -> u64 {
    if x == 0 {
        return 0;
    }
    let mut left = 1u64;
    let mut right = x;
    while right - left > 1 {
        let mid = left + (right - left) / 2;
        let squared = mid * mid;
        if squared == x {
            return mid;
        }
        if squared > x {
            right = mid;
        } else {
            left = mid;
        }
    }
    left
}
