use crate::math::Point2;

/// Cumulative chord lengths sampled at uniform parameter steps.
///
/// Entry `i` holds the polyline length from the first sample to sample `i`,
/// so the table starts at `0.0` and never decreases. Positions into the table
/// are fractional step indices in `[0, steps]`.
#[derive(Debug, Clone)]
pub(crate) struct DistanceTable {
    distances: Vec<f64>,
}

impl DistanceTable {
    /// Builds the table from consecutive samples along a curve.
    pub(crate) fn from_samples(samples: impl IntoIterator<Item = Point2>) -> Self {
        let mut samples = samples.into_iter();
        let mut distances = vec![0.0];
        if let Some(mut prev) = samples.next() {
            let mut total = 0.0;
            for pt in samples {
                total += (pt - prev).norm();
                distances.push(total);
                prev = pt;
            }
        }
        Self { distances }
    }

    /// Number of uniform steps covered by the table.
    pub(crate) fn steps(&self) -> usize {
        self.distances.len() - 1
    }

    /// Total length, the last entry.
    pub(crate) fn total(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Cumulative distance at a fractional step position, interpolated
    /// linearly inside the bracketing step.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub(crate) fn distance_at(&self, position: f64) -> f64 {
        let steps = self.steps();
        if steps == 0 || position <= 0.0 {
            return 0.0;
        }
        if position >= steps as f64 {
            return self.total();
        }
        let idx = (position.floor() as usize).min(steps - 1);
        let frac = position - idx as f64;
        let lo = self.distances[idx];
        lo + frac * (self.distances[idx + 1] - lo)
    }

    /// Inverse of [`distance_at`](Self::distance_at): the fractional step
    /// position at which the cumulative distance reaches `distance`.
    ///
    /// Binary search finds the bracketing entries, then the position is
    /// interpolated linearly between them.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn position_of(&self, distance: f64) -> f64 {
        let steps = self.steps();
        if steps == 0 || distance <= 0.0 {
            return 0.0;
        }
        if distance >= self.total() {
            return steps as f64;
        }
        // First entry strictly greater than `distance`; entry 0 is 0.0, so hi >= 1.
        let hi = self.distances.partition_point(|&d| d <= distance).clamp(1, steps);
        let lo = hi - 1;
        let step_dist = self.distances[hi] - self.distances[lo];
        if step_dist <= 0.0 {
            return lo as f64;
        }
        lo as f64 + (distance - self.distances[lo]) / step_dist
    }
}
