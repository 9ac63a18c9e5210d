/// Default number of chord samples in a Bézier arc-length table.
pub const BEZIER_RESOLUTION: usize = 10;

/// Default number of chord samples around an ellipse circumference.
pub const ELLIPSE_RESOLUTION: usize = 1024;

/// Upper bound on the number of samples a single `subdivide` call produces.
pub const MAX_SUBDIVISIONS: usize = 1 << 24;

/// Resolution of the cumulative-distance tables built by segments.
///
/// Higher resolutions shrink the interpolation error of length lookups at the
/// cost of memory and construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    /// Number of uniform `t` steps in a Bézier distance table.
    pub bezier_resolution: usize,
    /// Number of uniform θ steps in an ellipse distance table.
    pub ellipse_resolution: usize,
}

impl SamplingConfig {
    /// Creates a configuration with explicit resolutions.
    ///
    /// Zero resolutions are raised to one step.
    #[must_use]
    pub fn new(bezier_resolution: usize, ellipse_resolution: usize) -> Self {
        Self {
            bezier_resolution: bezier_resolution.max(1),
            ellipse_resolution: ellipse_resolution.max(1),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            bezier_resolution: BEZIER_RESOLUTION,
            ellipse_resolution: ELLIPSE_RESOLUTION,
        }
    }
}
