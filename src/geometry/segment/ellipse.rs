use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::config::{SamplingConfig, ELLIPSE_RESOLUTION};
use crate::error::{GeometryError, Result};
use crate::math::{normalize_angle, Point2, Vector2, TOLERANCE};

use super::table::DistanceTable;

/// An axis-aligned ellipse centered at the origin.
///
/// Points are addressed by the parametric angle θ, where the point is
/// `(x_radius * cos θ, y_radius * sin θ)`. This differs from the geometric
/// angle measured from the center to the point; see
/// [`theta_at_angle`](Self::theta_at_angle).
///
/// Arc lengths come from a table of cumulative chord lengths at uniform θ
/// steps over a full turn, built once at construction.
#[derive(Debug, Clone)]
pub struct Ellipse {
    x_radius: f64,
    y_radius: f64,
    angle_step: f64,
    table: DistanceTable,
}

impl Ellipse {
    /// Creates a new ellipse with the default table resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is non-positive or not finite.
    pub fn new(x_radius: f64, y_radius: f64) -> Result<Self> {
        Self::with_resolution(x_radius, y_radius, ELLIPSE_RESOLUTION)
    }

    /// Creates a new ellipse whose distance table has `resolution` steps.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is non-positive or not finite.
    #[allow(clippy::cast_precision_loss)]
    pub fn with_resolution(x_radius: f64, y_radius: f64, resolution: usize) -> Result<Self> {
        if !(x_radius >= TOLERANCE && x_radius.is_finite()) {
            return Err(GeometryError::Degenerate("x radius must be positive".into()).into());
        }
        if !(y_radius >= TOLERANCE && y_radius.is_finite()) {
            return Err(GeometryError::Degenerate("y radius must be positive".into()).into());
        }

        let resolution = resolution.max(1);
        let angle_step = TAU / resolution as f64;
        let table = DistanceTable::from_samples((0..=resolution).map(|i| {
            let theta = i as f64 * angle_step;
            Point2::new(x_radius * theta.cos(), y_radius * theta.sin())
        }));
        tracing::debug!(
            x_radius,
            y_radius,
            resolution,
            circumference = table.total(),
            "built ellipse distance table"
        );

        Ok(Self {
            x_radius,
            y_radius,
            angle_step,
            table,
        })
    }

    /// Returns the radius along the x axis.
    #[must_use]
    pub fn x_radius(&self) -> f64 {
        self.x_radius
    }

    /// Returns the radius along the y axis.
    #[must_use]
    pub fn y_radius(&self) -> f64 {
        self.y_radius
    }

    /// Returns the length of the full ellipse.
    #[must_use]
    pub fn circumference(&self) -> f64 {
        self.table.total()
    }

    /// Curvature at parametric angle `theta`; always positive.
    #[must_use]
    pub fn curvature(&self, theta: f64) -> f64 {
        let (sin, cos) = theta.sin_cos();
        let a = self.x_radius;
        let b = self.y_radius;
        (a * b) / (b * b * cos * cos + a * a * sin * sin).powf(1.5)
    }

    /// Derivative of the position with respect to `theta`, pointing
    /// counter-clockwise.
    #[must_use]
    pub fn tangent(&self, theta: f64) -> Vector2 {
        let (sin, cos) = theta.sin_cos();
        Vector2::new(-self.x_radius * sin, self.y_radius * cos)
    }

    /// Position of the point at parametric angle `theta`.
    #[must_use]
    pub fn coordinate_at_theta(&self, theta: f64) -> Point2 {
        Point2::new(self.x_radius * theta.cos(), self.y_radius * theta.sin())
    }

    /// Converts a geometric angle into the parametric angle of the same point.
    ///
    /// This is `atan(x_radius / y_radius * tan(angle))` with a quadrant
    /// correction that keeps θ increasing with the angle over a full turn.
    /// Using `atan2` on the scaled sine and cosine gives the corrected value
    /// directly and stays finite where `tan` has its poles. The result lies in
    /// `[0, 2π)`.
    #[must_use]
    pub fn theta_at_angle(&self, angle: f64) -> f64 {
        let (sin, cos) = normalize_angle(angle).sin_cos();
        normalize_angle((self.x_radius * sin).atan2(self.y_radius * cos))
    }

    /// Arc length travelled counter-clockwise from `theta_start` to `theta_end`.
    ///
    /// Both angles are wrapped into `[0, 2π)`. When `theta_end` is below
    /// `theta_start` the path passes through θ = 0.
    #[must_use]
    pub fn dist_from_theta(&self, theta_start: f64, theta_end: f64) -> f64 {
        let theta_start = normalize_angle(theta_start);
        let theta_end = normalize_angle(theta_end);
        let start_dist = self.distance_at_theta(theta_start);
        let end_dist = self.distance_at_theta(theta_end);
        if theta_start <= theta_end {
            end_dist - start_dist
        } else {
            self.circumference() - start_dist + end_dist
        }
    }

    /// Parametric angle reached after travelling `dist` counter-clockwise
    /// from `theta_start`. The result lies in `[0, 2π]`.
    #[must_use]
    pub fn theta_from_dist(&self, theta_start: f64, dist: f64) -> f64 {
        let circumference = self.circumference();
        let mut end_dist = self.distance_at_theta(normalize_angle(theta_start)) + dist;
        if end_dist > circumference {
            end_dist -= circumference;
        }
        self.table.position_of(end_dist) * self.angle_step
    }

    fn distance_at_theta(&self, theta: f64) -> f64 {
        self.table.distance_at(theta / self.angle_step)
    }
}

/// Shared store of [`Ellipse`]s keyed by their radius pair.
///
/// Building an ellipse distance table is expensive, so arcs with identical
/// radii share one instance. Entries are never removed or replaced. Lookup
/// and insertion happen under a single lock, so concurrent callers never
/// build the same ellipse twice.
#[derive(Debug)]
pub struct EllipseCache {
    resolution: usize,
    ellipses: Mutex<HashMap<(u64, u64), Arc<Ellipse>>>,
}

impl EllipseCache {
    /// Creates an empty cache using the default table resolution.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&SamplingConfig::default())
    }

    /// Creates an empty cache whose ellipses use the configured resolution.
    #[must_use]
    pub fn with_config(config: &SamplingConfig) -> Self {
        Self {
            resolution: config.ellipse_resolution.max(1),
            ellipses: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the process-wide cache.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<EllipseCache> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Returns the ellipse for `(x_radius, y_radius)`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is non-positive or not finite.
    pub fn get_or_create(&self, x_radius: f64, y_radius: f64) -> Result<Arc<Ellipse>> {
        let key = (x_radius.to_bits(), y_radius.to_bits());
        // Entries are immutable once inserted, so a poisoned map is still consistent.
        let mut ellipses = self.ellipses.lock().unwrap_or_else(PoisonError::into_inner);
        match ellipses.entry(key) {
            Entry::Occupied(entry) => {
                tracing::trace!(x_radius, y_radius, "ellipse cache hit");
                Ok(Arc::clone(entry.get()))
            }
            Entry::Vacant(entry) => {
                let ellipse = Arc::new(Ellipse::with_resolution(
                    x_radius,
                    y_radius,
                    self.resolution,
                )?);
                entry.insert(Arc::clone(&ellipse));
                Ok(ellipse)
            }
        }
    }

    /// Returns the number of cached ellipses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ellipses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns whether the cache holds no ellipses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EllipseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn pretty_close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn coordinate_at_theta() {
        let ell = Ellipse::new(12.0, 8.0).unwrap();
        assert_eq!(ell.coordinate_at_theta(0.0), Point2::new(12.0, 0.0));
        assert_abs_diff_eq!(
            ell.coordinate_at_theta(FRAC_PI_2),
            Point2::new(0.0, 8.0),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            ell.coordinate_at_theta(PI),
            Point2::new(-12.0, 0.0),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            ell.coordinate_at_theta(3.0 * FRAC_PI_2),
            Point2::new(0.0, -8.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn circle_lengths() {
        let circle = Ellipse::new(10.0, 10.0).unwrap();
        assert!(pretty_close(circle.circumference(), 20.0 * PI), "circumference");
        assert!(pretty_close(circle.dist_from_theta(0.0, PI), 10.0 * PI), "0 -> pi");
        assert!(
            pretty_close(circle.dist_from_theta(3.0 * FRAC_PI_2, 0.0), 5.0 * PI),
            "3pi/2 -> 0"
        );
        assert!(pretty_close(circle.theta_from_dist(0.0, 10.0 * PI), PI));
    }

    #[test]
    fn dist_from_theta_interpolates_inside_steps() {
        let circle = Ellipse::new(1.0, 1.0).unwrap();
        let step = TAU / 1024.0;
        let quarter_step = circle.dist_from_theta(0.0, step / 4.0);
        let full_step = circle.dist_from_theta(0.0, step);
        assert_relative_eq!(quarter_step * 4.0, full_step, epsilon = 1e-12);
    }

    #[test]
    fn dist_from_theta_wraps_and_normalizes() {
        let ell = Ellipse::new(7.0, 3.0).unwrap();
        let c = ell.circumference();
        let forward = ell.dist_from_theta(1.0, 5.0);
        let wrapped = ell.dist_from_theta(5.0, 1.0);
        assert_relative_eq!(forward + wrapped, c, epsilon = 1e-9);
        assert_relative_eq!(
            ell.dist_from_theta(1.0 - TAU, 5.0 + TAU),
            forward,
            epsilon = 1e-9
        );
    }

    #[test]
    fn theta_from_dist_inverts_dist_from_theta() {
        let ell = Ellipse::new(20.0, 10.0).unwrap();
        for &(start, end) in &[(0.0, 1.0), (0.5, 3.0), (2.0, 6.0), (5.0, 1.0), (6.0, 0.2)] {
            let d = ell.dist_from_theta(start, end);
            let theta = ell.theta_from_dist(start, d);
            assert_abs_diff_eq!(normalize_angle(theta), end, epsilon = 1e-9);
        }
    }

    #[test]
    fn theta_at_angle() {
        let ell = Ellipse::new(20.0, 10.0).unwrap();
        assert_eq!(ell.theta_at_angle(0.0), 0.0);
        assert_eq!(ell.theta_at_angle(FRAC_PI_2), FRAC_PI_2);
        assert!(pretty_close(ell.theta_at_angle(PI), PI));
        assert_eq!(ell.theta_at_angle(3.0 * FRAC_PI_2), 3.0 * FRAC_PI_2);
        assert_eq!(ell.theta_at_angle(PI / 4.0), 2.0_f64.atan());
    }

    #[test]
    fn theta_at_angle_is_monotonic_and_handles_negative_angles() {
        let ell = Ellipse::new(20.0, 10.0).unwrap();
        let mut prev = -1.0;
        for i in 0..360 {
            let theta = ell.theta_at_angle(f64::from(i).to_radians());
            assert!(theta > prev, "not increasing at {i} degrees");
            prev = theta;
        }
        // -45 degrees is the same point as 315 degrees.
        assert_relative_eq!(
            ell.theta_at_angle(-PI / 4.0),
            ell.theta_at_angle(7.0 * PI / 4.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn theta_at_angle_lands_on_the_ray() {
        let ell = Ellipse::new(20.0, 10.0).unwrap();
        for &angle in &[0.3, 1.2, 2.5, 3.5, 4.4, 5.9] {
            let p = ell.coordinate_at_theta(ell.theta_at_angle(angle));
            assert_relative_eq!(p.y.atan2(p.x).rem_euclid(TAU), angle, epsilon = 1e-12);
        }
    }

    #[test]
    fn curvature() {
        let ell = Ellipse::new(20.0, 10.0).unwrap();
        assert_eq!(ell.curvature(0.0), 1.0 / 5.0);
        assert_eq!(ell.curvature(FRAC_PI_2), 1.0 / 40.0);
        assert_eq!(ell.curvature(PI), 1.0 / 5.0);
        assert_eq!(ell.curvature(3.0 * FRAC_PI_2), 1.0 / 40.0);
    }

    #[test]
    fn tangent_is_counter_clockwise() {
        let ell = Ellipse::new(4.0, 2.0).unwrap();
        assert_abs_diff_eq!(ell.tangent(0.0), Vector2::new(0.0, 2.0), epsilon = 1e-12);
        assert_abs_diff_eq!(ell.tangent(FRAC_PI_2), Vector2::new(-4.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn rejects_non_positive_radii() {
        assert!(Ellipse::new(0.0, 1.0).is_err());
        assert!(Ellipse::new(1.0, -2.0).is_err());
        assert!(Ellipse::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn cache_reuses_instances() {
        let cache = EllipseCache::new();
        assert!(cache.is_empty());
        let a = cache.get_or_create(5.0, 3.0).unwrap();
        let b = cache.get_or_create(5.0, 3.0).unwrap();
        let c = cache.get_or_create(3.0, 5.0).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cache_does_not_store_failures() {
        let cache = EllipseCache::new();
        assert!(cache.get_or_create(0.0, 3.0).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_is_shared_across_threads() {
        let cache = EllipseCache::with_config(&SamplingConfig::new(10, 64));
        let ellipses: Vec<Arc<Ellipse>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.get_or_create(2.0, 1.0).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(cache.len(), 1);
        assert!(ellipses.iter().all(|e| Arc::ptr_eq(e, &ellipses[0])));
    }
}
