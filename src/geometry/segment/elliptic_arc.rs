use std::f64::consts::TAU;
use std::sync::Arc;

use crate::error::{GeometryError, Result};
use crate::math::{cross_2d, polar_angle, rotate, Point2, Vector2, TOLERANCE};

use super::ellipse::{Ellipse, EllipseCache};
use super::{PathPoint, PathSegment};

/// Flags resolving which of the four candidate arcs an endpoint
/// description refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArcFlags {
    /// Traverse in the direction of increasing angle (clockwise on a y-down screen).
    pub positive_sweep: bool,
    /// Take the arc spanning more than half a turn.
    pub large_arc: bool,
}

impl ArcFlags {
    /// Creates a new set of flags.
    #[must_use]
    pub fn new(positive_sweep: bool, large_arc: bool) -> Self {
        Self {
            positive_sweep,
            large_arc,
        }
    }

    /// Whether the center lies to the left of the start-to-end chord.
    fn center_on_left(self) -> bool {
        self.positive_sweep != self.large_arc
    }
}

/// An elliptical arc described by its endpoints, as in path data.
///
/// Construction converts the endpoint description into a center, radii and
/// a pair of parametric angles on a shared [`Ellipse`], which answers all
/// length and curvature queries.
#[derive(Debug, Clone)]
pub struct EllipticArc {
    start: Point2,
    end: Point2,
    x_radius: f64,
    y_radius: f64,
    axis_rotation: f64,
    flags: ArcFlags,
    center: Point2,
    start_theta: f64,
    end_theta: f64,
    length: f64,
    ellipse: Arc<Ellipse>,
}

impl EllipticArc {
    /// Creates a new arc sharing ellipses through the process-wide cache.
    ///
    /// `axis_rotation` is in degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints coincide or a radius is non-positive.
    pub fn new(
        start: Point2,
        end: Point2,
        x_radius: f64,
        y_radius: f64,
        axis_rotation: f64,
        flags: ArcFlags,
    ) -> Result<Self> {
        Self::with_cache(
            start,
            end,
            x_radius,
            y_radius,
            axis_rotation,
            flags,
            EllipseCache::global(),
        )
    }

    /// Creates a new arc whose ellipse comes from `cache`.
    ///
    /// # Arguments
    ///
    /// * `start` - Start point of the arc
    /// * `end` - End point of the arc
    /// * `x_radius`, `y_radius` - Requested radii; scaled up uniformly when
    ///   too small to span the endpoints
    /// * `axis_rotation` - Rotation of the ellipse x axis, in degrees
    /// * `flags` - Sweep direction and large-arc selection
    /// * `cache` - Store the underlying ellipse is taken from
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints coincide or a radius is non-positive.
    pub fn with_cache(
        start: Point2,
        end: Point2,
        x_radius: f64,
        y_radius: f64,
        axis_rotation: f64,
        flags: ArcFlags,
        cache: &EllipseCache,
    ) -> Result<Self> {
        if !(x_radius >= TOLERANCE && y_radius >= TOLERANCE) {
            return Err(GeometryError::Degenerate("arc radii must be positive".into()).into());
        }
        let rotation = axis_rotation.to_radians();

        // Work in a frame aligned with the ellipse axes, with the start point at the origin.
        let end_offset = rotate(&(end - start), -rotation);
        if end_offset.norm() < TOLERANCE {
            return Err(GeometryError::Degenerate("arc endpoints coincide".into()).into());
        }
        let (x_radius, y_radius) = fit_radii(&end_offset, x_radius, y_radius);

        let (c1, c2) = candidate_centers(&end_offset, x_radius, y_radius);
        let (left, right) = if cross_2d(&end_offset, &c1) > 0.0 {
            (c1, c2)
        } else {
            (c2, c1)
        };
        let center_offset = if flags.center_on_left() { left } else { right };

        let ellipse = cache.get_or_create(x_radius, y_radius)?;
        let start_theta = ellipse.theta_at_angle(polar_angle(&-center_offset));
        let end_theta = ellipse.theta_at_angle(polar_angle(&(end_offset - center_offset)));
        let center = start + rotate(&center_offset, rotation);

        let length = if flags.positive_sweep {
            ellipse.dist_from_theta(start_theta, end_theta)
        } else {
            ellipse.dist_from_theta(end_theta, start_theta)
        };

        Ok(Self {
            start,
            end,
            x_radius,
            y_radius,
            axis_rotation: rotation,
            flags,
            center,
            start_theta,
            end_theta,
            length,
            ellipse,
        })
    }

    /// Returns the center of the underlying ellipse.
    #[must_use]
    pub fn center(&self) -> Point2 {
        self.center
    }

    /// Returns the x radius actually used, after any scaling.
    #[must_use]
    pub fn x_radius(&self) -> f64 {
        self.x_radius
    }

    /// Returns the y radius actually used, after any scaling.
    #[must_use]
    pub fn y_radius(&self) -> f64 {
        self.y_radius
    }

    /// Returns the rotation of the ellipse x axis in radians.
    #[must_use]
    pub fn axis_rotation(&self) -> f64 {
        self.axis_rotation
    }

    /// Returns the sweep and large-arc flags the arc was built with.
    #[must_use]
    pub fn flags(&self) -> ArcFlags {
        self.flags
    }

    /// Parametric angle of the start point, in `[0, 2π)`.
    #[must_use]
    pub fn start_theta(&self) -> f64 {
        self.start_theta
    }

    /// Parametric angle of the end point, in `[0, 2π)`.
    #[must_use]
    pub fn end_theta(&self) -> f64 {
        self.end_theta
    }

    /// Returns the shared ellipse.
    #[must_use]
    pub fn ellipse(&self) -> &Ellipse {
        &self.ellipse
    }

    /// Signed parametric angle swept from start to end; negative for
    /// clockwise traversal.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        let mut end = self.end_theta;
        if self.flags.positive_sweep && end < self.start_theta {
            end += TAU;
        } else if !self.flags.positive_sweep && end > self.start_theta {
            end -= TAU;
        }
        end - self.start_theta
    }

    /// Converts the arc parameter `t` into a parametric angle on the ellipse.
    #[must_use]
    pub fn t_to_theta(&self, t: f64) -> f64 {
        self.start_theta + self.sweep() * t
    }

    /// Converts a parametric angle on the ellipse back into the arc parameter.
    ///
    /// Angles outside the arc snap to whichever endpoint is closer in angle.
    #[must_use]
    pub fn theta_to_t(&self, theta: f64) -> f64 {
        let sweep = self.sweep();
        if sweep.abs() < TOLERANCE {
            return 0.0;
        }
        let delta = if sweep > 0.0 {
            (theta - self.start_theta).rem_euclid(TAU)
        } else {
            -(self.start_theta - theta).rem_euclid(TAU)
        };
        let gap = TAU - sweep.abs();
        if delta.abs() > sweep.abs() + gap / 2.0 {
            return 0.0;
        }
        (delta / sweep).clamp(0.0, 1.0)
    }

    /// Signed curvature at `t`; negative for clockwise traversal.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` lies outside `[0, 1]`.
    pub fn curvature(&self, t: f64) -> Result<f64> {
        GeometryError::check_range("t", t, 0.0, 1.0)?;
        Ok(self.curvature_at_theta(self.t_to_theta(t)))
    }

    /// Derivative of the position with respect to `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` lies outside `[0, 1]`.
    pub fn tangent(&self, t: f64) -> Result<Vector2> {
        GeometryError::check_range("t", t, 0.0, 1.0)?;
        Ok(self.tangent_at_theta(self.t_to_theta(t)))
    }

    fn curvature_at_theta(&self, theta: f64) -> f64 {
        self.ellipse.curvature(theta).copysign(self.sweep())
    }

    fn tangent_at_theta(&self, theta: f64) -> Vector2 {
        rotate(&self.ellipse.tangent(theta), self.axis_rotation) * self.sweep()
    }

    fn distance_at_theta(&self, theta: f64) -> f64 {
        if self.flags.positive_sweep {
            self.ellipse.dist_from_theta(self.start_theta, theta)
        } else {
            self.ellipse.dist_from_theta(theta, self.start_theta)
        }
    }
}

/// Scales the radii up uniformly when no ellipse with the requested radii
/// passes through both the origin and `chord`.
fn fit_radii(chord: &Vector2, x_radius: f64, y_radius: f64) -> (f64, f64) {
    let half = chord / 2.0;
    let lambda = (half.x / x_radius).powi(2) + (half.y / y_radius).powi(2);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        tracing::debug!(x_radius, y_radius, scale, "arc radii too small, scaling up");
        (x_radius * scale, y_radius * scale)
    } else {
        (x_radius, y_radius)
    }
}

/// Centers of the two axis-aligned ellipses with the given radii that pass
/// through both the origin and `chord`.
///
/// The centers sit symmetrically about the chord midpoint. The discriminant
/// is clamped at zero, where both candidates coincide at the midpoint.
fn candidate_centers(chord: &Vector2, x_radius: f64, y_radius: f64) -> (Vector2, Vector2) {
    let (tx, ty) = (chord.x, chord.y);
    let rx2 = x_radius * x_radius;
    let ry2 = y_radius * y_radius;
    let ff = rx2 * ty * ty + ry2 * tx * tx;
    let root = (ff * (4.0 * rx2 * ry2 - ff)).max(0.0).sqrt();
    let k = root / (2.0 * ff);

    let half = chord / 2.0;
    let shift = Vector2::new(-x_radius / y_radius * ty * k, y_radius / x_radius * tx * k);
    (half + shift, half - shift)
}

impl PathSegment for EllipticArc {
    fn length(&self) -> f64 {
        self.length
    }

    fn start(&self) -> Point2 {
        self.start
    }

    fn end(&self) -> Point2 {
        self.end
    }

    fn pathpoint_at_t(&self, t: f64) -> Result<PathPoint> {
        GeometryError::check_range("t", t, 0.0, 1.0)?;
        let theta = self.t_to_theta(t);
        let local = self.ellipse.coordinate_at_theta(theta).coords;
        Ok(PathPoint {
            t,
            position: self.center + rotate(&local, self.axis_rotation),
            tangent: self.tangent_at_theta(theta),
            curvature: self.curvature_at_theta(theta),
            distance: self.length_at_t(t)?,
        })
    }

    fn t_at_length(&self, distance: f64) -> Result<f64> {
        GeometryError::check_range("distance", distance, 0.0, self.length)?;
        if distance >= self.length {
            return Ok(1.0);
        }
        let theta = if self.flags.positive_sweep {
            self.ellipse.theta_from_dist(self.start_theta, distance)
        } else {
            // Clockwise from the start is counter-clockwise from the end.
            self.ellipse.theta_from_dist(self.end_theta, self.length - distance)
        };
        Ok(self.theta_to_t(theta))
    }

    fn length_at_t(&self, t: f64) -> Result<f64> {
        GeometryError::check_range("t", t, 0.0, 1.0)?;
        if t >= 1.0 {
            return Ok(self.length);
        }
        Ok(self.distance_at_theta(self.t_to_theta(t)).min(self.length))
    }
}
