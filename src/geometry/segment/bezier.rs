use crate::config::{SamplingConfig, BEZIER_RESOLUTION};
use crate::error::{GeometryError, Result};
use crate::math::{cross_2d, Point2, Vector2, TOLERANCE};

use super::table::DistanceTable;
use super::{PathPoint, PathSegment};

/// Control polygon of a quadratic or cubic Bézier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPoints {
    Quadratic([Point2; 3]),
    Cubic([Point2; 4]),
}

impl ControlPoints {
    /// Position `B(t)` in the Bernstein basis.
    #[must_use]
    pub fn position(&self, t: f64) -> Point2 {
        let mt = 1.0 - t;
        match self {
            Self::Quadratic([p0, p1, p2]) => Point2::from(
                p0.coords * (mt * mt) + p1.coords * (2.0 * mt * t) + p2.coords * (t * t),
            ),
            Self::Cubic([p0, p1, p2, p3]) => Point2::from(
                p0.coords * (mt * mt * mt)
                    + p1.coords * (3.0 * mt * mt * t)
                    + p2.coords * (3.0 * mt * t * t)
                    + p3.coords * (t * t * t),
            ),
        }
    }

    /// First derivative `B'(t)`.
    #[must_use]
    pub fn derivative(&self, t: f64) -> Vector2 {
        let mt = 1.0 - t;
        match self {
            Self::Quadratic([p0, p1, p2]) => (p1 - p0) * (2.0 * mt) + (p2 - p1) * (2.0 * t),
            Self::Cubic([p0, p1, p2, p3]) => {
                (p1 - p0) * (3.0 * mt * mt) + (p2 - p1) * (6.0 * mt * t) + (p3 - p2) * (3.0 * t * t)
            }
        }
    }

    /// Second derivative `B''(t)`.
    #[must_use]
    pub fn second_derivative(&self, t: f64) -> Vector2 {
        match self {
            Self::Quadratic([p0, p1, p2]) => (p2.coords - p1.coords * 2.0 + p0.coords) * 2.0,
            Self::Cubic([p0, p1, p2, p3]) => {
                (p2.coords - p1.coords * 2.0 + p0.coords) * (6.0 * (1.0 - t))
                    + (p3.coords - p2.coords * 2.0 + p1.coords) * (6.0 * t)
            }
        }
    }

    /// Signed curvature `(B' × B'') / |B'|³`.
    ///
    /// Where the derivative vanishes the result is an infinity carrying the
    /// sign of the numerator.
    #[must_use]
    pub fn curvature(&self, t: f64) -> f64 {
        let d = self.derivative(t);
        let dd = self.second_derivative(t);
        let numerator = cross_2d(&d, &dd);
        let denominator = d.norm().powi(3);
        if denominator <= 0.0 {
            if numerator < 0.0 {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        } else {
            numerator / denominator
        }
    }

    fn first(&self) -> Point2 {
        match self {
            Self::Quadratic(p) => p[0],
            Self::Cubic(p) => p[0],
        }
    }

    fn last(&self) -> Point2 {
        match self {
            Self::Quadratic(p) => p[2],
            Self::Cubic(p) => p[3],
        }
    }
}

/// A quadratic or cubic Bézier segment.
///
/// Arc length is approximated by a table of cumulative chord lengths at
/// uniformly spaced `t`, built once at construction. Distances between table
/// entries are interpolated linearly, so lookups carry an error that shrinks
/// with the table resolution.
#[derive(Debug, Clone)]
pub struct BezierCurve {
    control_points: ControlPoints,
    table: DistanceTable,
    length: f64,
}

impl BezierCurve {
    /// Creates a curve from 3 (quadratic) or 4 (cubic) control points.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of control points is not 3 or 4, or the
    /// curve has zero length.
    pub fn new(points: &[Point2]) -> Result<Self> {
        Self::with_resolution(points, BEZIER_RESOLUTION)
    }

    /// Creates a quadratic curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve has zero length.
    pub fn quadratic(start: Point2, control: Point2, end: Point2) -> Result<Self> {
        Self::new(&[start, control, end])
    }

    /// Creates a cubic curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve has zero length.
    pub fn cubic(start: Point2, c1: Point2, c2: Point2, end: Point2) -> Result<Self> {
        Self::new(&[start, c1, c2, end])
    }

    /// Creates a curve using the configured table resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of control points is not 3 or 4, or the
    /// curve has zero length.
    pub fn with_config(points: &[Point2], config: &SamplingConfig) -> Result<Self> {
        Self::with_resolution(points, config.bezier_resolution)
    }

    /// Creates a curve whose distance table has `resolution` steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of control points is not 3 or 4, or the
    /// curve has zero length.
    #[allow(clippy::cast_precision_loss)]
    pub fn with_resolution(points: &[Point2], resolution: usize) -> Result<Self> {
        let control_points = match *points {
            [p0, p1, p2] => ControlPoints::Quadratic([p0, p1, p2]),
            [p0, p1, p2, p3] => ControlPoints::Cubic([p0, p1, p2, p3]),
            _ => {
                return Err(GeometryError::Degenerate(format!(
                    "bezier curve needs 3 or 4 control points, got {}",
                    points.len()
                ))
                .into())
            }
        };

        let resolution = resolution.max(1);
        let table = DistanceTable::from_samples(
            (0..=resolution).map(|i| control_points.position(i as f64 / resolution as f64)),
        );
        let length = table.total();
        if length < TOLERANCE {
            return Err(
                GeometryError::Degenerate("bezier control points produce zero length".into())
                    .into(),
            );
        }
        tracing::trace!(resolution, length, "built bezier distance table");

        Ok(Self {
            control_points,
            table,
            length,
        })
    }

    /// Returns the control polygon.
    #[must_use]
    pub fn control_points(&self) -> &ControlPoints {
        &self.control_points
    }

    /// Returns the curvature at `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` lies outside `[0, 1]`.
    pub fn curvature(&self, t: f64) -> Result<f64> {
        GeometryError::check_range("t", t, 0.0, 1.0)?;
        Ok(self.control_points.curvature(t))
    }

    #[allow(clippy::cast_precision_loss)]
    fn steps(&self) -> f64 {
        self.table.steps() as f64
    }
}

impl PathSegment for BezierCurve {
    fn length(&self) -> f64 {
        self.length
    }

    fn start(&self) -> Point2 {
        self.control_points.first()
    }

    fn end(&self) -> Point2 {
        self.control_points.last()
    }

    fn pathpoint_at_t(&self, t: f64) -> Result<PathPoint> {
        GeometryError::check_range("t", t, 0.0, 1.0)?;
        Ok(PathPoint {
            t,
            position: self.control_points.position(t),
            tangent: self.control_points.derivative(t),
            curvature: self.control_points.curvature(t),
            distance: self.table.distance_at(t * self.steps()),
        })
    }

    fn t_at_length(&self, distance: f64) -> Result<f64> {
        GeometryError::check_range("distance", distance, 0.0, self.length)?;
        Ok((self.table.position_of(distance) / self.steps()).min(1.0))
    }

    fn length_at_t(&self, t: f64) -> Result<f64> {
        GeometryError::check_range("t", t, 0.0, 1.0)?;
        Ok(self.table.distance_at(t * self.steps()))
    }
}
