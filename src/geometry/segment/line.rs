use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{PathPoint, PathSegment};

/// A straight segment between two points.
///
/// The parametric form is: `P(t) = start + t * (end - start)`, so `t` is
/// already proportional to arc length.
#[derive(Debug, Clone)]
pub struct Line {
    start: Point2,
    end: Point2,
}

impl Line {
    /// Creates a new line segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints coincide.
    pub fn new(start: Point2, end: Point2) -> Result<Self> {
        if (end - start).norm() < TOLERANCE {
            return Err(GeometryError::Degenerate("line endpoints coincide".into()).into());
        }
        Ok(Self { start, end })
    }

    /// Returns the constant direction `end - start`.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.end - self.start
    }
}

impl PathSegment for Line {
    fn length(&self) -> f64 {
        self.direction().norm()
    }

    fn start(&self) -> Point2 {
        self.start
    }

    fn end(&self) -> Point2 {
        self.end
    }

    fn pathpoint_at_t(&self, t: f64) -> Result<PathPoint> {
        GeometryError::check_range("t", t, 0.0, 1.0)?;
        let direction = self.direction();
        Ok(PathPoint {
            t,
            position: self.start + direction * t,
            tangent: direction,
            curvature: 0.0,
            distance: t * direction.norm(),
        })
    }

    fn t_at_length(&self, distance: f64) -> Result<f64> {
        let length = self.length();
        GeometryError::check_range("distance", distance, 0.0, length)?;
        Ok(distance / length)
    }

    fn length_at_t(&self, t: f64) -> Result<f64> {
        GeometryError::check_range("t", t, 0.0, 1.0)?;
        Ok(t * self.length())
    }
}
