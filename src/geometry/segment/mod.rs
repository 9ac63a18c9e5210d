mod bezier;
mod ellipse;
mod elliptic_arc;
mod line;
mod table;

pub use bezier::{BezierCurve, ControlPoints};
pub use ellipse::{Ellipse, EllipseCache};
pub use elliptic_arc::{ArcFlags, EllipticArc};
pub use line::Line;

use crate::config::MAX_SUBDIVISIONS;
use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2};

/// A sample on a path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    /// Segment parameter in `[0, 1]`.
    pub t: f64,
    /// Position of the sample.
    pub position: Point2,
    /// Derivative of the position with respect to `t`.
    pub tangent: Vector2,
    /// Signed curvature; positive when the segment turns counter-clockwise.
    pub curvature: f64,
    /// Arc length travelled from the segment start to this sample.
    pub distance: f64,
}

/// Trait for 2D path segments with an arc-length parameterization.
pub trait PathSegment {
    /// Returns the total arc length of the segment.
    fn length(&self) -> f64;

    /// Returns the start point of the segment.
    fn start(&self) -> Point2;

    /// Returns the end point of the segment.
    fn end(&self) -> Point2;

    /// Evaluates position, tangent, curvature and travelled distance at `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` lies outside `[0, 1]`.
    fn pathpoint_at_t(&self, t: f64) -> Result<PathPoint>;

    /// Returns the parameter at which the travelled distance equals `distance`.
    ///
    /// # Errors
    ///
    /// Returns an error if `distance` lies outside `[0, length]`.
    fn t_at_length(&self, distance: f64) -> Result<f64>;

    /// Returns the travelled distance at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` lies outside `[0, 1]`.
    fn length_at_t(&self, t: f64) -> Result<f64> {
        Ok(self.pathpoint_at_t(t)?.distance)
    }

    /// Samples the segment every `part_length` units of arc length, starting
    /// `start_offset` units from the start.
    ///
    /// Returns the samples and the distance left between the last sample and
    /// the end of the segment. When `start_offset` exceeds the segment length
    /// no samples are produced and the whole length is returned as remainder.
    ///
    /// # Errors
    ///
    /// Returns an error if `part_length` is not a positive finite number,
    /// `start_offset` lies outside `[0, part_length)`, or the segment would
    /// need more than [`MAX_SUBDIVISIONS`] samples.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn subdivide(&self, part_length: f64, start_offset: f64) -> Result<(Vec<PathPoint>, f64)> {
        if !(part_length > 0.0 && part_length.is_finite()) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "part_length",
                value: part_length,
                min: 0.0,
                max: f64::INFINITY,
            }
            .into());
        }
        if !(start_offset >= 0.0 && start_offset < part_length) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "start_offset",
                value: start_offset,
                min: 0.0,
                max: part_length,
            }
            .into());
        }

        let length = self.length();
        if start_offset > length {
            return Ok((Vec::new(), length));
        }

        let span = length - start_offset;
        let count = (span / part_length).floor();
        if count >= MAX_SUBDIVISIONS as f64 {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "part_length",
                value: part_length,
                min: span / MAX_SUBDIVISIONS as f64,
                max: f64::INFINITY,
            }
            .into());
        }

        let mut parts = count as usize;
        // The division may round just below an exact multiple.
        if start_offset + (parts + 1) as f64 * part_length <= length {
            parts += 1;
        }

        let mut points = Vec::with_capacity(parts + 1);
        let mut last_distance = start_offset;
        for k in 0..=parts {
            let distance = (start_offset + k as f64 * part_length).min(length);
            let t = self.t_at_length(distance)?;
            points.push(self.pathpoint_at_t(t)?);
            last_distance = distance;
        }

        let remainder = (length - last_distance).max(0.0);
        Ok((points, remainder))
    }
}

/// A path segment of any supported geometry.
#[derive(Debug, Clone)]
pub enum Segment {
    Line(Line),
    Bezier(BezierCurve),
    Arc(EllipticArc),
}

impl From<Line> for Segment {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<BezierCurve> for Segment {
    fn from(curve: BezierCurve) -> Self {
        Self::Bezier(curve)
    }
}

impl From<EllipticArc> for Segment {
    fn from(arc: EllipticArc) -> Self {
        Self::Arc(arc)
    }
}

impl PathSegment for Segment {
    fn length(&self) -> f64 {
        match self {
            Self::Line(line) => line.length(),
            Self::Bezier(curve) => curve.length(),
            Self::Arc(arc) => arc.length(),
        }
    }

    fn start(&self) -> Point2 {
        match self {
            Self::Line(line) => line.start(),
            Self::Bezier(curve) => curve.start(),
            Self::Arc(arc) => arc.start(),
        }
    }

    fn end(&self) -> Point2 {
        match self {
            Self::Line(line) => line.end(),
            Self::Bezier(curve) => curve.end(),
            Self::Arc(arc) => arc.end(),
        }
    }

    fn pathpoint_at_t(&self, t: f64) -> Result<PathPoint> {
        match self {
            Self::Line(line) => line.pathpoint_at_t(t),
            Self::Bezier(curve) => curve.pathpoint_at_t(t),
            Self::Arc(arc) => arc.pathpoint_at_t(t),
        }
    }

    fn t_at_length(&self, distance: f64) -> Result<f64> {
        match self {
            Self::Line(line) => line.t_at_length(distance),
            Self::Bezier(curve) => curve.t_at_length(distance),
            Self::Arc(arc) => arc.t_at_length(distance),
        }
    }

    fn length_at_t(&self, t: f64) -> Result<f64> {
        match self {
            Self::Line(line) => line.length_at_t(t),
            Self::Bezier(curve) => curve.length_at_t(t),
            Self::Arc(arc) => arc.length_at_t(t),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use crate::error::PathError;
    use approx::assert_abs_diff_eq;

    fn line_10() -> Segment {
        Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))
            .unwrap()
            .into()
    }

    #[test]
    fn subdivide_line_with_remainder() {
        let (points, remainder) = line_10().subdivide(3.0, 0.0).unwrap();
        let distances: Vec<f64> = points.iter().map(|p| p.distance).collect();
        assert_eq!(distances.len(), 4);
        for (d, expected) in distances.iter().zip([0.0, 3.0, 6.0, 9.0]) {
            assert_abs_diff_eq!(*d, expected, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(remainder, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn subdivide_exact_multiple_ends_on_endpoint() {
        let (points, remainder) = line_10().subdivide(2.5, 0.0).unwrap();
        assert_eq!(points.len(), 5);
        assert_abs_diff_eq!(points[4].position.x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(remainder, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn subdivide_with_offset() {
        let (points, remainder) = line_10().subdivide(4.0, 1.0).unwrap();
        let xs: Vec<f64> = points.iter().map(|p| p.position.x).collect();
        assert_eq!(xs.len(), 3);
        assert_abs_diff_eq!(xs[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(xs[1], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(xs[2], 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(remainder, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn subdivide_offset_past_end_yields_nothing() {
        let short: Segment = Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0))
            .unwrap()
            .into();
        let (points, remainder) = short.subdivide(5.0, 2.0).unwrap();
        assert!(points.is_empty());
        assert_abs_diff_eq!(remainder, 1.0);
    }

    #[test]
    fn subdivide_rejects_bad_arguments() {
        let line = line_10();
        assert!(line.subdivide(0.0, 0.0).is_err());
        assert!(line.subdivide(-1.0, 0.0).is_err());
        assert!(line.subdivide(f64::NAN, 0.0).is_err());
        assert!(line.subdivide(3.0, 3.0).is_err());
        assert!(line.subdivide(3.0, -0.5).is_err());
    }

    #[test]
    fn subdivide_rejects_tiny_part_length() {
        let err = line_10().subdivide(1e-20, 0.0).unwrap_err();
        assert!(matches!(
            err,
            PathError::Geometry(GeometryError::ParameterOutOfRange {
                parameter: "part_length",
                ..
            })
        ));
        assert!(line_10()
            .subdivide(10.0 / MAX_SUBDIVISIONS as f64, 0.0)
            .is_err());
    }

    #[test]
    fn enum_dispatch_matches_variant() {
        let line = Line::new(Point2::new(1.0, 1.0), Point2::new(4.0, 5.0)).unwrap();
        let segment = Segment::from(line.clone());
        assert_abs_diff_eq!(segment.length(), line.length());
        assert_eq!(segment.start(), line.start());
        assert_eq!(segment.end(), line.end());
        assert_eq!(
            segment.pathpoint_at_t(0.3).unwrap(),
            line.pathpoint_at_t(0.3).unwrap()
        );
    }
}
