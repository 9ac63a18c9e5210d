pub mod path;
pub mod segment;

pub use path::{ChainPoint, SegmentChain};
pub use segment::{
    ArcFlags, BezierCurve, ControlPoints, Ellipse, EllipseCache, EllipticArc, Line, PathPoint,
    PathSegment, Segment,
};
