pub mod config;
pub mod error;
pub mod geometry;
pub mod math;

pub use config::SamplingConfig;
pub use error::{GeometryError, PathError, Result};
pub use geometry::{
    ArcFlags, BezierCurve, ChainPoint, Ellipse, EllipseCache, EllipticArc, Line, PathPoint,
    PathSegment, Segment, SegmentChain,
};
