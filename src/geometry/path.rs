use crate::error::Result;
use crate::math::TOLERANCE;

use super::segment::{PathPoint, PathSegment, Segment};

/// A sample produced while walking a [`SegmentChain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainPoint {
    /// Index of the segment the sample lies on.
    pub segment: usize,
    /// Arc length from the start of the chain.
    pub distance: f64,
    /// The sample on its own segment.
    pub point: PathPoint,
}

/// An ordered run of segments, sampled as one continuous outline.
///
/// Segments are expected to connect end to start; this is not checked.
#[derive(Debug, Clone, Default)]
pub struct SegmentChain {
    segments: Vec<Segment>,
}

impl SegmentChain {
    /// Creates a chain from segments in traversal order.
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Appends a segment to the end of the chain.
    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }

    /// Returns the segments in traversal order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total arc length of all segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments.iter().map(PathSegment::length).sum()
    }

    /// Samples the whole chain every `part_length` units of arc length.
    ///
    /// Spacing carries over segment boundaries: the first sample of each
    /// segment is placed so that it lies `part_length` after the last sample
    /// of the previous one. A sample landing exactly on a joint is emitted
    /// once.
    ///
    /// # Errors
    ///
    /// Returns an error if `part_length` is not a positive finite number.
    pub fn subdivide(&self, part_length: f64) -> Result<Vec<ChainPoint>> {
        let mut samples = Vec::new();
        let mut lead_in = 0.0;
        let mut skip_joint = false;
        let mut travelled = 0.0;

        for (index, segment) in self.segments.iter().enumerate() {
            let (points, remainder) = segment.subdivide(part_length, lead_in)?;
            let skip = usize::from(skip_joint);

            if points.is_empty() {
                // The segment is shorter than the distance to the next sample.
                lead_in = (lead_in - remainder).max(0.0);
                skip_joint = false;
            } else {
                tracing::trace!(
                    segment = index,
                    samples = points.len(),
                    lead_in,
                    remainder,
                    "subdivided segment"
                );
                if remainder < TOLERANCE {
                    lead_in = 0.0;
                    skip_joint = true;
                } else {
                    lead_in = part_length - remainder;
                    skip_joint = false;
                }
            }

            samples.extend(points.into_iter().skip(skip).map(|point| ChainPoint {
                segment: index,
                distance: travelled + point.distance,
                point,
            }));
            travelled += segment.length();
        }

        tracing::debug!(
            segments = self.segments.len(),
            samples = samples.len(),
            part_length,
            "subdivided chain"
        );
        Ok(samples)
    }
}

impl FromIterator<Segment> for SegmentChain {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
