//! Samples a rounded slot outline at a fixed pitch and prints the samples.
//!
//! Run with `RUST_LOG=pathsample=debug` to see table construction and cache use.

use pathsample::math::Point2;
use pathsample::{ArcFlags, BezierCurve, EllipticArc, Line, SegmentChain};

fn main() -> pathsample::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut outline = SegmentChain::default();
    outline.push(Line::new(Point2::new(0.0, 0.0), Point2::new(40.0, 0.0))?);
    outline.push(EllipticArc::new(
        Point2::new(40.0, 0.0),
        Point2::new(40.0, 20.0),
        10.0,
        10.0,
        0.0,
        ArcFlags::new(true, false),
    )?);
    outline.push(BezierCurve::cubic(
        Point2::new(40.0, 20.0),
        Point2::new(30.0, 30.0),
        Point2::new(10.0, 10.0),
        Point2::new(0.0, 20.0),
    )?);
    outline.push(EllipticArc::new(
        Point2::new(0.0, 20.0),
        Point2::new(0.0, 0.0),
        12.0,
        10.0,
        0.0,
        ArcFlags::new(true, false),
    )?);

    let pitch = 5.0;
    println!("outline length {:.4}, pitch {pitch}", outline.length());
    for sample in outline.subdivide(pitch)? {
        let p = sample.point;
        println!(
            "seg {}  s={:>8.4}  t={:.4}  pos=({:>8.4}, {:>8.4})  curvature={:.5}",
            sample.segment, sample.distance, p.t, p.position.x, p.position.y, p.curvature
        );
    }
    Ok(())
}
