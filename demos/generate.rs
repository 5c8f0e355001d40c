//! Fits a ribbon over rolling terrain and prints the generated buffer sizes.
//!
//! Usage:
//! ```text
//! cargo run --example generate
//! RUST_LOG=ribbonfit=trace cargo run --example generate   # every segment split
//! ```

use ribbonfit::math::{Point3, Vector3};
use ribbonfit::{CrossSectionProfile, HeightGrid, RibbonMesh, RibbonPath, VerticalRayProbe};

fn main() -> Result<(), ribbonfit::RibbonError> {
    // Default: WARN for everything, INFO for ribbonfit.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("generate=info".parse().unwrap_or_default())
        .add_directive("ribbonfit=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let terrain = HeightGrid::from_fn(-10.0, -10.0, 0.5, 121, 41, |x, z| {
        1.5 * (x * 0.3).sin() + 0.4 * (z * 0.8).cos()
    })?;
    let probe = VerticalRayProbe::new(terrain);

    let mut path = RibbonPath::new(CrossSectionProfile::new(2.0, 0.4, 0.1)?);
    for (x, z) in [(0.0, 0.0), (12.0, 2.0), (25.0, -1.0), (40.0, 0.0)] {
        path.add_point(Point3::new(x, 5.0, z), Vector3::x(), Vector3::y())?;
    }

    let mut mesh: Option<RibbonMesh> = None;
    let report = path.generate(&probe, &mut mesh)?;

    tracing::info!(
        anchors = path.point_count(),
        fitted_points = report.fit.points,
        splits = report.fit.splits,
        length = path.total_distance(),
        "path fitted"
    );
    tracing::info!(
        samples = report.sample_count,
        vertices = report.vertex_count,
        triangles = report.triangle_count,
        "ribbon generated"
    );
    Ok(())
}
