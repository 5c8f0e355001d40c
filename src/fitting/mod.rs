//! Terrain fitting: turns authored anchors into a working path that clings to
//! the ground.
//!
//! Fitting runs in three passes over a fresh copy of the anchors:
//!
//! 1. every point is moved vertically into the tight clearance band,
//! 2. every up vector is tilted perpendicular to the local slope,
//! 3. segments whose interpolated cross-sections leave the loose band are split
//!    at their horizontal midpoint until none do.

mod refine;
mod slope;
mod vertical;

#[cfg(test)]
pub(crate) use refine::segment_samples;
#[cfg(test)]
pub(crate) use vertical::CrossSection;

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::geometry::{AnchorPoint, Spline};
use crate::terrain::TerrainProbe;

/// Upper bound on the samples taken along a single segment.
pub const MAX_SEGMENT_SAMPLES: usize = 1 << 20;

/// Clearance margins and refinement limits for terrain fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Minimum clearance a fitted point keeps above the terrain.
    pub tight_bottom: f64,
    /// Maximum clearance of a fitted point's closest-fitting side.
    pub tight_top: f64,
    /// Interpolated cross-sections below this clearance trigger a split.
    pub loose_bottom: f64,
    /// Interpolated cross-sections floating above this clearance trigger a split.
    pub loose_top: f64,
    /// Sampling step along a segment, in world units.
    pub sample_step: f64,
    /// Allowed difference between the planar distances to both segment ends.
    pub midpoint_tolerance: f64,
    /// Bisection iterations before the midpoint search gives up.
    pub max_bisections: u32,
    /// Working-path size at which refinement fails instead of splitting further.
    pub max_points: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            tight_bottom: 0.1,
            tight_top: 0.1,
            loose_bottom: 0.02,
            loose_top: 1.0,
            sample_step: 0.1,
            midpoint_tolerance: 0.01,
            max_bisections: 64,
            max_points: 4096,
        }
    }
}

/// Counters describing one fitting run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitReport {
    /// Points inserted by refinement.
    pub splits: usize,
    /// Final working-path size.
    pub points: usize,
}

/// Fitted, refinable copy of the anchor sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingPath {
    points: Vec<AnchorPoint>,
}

impl WorkingPath {
    /// Returns the fitted points in path order.
    #[must_use]
    pub fn points(&self) -> &[AnchorPoint] {
        &self.points
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether the path has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of the straight-line distances between consecutive points.
    #[must_use]
    pub fn total_distance(&self) -> f64 {
        chord_length(&self.points)
    }

    /// Builds a spline over the fitted points.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::SplineError`] if the path has fewer than 2
    /// points.
    pub fn spline(&self) -> Result<Spline<'_>> {
        Spline::new(&self.points)
    }

    /// Consumes the path, returning its points.
    #[must_use]
    pub fn into_points(self) -> Vec<AnchorPoint> {
        self.points
    }
}

fn chord_length(points: &[AnchorPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].position - w[0].position).norm())
        .sum()
}

/// Fits a ribbon of the given width to the terrain along a set of anchors.
#[derive(Debug)]
pub struct TerrainFit<'a> {
    anchors: &'a [AnchorPoint],
    width: f64,
    params: FitParams,
}

impl<'a> TerrainFit<'a> {
    /// Creates a new `TerrainFit` operation with default [`FitParams`].
    #[must_use]
    pub fn new(anchors: &'a [AnchorPoint], width: f64) -> Self {
        Self {
            anchors,
            width,
            params: FitParams::default(),
        }
    }

    /// Replaces the fitting parameters.
    #[must_use]
    pub fn with_params(mut self, params: FitParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the fit against `probe`.
    ///
    /// The anchors are validated before the probe is queried at all.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a non-positive width, fewer than 2 anchors
    /// or a zero-length path, a [`crate::error::SplineError`] if anchor times
    /// are not strictly increasing, and a [`crate::error::FittingError`] if
    /// refinement hits its point cap or cannot locate a segment midpoint.
    pub fn execute<P: TerrainProbe + ?Sized>(&self, probe: &P) -> Result<(WorkingPath, FitReport)> {
        self.validate()?;

        let half_width = self.width * 0.5;
        let mut points = self.anchors.to_vec();
        for point in &mut points {
            vertical::fit_point(point, probe, half_width, &self.params);
        }
        slope::fix_all(&mut points);

        let splits = refine::refine(&mut points, probe, half_width, &self.params)?;
        let report = FitReport {
            splits,
            points: points.len(),
        };
        debug!(
            anchors = self.anchors.len(),
            points = report.points,
            splits = report.splits,
            "terrain fit complete"
        );
        Ok((WorkingPath { points }, report))
    }

    fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.width.is_finite()) {
            return Err(ConfigError::NonPositive {
                parameter: "width",
                value: self.width,
            }
            .into());
        }
        if self.anchors.len() < 2 {
            return Err(ConfigError::TooFewAnchors {
                count: self.anchors.len(),
            }
            .into());
        }
        let distance = chord_length(self.anchors);
        if !(distance > 0.0 && distance.is_finite()) {
            return Err(ConfigError::ZeroLength { distance }.into());
        }
        if !(self.params.sample_step > 0.0 && self.params.sample_step.is_finite()) {
            return Err(ConfigError::NonPositive {
                parameter: "sample step",
                value: self.params.sample_step,
            }
            .into());
        }
        #[allow(clippy::cast_precision_loss)]
        let max_length = self.params.sample_step * MAX_SEGMENT_SAMPLES as f64;
        if let Some((segment, length)) = self
            .anchors
            .windows(2)
            .map(|w| (w[1].position - w[0].position).norm())
            .enumerate()
            .find(|&(_, length)| length > max_length)
        {
            return Err(ConfigError::SegmentTooLong { segment, length }.into());
        }
        Spline::new(self.anchors).map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::RibbonError;
    use crate::geometry::assign_chord_times;
    use crate::math::{Point3, Vector3};
    use crate::terrain::{FlatGround, HeightGrid, VerticalRayProbe};
    use approx::assert_relative_eq;

    fn anchors(positions: &[(f64, f64, f64)]) -> Vec<AnchorPoint> {
        let mut pts: Vec<AnchorPoint> = positions
            .iter()
            .map(|&(x, y, z)| {
                AnchorPoint::new(Point3::new(x, y, z), Vector3::x(), Vector3::y()).unwrap()
            })
            .collect();
        assign_chord_times(&mut pts);
        pts
    }

    /// Re-keys fitted points as anchors for a second fit.
    fn as_anchors(path: WorkingPath) -> Vec<AnchorPoint> {
        let mut pts = path.into_points();
        assign_chord_times(&mut pts);
        pts
    }

    #[test]
    fn flat_ground_sets_clearance_without_splitting() {
        let probe = VerticalRayProbe::new(FlatGround::new(0.0));
        let pts = anchors(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)]);
        let (path, report) = TerrainFit::new(&pts, 2.0).execute(&probe).unwrap();
        assert_eq!(report.splits, 0);
        assert_eq!(path.len(), 2);
        for p in path.points() {
            assert_relative_eq!(p.position.y, 0.1, epsilon = 1e-12);
        }
        assert_relative_eq!(path.total_distance(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_invalid_width_and_anchor_count() {
        let probe = VerticalRayProbe::new(FlatGround::new(0.0));
        let pts = anchors(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)]);
        assert!(matches!(
            TerrainFit::new(&pts, -1.0).execute(&probe),
            Err(RibbonError::Config(ConfigError::NonPositive { parameter: "width", .. }))
        ));
        assert!(matches!(
            TerrainFit::new(&pts[..1], 1.0).execute(&probe),
            Err(RibbonError::Config(ConfigError::TooFewAnchors { count: 1 }))
        ));
    }

    #[test]
    fn rejects_zero_length_path() {
        let probe = VerticalRayProbe::new(FlatGround::new(0.0));
        let pts = anchors(&[(1.0, 0.0, 1.0), (1.0, 0.0, 1.0)]);
        assert!(matches!(
            TerrainFit::new(&pts, 1.0).execute(&probe),
            Err(RibbonError::Config(ConfigError::ZeroLength { .. }))
        ));
    }

    #[test]
    fn uniform_slope_is_a_fixed_point() {
        let probe = VerticalRayProbe::new(|x: f64, _z: f64| Some(0.2 * x));
        let pts = anchors(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)]);
        let (path, report) = TerrainFit::new(&pts, 2.0).execute(&probe).unwrap();
        assert_eq!(report.splits, 0);
        assert_relative_eq!(path.points()[1].position.y, 2.1, epsilon = 1e-9);
        // Up is tilted back against the climb.
        assert!(path.points()[0].up.x < 0.0);

        let refit = as_anchors(path);
        let (again, report) = TerrainFit::new(&refit, 2.0).execute(&probe).unwrap();
        assert_eq!(report.splits, 0);
        assert_eq!(again.len(), refit.len());
    }

    #[test]
    fn rolling_terrain_refit_performs_no_splits() {
        let grid = HeightGrid::from_fn(-5.0, -5.0, 0.25, 101, 41, |x, _z| {
            0.8 * (x * 0.4).sin()
        })
        .unwrap();
        let probe = VerticalRayProbe::new(grid);
        let pts = anchors(&[(0.0, 0.0, 0.0), (8.0, 0.0, 0.0), (16.0, 0.0, 0.0)]);
        let (path, report) = TerrainFit::new(&pts, 1.0).execute(&probe).unwrap();
        assert!(report.splits > 0);
        assert_eq!(report.points, pts.len() + report.splits);

        let refit = as_anchors(path);
        let (again, report) = TerrainFit::new(&refit, 1.0).execute(&probe).unwrap();
        assert_eq!(report.splits, 0);
        assert_eq!(again.len(), refit.len());
    }

    #[test]
    fn overlong_segment_is_rejected_before_probing() {
        let pts = anchors(&[(0.0, 0.0, 0.0), (5e18, 0.0, 0.0)]);
        assert!(matches!(
            TerrainFit::new(&pts, 1.0).execute(&crate::terrain::NoTerrain),
            Err(RibbonError::Config(ConfigError::SegmentTooLong { segment: 0, .. }))
        ));
    }

    #[test]
    fn default_bisection_budget() {
        assert_eq!(FitParams::default().max_bisections, 64);
    }

    #[test]
    fn custom_params_are_honoured() {
        let probe = VerticalRayProbe::new(FlatGround::new(0.0));
        let pts = anchors(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)]);
        let params = FitParams {
            tight_bottom: 0.5,
            tight_top: 0.5,
            ..FitParams::default()
        };
        let (path, _) = TerrainFit::new(&pts, 2.0)
            .with_params(params)
            .execute(&probe)
            .unwrap();
        assert_relative_eq!(path.points()[0].position.y, 0.5, epsilon = 1e-12);
    }
}
