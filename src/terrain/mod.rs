//! Terrain clearance queries.
//!
//! The fitting engine only ever asks one question of the ground: how far above
//! (positive) or below (negative) the terrain is a world point, measured along
//! the vertical axis. [`TerrainProbe`] is that question; [`VerticalRayProbe`]
//! answers it for any [`HeightSurface`] by casting a bounded vertical ray.

mod height_grid;

pub use height_grid::HeightGrid;

use crate::math::Point3;

/// Half-length of the vertical probe ray, in world units.
pub const RAY_REACH: f64 = 100.0;

/// Signed vertical clearance query against a read-only terrain snapshot.
pub trait TerrainProbe {
    /// Returns the signed vertical distance from `point` down to the terrain,
    /// or `None` if the probe ray misses.
    fn probe_clearance(&self, point: &Point3) -> Option<f64>;
}

impl<T: TerrainProbe + ?Sized> TerrainProbe for &T {
    fn probe_clearance(&self, point: &Point3) -> Option<f64> {
        (**self).probe_clearance(point)
    }
}

/// Terrain described as a height per planar (XZ) location.
pub trait HeightSurface {
    /// Returns the terrain height at `(x, z)`, or `None` where there is no ground.
    fn height_at(&self, x: f64, z: f64) -> Option<f64>;
}

impl<F> HeightSurface for F
where
    F: Fn(f64, f64) -> Option<f64>,
{
    fn height_at(&self, x: f64, z: f64) -> Option<f64> {
        self(x, z)
    }
}

/// Infinite horizontal ground plane.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatGround {
    /// Ground height.
    pub height: f64,
}

impl FlatGround {
    /// Creates a ground plane at `height`.
    #[must_use]
    pub fn new(height: f64) -> Self {
        Self { height }
    }
}

impl HeightSurface for FlatGround {
    fn height_at(&self, _x: f64, _z: f64) -> Option<f64> {
        Some(self.height)
    }
}

/// Probes a [`HeightSurface`] with a vertical ray of bounded reach.
///
/// A hit further than `reach` above or below the query point counts as a miss.
#[derive(Debug, Clone)]
pub struct VerticalRayProbe<S> {
    surface: S,
    reach: f64,
}

impl<S: HeightSurface> VerticalRayProbe<S> {
    /// Creates a probe with the default [`RAY_REACH`].
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self::with_reach(surface, RAY_REACH)
    }

    /// Creates a probe with a custom ray half-length.
    #[must_use]
    pub fn with_reach(surface: S, reach: f64) -> Self {
        Self { surface, reach }
    }

    /// Returns the probed surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: HeightSurface> TerrainProbe for VerticalRayProbe<S> {
    fn probe_clearance(&self, point: &Point3) -> Option<f64> {
        let height = self.surface.height_at(point.x, point.z)?;
        let clearance = point.y - height;
        (clearance.is_finite() && clearance.abs() <= self.reach).then_some(clearance)
    }
}

/// Probe that never hits anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTerrain;

impl TerrainProbe for NoTerrain {
    fn probe_clearance(&self, _point: &Point3) -> Option<f64> {
        None
    }
}
