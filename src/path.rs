//! Authored ribbon paths.
//!
//! [`RibbonPath`] owns the anchors a user places and drives generation:
//! anchors are fitted to the terrain, the fitted path is tessellated, and the
//! resulting buffers are handed to a [`MeshSink`]. Every generation starts
//! over from the anchors; nothing carries over between runs.

use tracing::debug;

use crate::error::{PathError, Result};
use crate::fitting::{FitParams, FitReport, TerrainFit, WorkingPath};
use crate::geometry::{assign_chord_times, AnchorPoint};
use crate::math::{Point3, Vector3};
use crate::store::MeshSink;
use crate::tessellation::{CrossSectionProfile, TessellateRibbon};
use crate::terrain::TerrainProbe;

/// Summary of one successful generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    /// Fitting counters.
    pub fit: FitReport,
    /// Path samples along the ribbon.
    pub sample_count: usize,
    /// Vertices submitted.
    pub vertex_count: usize,
    /// Triangles submitted.
    pub triangle_count: usize,
}

/// An ordered set of authored anchors plus the profile swept along them.
#[derive(Debug, Clone, Default)]
pub struct RibbonPath {
    anchors: Vec<AnchorPoint>,
    profile: CrossSectionProfile,
    params: FitParams,
    working: WorkingPath,
}

impl RibbonPath {
    /// Creates an empty path with the given profile.
    #[must_use]
    pub fn new(profile: CrossSectionProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Returns the cross-section profile.
    #[must_use]
    pub fn profile(&self) -> &CrossSectionProfile {
        &self.profile
    }

    /// Returns the cross-section profile for editing. It is validated on the
    /// next generation.
    pub fn profile_mut(&mut self) -> &mut CrossSectionProfile {
        &mut self.profile
    }

    /// Returns the terrain fitting parameters.
    #[must_use]
    pub fn fit_params(&self) -> &FitParams {
        &self.params
    }

    /// Replaces the terrain fitting parameters.
    pub fn set_fit_params(&mut self, params: FitParams) {
        self.params = params;
    }

    // --- Anchor authoring ---

    /// Replaces every anchor and recomputes their times.
    pub fn set_anchors(&mut self, anchors: Vec<AnchorPoint>) {
        self.anchors = anchors;
        assign_chord_times(&mut self.anchors);
    }

    /// Returns the anchors in path order.
    #[must_use]
    pub fn anchors(&self) -> &[AnchorPoint] {
        &self.anchors
    }

    /// Appends an anchor and returns its index.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::GeometryError`] if the frame is degenerate.
    pub fn add_point(&mut self, position: Point3, forward: Vector3, up: Vector3) -> Result<usize> {
        self.anchors.push(AnchorPoint::new(position, forward, up)?);
        assign_chord_times(&mut self.anchors);
        Ok(self.anchors.len() - 1)
    }

    /// Inserts an anchor before `index`; `index == point_count()` appends.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] for an index past the end, or a
    /// [`crate::error::GeometryError`] if the frame is degenerate.
    pub fn insert_point(
        &mut self,
        index: usize,
        position: Point3,
        forward: Vector3,
        up: Vector3,
    ) -> Result<()> {
        if index > self.anchors.len() {
            return Err(self.out_of_range(index).into());
        }
        self.anchors
            .insert(index, AnchorPoint::new(position, forward, up)?);
        assign_chord_times(&mut self.anchors);
        Ok(())
    }

    /// Overwrites the anchor at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] for an unknown index, or a
    /// [`crate::error::GeometryError`] if the frame is degenerate.
    pub fn change_point(
        &mut self,
        index: usize,
        position: Point3,
        forward: Vector3,
        up: Vector3,
    ) -> Result<()> {
        let anchor = AnchorPoint::new(position, forward, up)?;
        let count = self.anchors.len();
        let slot = self
            .anchors
            .get_mut(index)
            .ok_or(PathError::IndexOutOfRange { index, count })?;
        *slot = anchor;
        assign_chord_times(&mut self.anchors);
        Ok(())
    }

    /// Removes and returns the anchor at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] for an unknown index.
    pub fn delete_point(&mut self, index: usize) -> Result<AnchorPoint> {
        if index >= self.anchors.len() {
            return Err(self.out_of_range(index).into());
        }
        let removed = self.anchors.remove(index);
        assign_chord_times(&mut self.anchors);
        Ok(removed)
    }

    /// Returns the number of anchors.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.anchors.len()
    }

    /// Returns the anchor at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] for an unknown index.
    pub fn anchor(&self, index: usize) -> Result<&AnchorPoint, PathError> {
        self.anchors
            .get(index)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Returns the position of the anchor at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] for an unknown index.
    pub fn position(&self, index: usize) -> Result<Point3, PathError> {
        self.anchor(index).map(|a| a.position)
    }

    /// Returns the forward direction of the anchor at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] for an unknown index.
    pub fn front(&self, index: usize) -> Result<Vector3, PathError> {
        self.anchor(index).map(|a| a.forward)
    }

    /// Returns the up direction of the anchor at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] for an unknown index.
    pub fn up(&self, index: usize) -> Result<Vector3, PathError> {
        self.anchor(index).map(|a| a.up)
    }

    /// Returns the chord-fraction time of the anchor at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] for an unknown index.
    pub fn time(&self, index: usize) -> Result<f64, PathError> {
        self.anchor(index).map(|a| a.time)
    }

    fn out_of_range(&self, index: usize) -> PathError {
        PathError::IndexOutOfRange {
            index,
            count: self.anchors.len(),
        }
    }

    // --- Generation ---

    /// Fits the anchors to the terrain, replacing the working path.
    ///
    /// On failure the previous working path is kept.
    ///
    /// # Errors
    ///
    /// See [`TerrainFit::execute`].
    pub fn flatten<P: TerrainProbe + ?Sized>(&mut self, probe: &P) -> Result<FitReport> {
        let (working, report) = TerrainFit::new(&self.anchors, self.profile.width)
            .with_params(self.params)
            .execute(probe)?;
        self.working = working;
        Ok(report)
    }

    /// Returns the most recently fitted working path.
    #[must_use]
    pub fn working_path(&self) -> &WorkingPath {
        &self.working
    }

    /// Length of the fitted working path, or 0 before the first fit.
    #[must_use]
    pub fn total_distance(&self) -> f64 {
        self.working.total_distance()
    }

    /// Fits, tessellates and submits the ribbon to `sink`.
    ///
    /// The profile is checked before the terrain is probed. Nothing reaches
    /// `sink` unless every stage succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::ConfigError`] for an invalid profile or anchor
    /// set, and propagates fitting and tessellation failures.
    pub fn generate<P, S>(&mut self, probe: &P, sink: &mut S) -> Result<GenerationReport>
    where
        P: TerrainProbe + ?Sized,
        S: MeshSink + ?Sized,
    {
        self.profile.validate()?;
        let fit = self.flatten(probe)?;
        let mesh = TessellateRibbon::new(&self.working, self.profile).execute()?;

        let report = GenerationReport {
            fit,
            sample_count: mesh.sample_count(),
            vertex_count: mesh.vertices.len(),
            triangle_count: mesh.indices.len(),
        };
        debug!(
            anchors = self.anchors.len(),
            points = fit.points,
            samples = report.sample_count,
            "ribbon generated"
        );
        sink.submit(mesh);
        Ok(report)
    }
}
