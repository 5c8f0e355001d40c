use tracing::debug;

use crate::error::{ConfigError, Result, TessellationError};
use crate::fitting::WorkingPath;
use crate::math::frame::try_normalize;
use crate::math::{Point2, Point3};

use super::{CrossSectionProfile, RibbonMesh, TRIANGLES_PER_SEGMENT, VERTICES_PER_SAMPLE};

/// Sweeps a [`CrossSectionProfile`] along a fitted path.
///
/// Samples are spread evenly over the path parameter. At each sample the
/// ribbon surface spans both rails, lifted by `offset_height` along the local
/// up, and a skirt wall of `side_height` hangs below each rail.
#[derive(Debug)]
pub struct TessellateRibbon<'a> {
    path: &'a WorkingPath,
    profile: CrossSectionProfile,
}

impl<'a> TessellateRibbon<'a> {
    /// Creates a new ribbon tessellation operation.
    #[must_use]
    pub fn new(path: &'a WorkingPath, profile: CrossSectionProfile) -> Self {
        Self { path, profile }
    }

    /// Number of samples the path will be cut into: one per
    /// `1 / samples_per_unit` world units, at least two.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample_count(&self) -> usize {
        let target = (self.path.total_distance() * self.profile.samples_per_unit).round();
        (target as usize).saturating_add(1).max(2)
    }

    /// Executes the tessellation.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the profile is invalid or the path has no
    /// positive finite length, or [`TessellationError::IndexOverflow`] if the
    /// mesh would not fit 32-bit indices.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<RibbonMesh> {
        self.profile.validate()?;
        let total = self.path.total_distance();
        if !(total > 0.0 && total.is_finite()) {
            return Err(ConfigError::ZeroLength { distance: total }.into());
        }
        let spline = self.path.spline()?;

        let sample_count = self.sample_count();
        let vertex_count = sample_count
            .checked_mul(VERTICES_PER_SAMPLE)
            .filter(|&count| u32::try_from(count).is_ok())
            .ok_or(TessellationError::IndexOverflow {
                samples: sample_count,
            })?;

        let CrossSectionProfile {
            width,
            side_height,
            offset_height,
            ..
        } = self.profile;
        let half_w = self.profile.half_width();
        let last = (sample_count - 1) as f64;

        let mut vertices = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);
        let mut travelled = 0.0;
        let mut previous: Option<Point3> = None;

        for i in 0..sample_count {
            let sample = spline.evaluate(i as f64 / last);
            if let Some(prev) = previous {
                travelled += (sample.position - prev).norm();
            }
            previous = Some(sample.position);

            let side = sample.lateral();
            let right = side * half_w;
            let up = sample.up;
            let lift = up * offset_height;
            let down = -up * side_height;

            let right_rail = sample.position + right + lift;
            let left_rail = sample.position - right + lift;
            vertices.extend_from_slice(&[
                right_rail,
                left_rail,
                right_rail + down,
                left_rail + down,
            ]);

            let right_normal = try_normalize(&(up + side)).unwrap_or(up);
            let left_normal = try_normalize(&(up - side)).unwrap_or(up);
            normals.extend_from_slice(&[right_normal, left_normal, side, -side]);

            let v = travelled / width;
            let wall = width / side_height;
            uvs.extend_from_slice(&[
                Point2::new(0.0, v),
                Point2::new(1.0, v),
                Point2::new(-wall, v),
                Point2::new(wall, v),
            ]);
        }

        let mut indices = Vec::with_capacity((sample_count - 1) * TRIANGLES_PER_SEGMENT);
        for i in 0..sample_count - 1 {
            let a = segment_base(i);
            let b = segment_base(i + 1);
            // Top surface, facing up.
            indices.push([a, b, a + 1]);
            indices.push([a + 1, b, b + 1]);
            // Right wall, facing +lateral.
            indices.push([a, a + 2, b]);
            indices.push([b, a + 2, b + 2]);
            // Left wall, facing -lateral.
            indices.push([a + 1, b + 1, a + 3]);
            indices.push([b + 1, b + 3, a + 3]);
        }

        debug!(
            samples = sample_count,
            vertices = vertices.len(),
            triangles = indices.len(),
            length = total,
            "ribbon tessellated"
        );

        Ok(RibbonMesh {
            vertices,
            normals,
            uvs,
            indices,
        })
    }
}

/// Index of the first vertex of sample `i`; the caller has checked the
/// vertex count fits in `u32`.
#[allow(clippy::cast_possible_truncation)]
fn segment_base(i: usize) -> u32 {
    (i * VERTICES_PER_SAMPLE) as u32
}
