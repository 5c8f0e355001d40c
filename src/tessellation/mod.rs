mod profile;
mod tessellate_ribbon;

pub use profile::CrossSectionProfile;
pub use tessellate_ribbon::TessellateRibbon;

use crate::math::{Point2, Point3, Vector3};

/// Vertices emitted per path sample.
pub const VERTICES_PER_SAMPLE: usize = 4;

/// Triangles emitted between two consecutive path samples.
pub const TRIANGLES_PER_SEGMENT: usize = 6;

/// Renderer-ready ribbon buffers.
///
/// Each path sample contributes four vertices in order: right rail, left rail,
/// right wall bottom, left wall bottom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RibbonMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// UV coordinates: lateral in `x`, distance travelled over width in `y`.
    pub uvs: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl RibbonMesh {
    /// Number of path samples the mesh was built from.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_SAMPLE
    }

    /// Returns whether the mesh holds no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
