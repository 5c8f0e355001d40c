pub mod error;
pub mod fitting;
pub mod geometry;
pub mod math;
pub mod path;
pub mod store;
pub mod terrain;
pub mod tessellation;

pub use error::{RibbonError, Result};
pub use fitting::{FitParams, FitReport, TerrainFit, WorkingPath};
pub use geometry::{AnchorPoint, FrameSample, Spline};
pub use path::{GenerationReport, RibbonPath};
pub use store::{MeshId, MeshSink, MeshSlot, MeshStore};
pub use terrain::{FlatGround, HeightGrid, HeightSurface, NoTerrain, TerrainProbe, VerticalRayProbe};
pub use tessellation::{CrossSectionProfile, RibbonMesh, TessellateRibbon};
