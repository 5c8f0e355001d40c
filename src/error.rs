use thiserror::Error;

/// Top-level error type for ribbon fitting and generation.
#[derive(Debug, Error)]
pub enum RibbonError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Spline(#[from] SplineError),

    #[error(transparent)]
    Fitting(#[from] FittingError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector: {0}")]
    ZeroVector(&'static str),

    #[error("forward and up vectors are parallel")]
    ParallelFrame,
}

/// Invalid configuration, rejected before any terrain probing or tessellation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{parameter} must be positive and finite, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("{parameter} must be non-negative and finite, got {value}")]
    Negative { parameter: &'static str, value: f64 },

    #[error("a path needs at least 2 anchors, got {count}")]
    TooFewAnchors { count: usize },

    #[error("total path distance must be positive and finite, got {distance}")]
    ZeroLength { distance: f64 },

    #[error("segment {segment} is too long to sample ({length} units)")]
    SegmentTooLong { segment: usize, length: f64 },
}

/// Errors raised while building a spline over keyed points.
#[derive(Debug, Error)]
pub enum SplineError {
    #[error("a spline needs at least 2 points, got {count}")]
    TooFewPoints { count: usize },

    #[error("point times must be strictly increasing (point {index})")]
    NonIncreasingTime { index: usize },
}

/// Errors raised by the terrain-fitting engine.
#[derive(Debug, Error)]
pub enum FittingError {
    #[error("terrain too irregular: refinement exceeded {max_points} points")]
    TerrainTooIrregular { max_points: usize },

    #[error("horizontal midpoint search did not converge on segment {segment}")]
    MidpointNotFound { segment: usize },
}

/// Errors related to anchor authoring.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("anchor index {index} out of range (count {count})")]
    IndexOutOfRange { index: usize, count: usize },
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("{samples} samples exceed the 32-bit vertex index range")]
    IndexOverflow { samples: usize },
}

/// Errors related to the mesh store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mesh not found")]
    MeshNotFound,
}

/// Convenience type alias for results using [`RibbonError`].
pub type Result<T, E = RibbonError> = std::result::Result<T, E>;
