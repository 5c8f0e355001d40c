use crate::error::{GeometryError, Result};
use crate::math::frame::{lateral, try_normalize};
use crate::math::{Point3, Vector3};

/// A keyed control point: position, local frame and path parameter.
///
/// Anchors authored by the user and the points of a fitted working path share
/// this shape. `time` is the cumulative chord-length fraction along the owning
/// sequence and is only meaningful relative to its neighbours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint {
    /// Position in world space.
    pub position: Point3,
    /// Unit forward direction.
    pub forward: Vector3,
    /// Unit up direction, never parallel to `forward`.
    pub up: Vector3,
    /// Path parameter in `[0, 1]`.
    pub time: f64,
}

impl AnchorPoint {
    /// Creates an anchor with normalized frame vectors and `time = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `forward` or `up` is
    /// zero-length, or [`GeometryError::ParallelFrame`] if they are parallel.
    pub fn new(position: Point3, forward: Vector3, up: Vector3) -> Result<Self> {
        let forward = try_normalize(&forward).ok_or(GeometryError::ZeroVector("forward"))?;
        let up = try_normalize(&up).ok_or(GeometryError::ZeroVector("up"))?;
        if lateral(&forward, &up).is_none() {
            return Err(GeometryError::ParallelFrame.into());
        }
        Ok(Self {
            position,
            forward,
            up,
            time: 0.0,
        })
    }

    /// Unit lateral direction of this point's frame (`forward × up`).
    ///
    /// Falls back to world Z for a degenerate frame, which validated anchors
    /// never have.
    #[must_use]
    pub fn lateral(&self) -> Vector3 {
        lateral(&self.forward, &self.up).unwrap_or_else(Vector3::z)
    }
}

/// Recomputes `time` on every point as cumulative chord length over total.
///
/// A sequence with zero total length gets `time = 0` everywhere, which the
/// spline builder rejects.
pub fn assign_chord_times(points: &mut [AnchorPoint]) {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += (point.position - points[i - 1].position).norm();
        }
        cumulative.push(total);
    }
    for (point, distance) in points.iter_mut().zip(cumulative) {
        point.time = if total > 0.0 { distance / total } else { 0.0 };
    }
}
