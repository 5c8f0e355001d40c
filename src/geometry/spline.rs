use crate::error::{Result, SplineError};
use crate::math::frame::{lateral, try_normalize};
use crate::math::{Point3, Vector3};

use super::AnchorPoint;

/// Position and local frame evaluated at a path parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Interpolated position.
    pub position: Point3,
    /// Unit forward direction.
    pub forward: Vector3,
    /// Unit up direction.
    pub up: Vector3,
}

impl FrameSample {
    /// Unit lateral direction (`forward × up`).
    #[must_use]
    pub fn lateral(&self) -> Vector3 {
        lateral(&self.forward, &self.up).unwrap_or_else(Vector3::z)
    }
}

/// Cubic Hermite spline through keyed points, with Catmull-Rom tangents.
///
/// Tangents are central differences over `time`; at the first and last point
/// the missing neighbour is replaced by the point itself. The spline borrows
/// its points and holds no other state, so it can be rebuilt cheaply whenever
/// the underlying sequence changes.
#[derive(Debug, Clone, Copy)]
pub struct Spline<'a> {
    points: &'a [AnchorPoint],
}

impl<'a> Spline<'a> {
    /// Binds a spline to `points`.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::TooFewPoints`] for fewer than 2 points, or
    /// [`SplineError::NonIncreasingTime`] if `time` is not strictly increasing.
    pub fn new(points: &'a [AnchorPoint]) -> Result<Self> {
        if points.len() < 2 {
            return Err(SplineError::TooFewPoints {
                count: points.len(),
            }
            .into());
        }
        if let Some(index) = points
            .windows(2)
            .position(|w| w[1].time <= w[0].time || w[1].time.is_nan())
        {
            return Err(SplineError::NonIncreasingTime { index: index + 1 }.into());
        }
        Ok(Self { points })
    }

    /// Returns the points this spline interpolates.
    #[must_use]
    pub fn points(&self) -> &'a [AnchorPoint] {
        self.points
    }

    /// Evaluates position and frame at `t`, clamped to the keyed time range.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> FrameSample {
        let n = self.points.len();
        let first = &self.points[0];
        let last = &self.points[n - 1];
        let t = if t.is_nan() {
            first.time
        } else {
            t.clamp(first.time, last.time)
        };

        // Segment [k, k+1] with points[k].time <= t.
        let k = self
            .points
            .partition_point(|p| p.time <= t)
            .saturating_sub(1)
            .min(n - 2);
        let a = &self.points[k];
        let b = &self.points[k + 1];
        let dt = b.time - a.time;
        let u = ((t - a.time) / dt).clamp(0.0, 1.0);

        let position = self.hermite(k, dt, u, |p| p.position.coords);
        let forward = self.hermite(k, dt, u, |p| p.forward);
        let up = self.hermite(k, dt, u, |p| p.up);

        // Blending opposed frames can cancel out; keep the nearer key's frame then.
        let key = if u < 0.5 { a } else { b };
        let forward = try_normalize(&forward).unwrap_or(key.forward);
        let up = try_normalize(&up)
            .filter(|up| lateral(&forward, up).is_some())
            .unwrap_or(key.up);

        FrameSample {
            position: Point3::from(position),
            forward,
            up,
        }
    }

    /// Hermite blend of a per-point quantity over segment `[k, k+1]`.
    fn hermite(&self, k: usize, dt: f64, u: f64, value: impl Fn(&AnchorPoint) -> Vector3) -> Vector3 {
        let m0 = self.tangent(k, &value) * dt;
        let m1 = self.tangent(k + 1, &value) * dt;
        let p0 = value(&self.points[k]);
        let p1 = value(&self.points[k + 1]);

        let u2 = u * u;
        let u3 = u2 * u;
        let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
        let h10 = u3 - 2.0 * u2 + u;
        let h01 = -2.0 * u3 + 3.0 * u2;
        let h11 = u3 - u2;

        p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11
    }

    /// Derivative with respect to `time` at point `i`.
    fn tangent(&self, i: usize, value: &impl Fn(&AnchorPoint) -> Vector3) -> Vector3 {
        let prev = &self.points[i.saturating_sub(1)];
        let next = &self.points[(i + 1).min(self.points.len() - 1)];
        (value(next) - value(prev)) / (next.time - prev.time)
    }
}
