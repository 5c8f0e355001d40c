use super::{Point3, Vector3, TOLERANCE};

/// Returns the distance between `a` and `b` projected onto the XZ plane.
#[must_use]
pub fn planar_distance(a: &Point3, b: &Point3) -> f64 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

/// Normalizes `v`, or returns `None` when it is too short to carry a direction.
#[must_use]
pub fn try_normalize(v: &Vector3) -> Option<Vector3> {
    let len = v.norm();
    if len < TOLERANCE || !len.is_finite() {
        None
    } else {
        Some(v / len)
    }
}

/// Unit lateral direction of a frame (`forward × up`).
#[must_use]
pub fn lateral(forward: &Vector3, up: &Vector3) -> Option<Vector3> {
    try_normalize(&forward.cross(up))
}

/// Projects `up` onto the plane perpendicular to the unit `tangent`.
///
/// Computed as `-(t × (t × up))`, which keeps the side of `up` it started on.
/// Returns `None` when `up` is parallel to the tangent.
#[must_use]
pub fn perpendicular_up(tangent: &Vector3, up: &Vector3) -> Option<Vector3> {
    try_normalize(&-tangent.cross(&tangent.cross(up)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn planar_distance_ignores_height() {
        let a = Point3::new(0.0, 5.0, 0.0);
        let b = Point3::new(3.0, -2.0, 4.0);
        assert_relative_eq!(planar_distance(&a, &b), 5.0);
    }

    #[test]
    fn try_normalize_rejects_zero() {
        assert!(try_normalize(&Vector3::zeros()).is_none());
        let n = try_normalize(&Vector3::new(0.0, 3.0, 4.0)).unwrap();
        assert_relative_eq!(n.norm(), 1.0);
    }

    #[test]
    fn lateral_of_x_forward_y_up_is_z() {
        let r = lateral(&Vector3::x(), &Vector3::y()).unwrap();
        assert_relative_eq!(r, Vector3::z());
    }

    #[test]
    fn perpendicular_up_on_slope() {
        let t = Vector3::new(1.0, 1.0, 0.0).normalize();
        let up = perpendicular_up(&t, &Vector3::y()).unwrap();
        assert_relative_eq!(up.dot(&t), 0.0, epsilon = 1e-12);
        assert!(up.y > 0.0);
        assert_relative_eq!(up, Vector3::new(-1.0, 1.0, 0.0).normalize(), epsilon = 1e-12);
    }

    #[test]
    fn perpendicular_up_parallel_is_none() {
        assert!(perpendicular_up(&Vector3::y(), &Vector3::y()).is_none());
    }
}
