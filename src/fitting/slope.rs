use crate::geometry::AnchorPoint;
use crate::math::frame::{lateral, perpendicular_up, try_normalize};
use crate::math::Vector3;

/// Unit tangent at `points[i]`, averaged over both neighbouring chords for interior points.
fn tangent(points: &[AnchorPoint], i: usize) -> Option<Vector3> {
    let here = &points[i].position;
    let incoming = i
        .checked_sub(1)
        .and_then(|prev| try_normalize(&(here - points[prev].position)));
    let outgoing = points
        .get(i + 1)
        .and_then(|next| try_normalize(&(next.position - here)));
    match (incoming, outgoing) {
        (Some(a), Some(b)) => try_normalize(&(a + b)).or(Some(b)),
        (a, b) => a.or(b),
    }
}

/// Tilts the up vector of `points[i]` to be perpendicular to the path tangent.
///
/// The point keeps its previous up when the tangent is undefined, or when the
/// tilted up would no longer span a frame with the point's forward.
pub(crate) fn fix_slope(points: &mut [AnchorPoint], i: usize) {
    let Some(tangent) = tangent(points, i) else {
        return;
    };
    let point = &mut points[i];
    if let Some(up) = perpendicular_up(&tangent, &point.up)
        .filter(|up| lateral(&point.forward, up).is_some())
    {
        point.up = up;
    }
}

/// Applies [`fix_slope`] to every point.
pub(crate) fn fix_all(points: &mut [AnchorPoint]) {
    for i in 0..points.len() {
        fix_slope(points, i);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use approx::assert_relative_eq;

    fn path(positions: &[(f64, f64)]) -> Vec<AnchorPoint> {
        positions
            .iter()
            .map(|&(x, y)| {
                AnchorPoint::new(Point3::new(x, y, 0.0), Vector3::x(), Vector3::y()).unwrap()
            })
            .collect()
    }

    #[test]
    fn level_path_keeps_vertical_up() {
        let mut points = path(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        fix_all(&mut points);
        for p in &points {
            assert_relative_eq!(p.up, Vector3::y(), epsilon = 1e-12);
        }
    }

    #[test]
    fn uphill_tilts_up_backwards() {
        let mut points = path(&[(0.0, 0.0), (1.0, 1.0)]);
        fix_all(&mut points);
        let expected = Vector3::new(-1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(points[0].up, expected, epsilon = 1e-12);
        assert_relative_eq!(points[1].up, expected, epsilon = 1e-12);
    }

    #[test]
    fn interior_point_averages_neighbouring_chords() {
        let mut points = path(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        fix_all(&mut points);
        // Peak: incoming and outgoing chords average to a level tangent.
        assert_relative_eq!(points[1].up, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(points[1].up.dot(&points[1].forward), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn vertical_tangent_keeps_previous_up() {
        let mut points = path(&[(0.0, 0.0), (0.0, 3.0)]);
        fix_all(&mut points);
        assert_relative_eq!(points[0].up, Vector3::y());
    }
}
