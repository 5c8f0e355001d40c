use crate::geometry::AnchorPoint;
use crate::math::{Point3, Vector3, WORLD_UP};
use crate::terrain::TerrainProbe;

use super::FitParams;

/// Clearances probed at the centerline and at both rails of a cross-section.
///
/// A side whose probe ray missed is `None` and takes no part in any adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CrossSection {
    pub center: Option<f64>,
    pub right: Option<f64>,
    pub left: Option<f64>,
}

impl CrossSection {
    /// Probes the centerline at `position` and the rails at `±half_width` along `lateral`.
    pub fn probe<P: TerrainProbe + ?Sized>(
        probe: &P,
        position: &Point3,
        lateral: &Vector3,
        half_width: f64,
    ) -> Self {
        let offset = lateral * half_width;
        Self {
            center: probe.probe_clearance(position),
            right: probe.probe_clearance(&(position + offset)),
            left: probe.probe_clearance(&(position - offset)),
        }
    }

    fn hits(&self) -> impl Iterator<Item = f64> {
        [self.center, self.right, self.left].into_iter().flatten()
    }

    /// Largest amount any hit side sits above `top`, or 0.
    pub fn excess_above(&self, top: f64) -> f64 {
        self.hits().map(|c| c - top).fold(0.0, f64::max)
    }

    /// Largest amount any hit side sits below `bottom`, or 0.
    pub fn deficit_below(&self, bottom: f64) -> f64 {
        self.hits().map(|c| bottom - c).fold(0.0, f64::max)
    }

    /// Amount by which even the lowest hit side sits above `top`, or 0.
    pub fn floating_above(&self, top: f64) -> f64 {
        self.hits()
            .reduce(f64::min)
            .map_or(0.0, |lowest| (lowest - top).max(0.0))
    }
}

/// Moves `point` vertically so its cross-section sits within the tight margins.
///
/// Lowering is applied first, then clearances are probed again and the point is
/// raised out of the ground. The order matters: raising works on the already
/// lowered position.
pub(crate) fn fit_point<P: TerrainProbe + ?Sized>(
    point: &mut AnchorPoint,
    probe: &P,
    half_width: f64,
    params: &FitParams,
) {
    let lateral = point.lateral();

    let section = CrossSection::probe(probe, &point.position, &lateral, half_width);
    let lower = section.excess_above(params.tight_top);
    let section = if lower > 0.0 {
        point.position -= WORLD_UP * lower;
        CrossSection::probe(probe, &point.position, &lateral, half_width)
    } else {
        section
    };

    let raise = section.deficit_below(params.tight_bottom);
    if raise > 0.0 {
        point.position += WORLD_UP * raise;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::terrain::{FlatGround, NoTerrain, VerticalRayProbe};
    use approx::assert_relative_eq;

    fn point_at(y: f64) -> AnchorPoint {
        AnchorPoint::new(Point3::new(0.0, y, 0.0), Vector3::x(), Vector3::y()).unwrap()
    }

    #[test]
    fn section_ignores_misses() {
        let section = CrossSection {
            center: Some(-0.5),
            right: None,
            left: Some(2.0),
        };
        assert_relative_eq!(section.excess_above(0.1), 1.9);
        assert_relative_eq!(section.deficit_below(0.1), 0.6);
        assert_relative_eq!(section.floating_above(1.0), 0.0);

        let empty = CrossSection {
            center: None,
            right: None,
            left: None,
        };
        assert_relative_eq!(empty.excess_above(0.1), 0.0);
        assert_relative_eq!(empty.deficit_below(0.1), 0.0);
        assert_relative_eq!(empty.floating_above(0.1), 0.0);
    }

    #[test]
    fn floating_uses_lowest_side() {
        let section = CrossSection {
            center: Some(3.0),
            right: Some(1.5),
            left: Some(4.0),
        };
        assert_relative_eq!(section.floating_above(1.0), 0.5);
    }

    #[test]
    fn high_point_is_lowered_to_margin() {
        let probe = VerticalRayProbe::new(FlatGround::new(0.0));
        let mut p = point_at(5.0);
        fit_point(&mut p, &probe, 1.0, &FitParams::default());
        assert_relative_eq!(p.position.y, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn buried_point_is_raised_to_margin() {
        let probe = VerticalRayProbe::new(FlatGround::new(3.0));
        let mut p = point_at(0.0);
        fit_point(&mut p, &probe, 1.0, &FitParams::default());
        assert_relative_eq!(p.position.y, 3.1, epsilon = 1e-12);
    }

    #[test]
    fn lower_then_raise_settles_on_highest_side() {
        // Ground rises toward +z: the right rail (z = +1) sees the highest terrain.
        let probe = VerticalRayProbe::new(|_x: f64, z: f64| Some(z));
        let mut p = point_at(4.0);
        fit_point(&mut p, &probe, 1.0, &FitParams::default());
        assert_relative_eq!(p.position.y, 1.1, epsilon = 1e-12);
    }

    #[test]
    fn floating_point_is_untouched() {
        let mut p = point_at(7.0);
        fit_point(&mut p, &NoTerrain, 1.0, &FitParams::default());
        assert_relative_eq!(p.position.y, 7.0);
    }
}
