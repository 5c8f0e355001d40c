use tracing::{trace, warn};

use crate::error::{FittingError, Result};
use crate::geometry::{AnchorPoint, FrameSample, Spline};
use crate::math::frame::planar_distance;
use crate::terrain::TerrainProbe;

use super::slope::fix_slope;
use super::vertical::{fit_point, CrossSection};
use super::{FitParams, MAX_SEGMENT_SAMPLES};

/// Samples segment `[segment, segment + 1]` of `spline` at roughly `step`
/// world units, endpoints included. At most [`MAX_SEGMENT_SAMPLES`] intervals
/// are taken, however long the segment.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub(crate) fn segment_samples<'a>(
    spline: Spline<'a>,
    segment: usize,
    step: f64,
) -> impl Iterator<Item = FrameSample> + 'a {
    let a = spline.points()[segment];
    let b = spline.points()[segment + 1];
    let chord = (b.position - a.position).norm();
    let count = ((chord / step).ceil() as usize).clamp(1, MAX_SEGMENT_SAMPLES);
    (0..=count).map(move |j| {
        let f = j as f64 / count as f64;
        spline.evaluate(a.time + (b.time - a.time) * f)
    })
}

/// Worst loose-margin violation along a segment: `(needs_lowering, needs_raising)`.
fn segment_adjustment<P: TerrainProbe + ?Sized>(
    spline: &Spline<'_>,
    segment: usize,
    probe: &P,
    half_width: f64,
    params: &FitParams,
) -> (f64, f64) {
    segment_samples(*spline, segment, params.sample_step).fold(
        (0.0_f64, 0.0_f64),
        |(lower, raise), sample| {
            let section =
                CrossSection::probe(probe, &sample.position, &sample.lateral(), half_width);
            (
                lower.max(section.floating_above(params.loose_top)),
                raise.max(section.deficit_below(params.loose_bottom)),
            )
        },
    )
}

/// Finds the point on segment `[segment, segment + 1]` whose planar distances
/// to both endpoints agree within `params.midpoint_tolerance`.
fn horizontal_midpoint(
    spline: &Spline<'_>,
    segment: usize,
    params: &FitParams,
) -> Result<AnchorPoint> {
    let a = spline.points()[segment];
    let b = spline.points()[segment + 1];
    let (mut lo, mut hi) = (a.time, b.time);

    for _ in 0..params.max_bisections {
        let mid = 0.5 * (lo + hi);
        if mid <= a.time || mid >= b.time {
            break;
        }
        let sample = spline.evaluate(mid);
        let to_start = planar_distance(&a.position, &sample.position);
        let to_end = planar_distance(&sample.position, &b.position);
        if (to_start - to_end).abs() <= params.midpoint_tolerance {
            return Ok(AnchorPoint {
                position: sample.position,
                forward: sample.forward,
                up: sample.up,
                time: mid,
            });
        }
        if to_start < to_end {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Err(FittingError::MidpointNotFound { segment }.into())
}

/// Splits working-path segments until every sample along them lies within the
/// loose margins. Returns the number of inserted points.
///
/// This deliberately goes beyond a single cursor walk that stops once the
/// cursor passes the last segment. Re-fitting the neighbours of a split also
/// reshapes segments the cursor has already passed, so whole passes repeat
/// until one completes without splitting. Like the `max_points` cap, this is a
/// strengthening of the plain walk: the returned path satisfies the loose
/// margins on every segment.
pub(crate) fn refine<P: TerrainProbe + ?Sized>(
    points: &mut Vec<AnchorPoint>,
    probe: &P,
    half_width: f64,
    params: &FitParams,
) -> Result<usize> {
    let mut splits = 0;
    loop {
        let pass = refine_pass(points, probe, half_width, params)?;
        if pass == 0 {
            return Ok(splits);
        }
        splits += pass;
        trace!(splits = pass, points = points.len(), "refinement pass complete");
    }
}

/// One cursor walk over the segments. After a split the cursor stays put, so
/// the first half of the split segment is examined next.
fn refine_pass<P: TerrainProbe + ?Sized>(
    points: &mut Vec<AnchorPoint>,
    probe: &P,
    half_width: f64,
    params: &FitParams,
) -> Result<usize> {
    let mut segment = 0;
    let mut splits = 0;

    while segment + 1 < points.len() {
        let spline = Spline::new(points)?;
        let (lower, raise) = segment_adjustment(&spline, segment, probe, half_width, params);
        if lower <= 0.0 && raise <= 0.0 {
            segment += 1;
            continue;
        }

        if points.len() >= params.max_points {
            warn!(
                points = points.len(),
                segment, "refinement cap reached, giving up on terrain fit"
            );
            return Err(FittingError::TerrainTooIrregular {
                max_points: params.max_points,
            }
            .into());
        }

        let inserted = horizontal_midpoint(&spline, segment, params)?;
        trace!(segment, lower, raise, time = inserted.time, "splitting segment");
        points.insert(segment + 1, inserted);
        splits += 1;

        let neighbours = segment..=segment + 2;
        for i in neighbours.clone() {
            fit_point(&mut points[i], probe, half_width, params);
        }
        for i in neighbours {
            fix_slope(points, i);
        }
    }

    Ok(splits)
}
