//! Arc-length parameterised sampling of a polyline.
//!
//! A vehicle's progress is a single scalar: metres travelled along its
//! path.  [`position_at`] turns that scalar back into a coordinate and a
//! compass heading by walking the segments until the target offset falls
//! inside one, then interpolating linearly within it.
//!
//! Segment lengths use [`GeoPoint::planar_distance_m`], the same metric the
//! assembler uses for `total_distance_m`, so `path_length(&g.path)` equals
//! `g.total_distance_m` bit for bit.

use sv_core::GeoPoint;

use crate::{GeometryError, GeometryResult};

/// Default distance before the path end at which a vehicle counts as
/// arrived.
pub const DEFAULT_END_THRESHOLD_M: f64 = 50.0;

/// How far ahead of the sampled point the heading is measured.
pub const HEADING_LOOKAHEAD_M: f64 = 10.0;

/// A sampled point on a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position:    GeoPoint,
    /// Compass bearing in `[0, 360)`, 0 = north, clockwise.
    pub heading_deg: f64,
}

/// Total planar arc length in metres.  `0.0` for fewer than two points.
pub fn path_length(path: &[GeoPoint]) -> f64 {
    path.windows(2)
        .map(|w| w[0].planar_distance_m(w[1]))
        .sum()
}

/// Position and heading at `distance` metres along `path`.
///
/// `distance` is clamped to `[0, path_length(path)]`.  The heading points at
/// the spot [`HEADING_LOOKAHEAD_M`] further along (clamped to the end); when
/// that collapses onto the sample itself, the heading of the segment under
/// the sample is used instead.
///
/// # Errors
///
/// [`GeometryError::InsufficientGeometry`] when `path` has fewer than two
/// points.
pub fn position_at(distance: f64, path: &[GeoPoint]) -> GeometryResult<Sample> {
    position_at_with_length(distance, path, path_length(path))
}

/// [`position_at`] with the path length already known.
pub(crate) fn position_at_with_length(distance: f64, path: &[GeoPoint], total: f64) -> GeometryResult<Sample> {
    if path.len() < 2 {
        return Err(GeometryError::InsufficientGeometry { points: path.len() });
    }

    // max/min rather than clamp: a NaN distance lands on 0 instead of
    // propagating.
    let clamped = distance.max(0.0).min(total);

    let (position, segment) = point_along(path, clamped, total);
    let (ahead, _) = point_along(path, (clamped + HEADING_LOOKAHEAD_M).min(total), total);

    let heading_deg = if ahead == position {
        path[segment].bearing_deg(path[segment + 1])
    } else {
        position.bearing_deg(ahead)
    };

    Ok(Sample { position, heading_deg })
}

/// `true` once `distance` is within `threshold_m` of the path end.
///
/// Degenerate paths (fewer than two points) have always "reached the end".
pub fn has_reached_end(distance: f64, path: &[GeoPoint], threshold_m: f64) -> bool {
    has_reached_end_with_length(distance, path, path_length(path), threshold_m)
}

pub(crate) fn has_reached_end_with_length(distance: f64, path: &[GeoPoint], total: f64, threshold_m: f64) -> bool {
    if path.len() < 2 {
        return true;
    }
    distance >= total - threshold_m
}

/// Point at `target` metres (already clamped to `[0, total]`) and the index
/// of the segment it lies on.
fn point_along(path: &[GeoPoint], target: f64, total: f64) -> (GeoPoint, usize) {
    let last_segment = path.len() - 2;
    if target >= total {
        return (path[path.len() - 1], last_segment);
    }

    let mut walked = 0.0;
    for (i, w) in path.windows(2).enumerate() {
        let seg = w[0].planar_distance_m(w[1]);
        if seg > 0.0 && walked + seg >= target {
            let t = ((target - walked) / seg).clamp(0.0, 1.0);
            return (w[0].lerp(w[1], t), i);
        }
        walked += seg;
    }

    (path[path.len() - 1], last_segment)
}
