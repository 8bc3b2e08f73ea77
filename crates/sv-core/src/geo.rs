//! Geographic coordinate type and the planar metric used everywhere in the
//! simulator.
//!
//! Coordinates are `[longitude, latitude]` in decimal degrees, the GeoJSON
//! order.  Distances use a locally-flat approximation:
//!
//! ```text
//! dx = Δlon · 111 320 m · cos(lat₁)
//! dy = Δlat · 110 540 m
//! d  = √(dx² + dy²)
//! ```
//!
//! Good to well under 1 % at city scale, which is all the simulator covers.

use serde::{Deserialize, Serialize};

/// Metres per degree of longitude at the equator.
pub const METERS_PER_DEG_LON: f64 = 111_320.0;

/// Metres per degree of latitude.
pub const METERS_PER_DEG_LAT: f64 = 110_540.0;

/// A WGS-84 coordinate, longitude first.
///
/// Serialised as a two-element array `[lon, lat]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Planar-approximate distance in metres (see module docs).
    ///
    /// The longitude scale uses the latitude of `self`, so the metric is not
    /// perfectly symmetric; callers walk paths in order and always pass the
    /// earlier point as `self`.
    pub fn planar_distance_m(self, other: GeoPoint) -> f64 {
        let dx = (other.lon - self.lon) * METERS_PER_DEG_LON * self.lat.to_radians().cos();
        let dy = (other.lat - self.lat) * METERS_PER_DEG_LAT;
        dx.hypot(dy)
    }

    /// Initial compass bearing from `self` to `other`, in `[0, 360)` degrees
    /// (0 = north, clockwise).
    ///
    /// Identical points yield `0.0`.
    pub fn bearing_deg(self, other: GeoPoint) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let y = d_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

        normalize_bearing(y.atan2(x).to_degrees())
    }

    /// Linear interpolation in coordinate space; `t = 0` is `self`, `t = 1`
    /// is `other`.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lon: self.lon + (other.lon - self.lon) * t,
            lat: self.lat + (other.lat - self.lat) * t,
        }
    }
}

/// Fold any bearing in degrees into `[0, 360)`.
pub fn normalize_bearing(deg: f64) -> f64 {
    let b = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if b >= 360.0 { 0.0 } else { b }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lon, p.lat]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.6}, {:.6}]", self.lon, self.lat)
    }
}
