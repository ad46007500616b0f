//! # Geographic Utilities
//!
//! Distance, length and area computations for user-placed map points.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`distance_meters`] | Great-circle distance between two points |
//! | [`polyline_length`] | Total length of an ordered point list |
//! | [`polygon_area_square_meters`] | Regional planar area of a closed ring |
//!
//! ## Algorithm Notes
//!
//! ### Haversine Formula
//!
//! Distances assume a spherical Earth with a mean radius of 6,371,000 m.
//! Reference: [Haversine formula (Wikipedia)](https://en.wikipedia.org/wiki/Haversine_formula)
//!
//! ### Polygon Area
//!
//! Areas are computed on an equirectangular projection centred on the mean
//! latitude of the ring, followed by the shoelace formula. This is accurate
//! for regions up to a few hundred kilometres across. Continental polygons
//! will be noticeably off since no spherical excess is accounted for.

use geo::{Area, Coord, LineString, Polygon};

use crate::LatLng;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

// =============================================================================
// Distance Functions
// =============================================================================

/// Great-circle distance between two points in meters.
///
/// Returns 0 for coincident points.
///
/// ```rust
/// use firemap::{LatLng, geo_utils};
///
/// let d = geo_utils::distance_meters(&LatLng::new(0.0, 0.0), &LatLng::new(0.0, 1.0));
/// assert!((d - 111_195.0).abs() < 50.0);
/// ```
#[inline]
pub fn distance_meters(a: &LatLng, b: &LatLng) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lng = (b.longitude - a.longitude).to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lng = (d_lng / 2.0).sin();
    let h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;

    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Total length of a polyline in meters.
///
/// Empty or single-point lists return 0.
pub fn polyline_length(points: &[LatLng]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| distance_meters(&w[0], &w[1]))
        .sum()
}

// =============================================================================
// Area Functions
// =============================================================================

/// Area enclosed by a ring of points in square meters.
///
/// The ring is closed implicitly. Fewer than three points return 0.
pub fn polygon_area_square_meters(points: &[LatLng]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mean_lat = points.iter().map(|p| p.latitude).sum::<f64>() / points.len() as f64;
    let cos_mean = mean_lat.to_radians().cos();

    let ring: Vec<Coord> = points
        .iter()
        .map(|p| Coord {
            x: EARTH_RADIUS_METERS * p.longitude.to_radians() * cos_mean,
            y: EARTH_RADIUS_METERS * p.latitude.to_radians(),
        })
        .collect();

    Polygon::new(LineString::new(ring), vec![]).unsigned_area()
}
