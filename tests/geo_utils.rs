//! Tests for geo_utils module

use firemap::geo_utils::*;
use firemap::LatLng;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_distance_same_point() {
    let p = LatLng::new(37.7749, -122.4194);
    assert_eq!(distance_meters(&p, &p), 0.0);
}

#[test]
fn test_distance_one_degree_at_equator() {
    let d = distance_meters(&LatLng::new(0.0, 0.0), &LatLng::new(0.0, 1.0));
    assert!(approx_eq(d, 111_195.0, 50.0), "got {}", d);
}

#[test]
fn test_distance_known_value() {
    // Los Angeles to San Francisco is approximately 559 km
    let la = LatLng::new(34.0522, -118.2437);
    let sf = LatLng::new(37.7749, -122.4194);
    let dist = distance_meters(&la, &sf);
    assert!(approx_eq(dist, 559_000.0, 5_000.0), "got {}", dist);
}

#[test]
fn test_distance_is_symmetric() {
    let a = LatLng::new(-33.8688, 151.2093);
    let b = LatLng::new(-37.8136, 144.9631);
    assert!(approx_eq(distance_meters(&a, &b), distance_meters(&b, &a), 1e-6));
}

#[test]
fn test_polyline_length_short_inputs() {
    assert_eq!(polyline_length(&[]), 0.0);
    assert_eq!(polyline_length(&[LatLng::new(10.0, 10.0)]), 0.0);
}

#[test]
fn test_polyline_length_sums_segments() {
    let track = vec![
        LatLng::new(0.0, 0.0),
        LatLng::new(0.0, 1.0),
        LatLng::new(0.0, 2.0),
    ];
    let expected = 2.0 * distance_meters(&track[0], &track[1]);
    assert!(approx_eq(polyline_length(&track), expected, 1e-6));
}

#[test]
fn test_polygon_area_short_inputs() {
    assert_eq!(polygon_area_square_meters(&[]), 0.0);
    assert_eq!(
        polygon_area_square_meters(&[LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0)]),
        0.0
    );
}

#[test]
fn test_polygon_area_matches_projected_shoelace() {
    let ring = [
        LatLng::new(0.0, 0.0),
        LatLng::new(0.0, 1.0),
        LatLng::new(1.0, 1.0),
    ];

    let mean_lat = (1.0f64 / 3.0).to_radians();
    let projected: Vec<(f64, f64)> = ring
        .iter()
        .map(|p| {
            (
                EARTH_RADIUS_METERS * p.longitude.to_radians() * mean_lat.cos(),
                EARTH_RADIUS_METERS * p.latitude.to_radians(),
            )
        })
        .collect();
    let mut sum = 0.0;
    for i in 0..projected.len() {
        let (x1, y1) = projected[i];
        let (x2, y2) = projected[(i + 1) % projected.len()];
        sum += x1 * y2 - x2 * y1;
    }
    let expected = sum.abs() / 2.0;

    let area = polygon_area_square_meters(&ring);
    assert!(
        (area - expected).abs() / expected < 1e-9,
        "area {} expected {}",
        area,
        expected
    );
}

#[test]
fn test_polygon_area_small_square() {
    // ~1km x ~1km square near the equator
    let d = 1_000.0 / 111_195.0;
    let ring = [
        LatLng::new(0.0, 0.0),
        LatLng::new(0.0, d),
        LatLng::new(d, d),
        LatLng::new(d, 0.0),
    ];
    let area = polygon_area_square_meters(&ring);
    assert!(approx_eq(area, 1_000_000.0, 1_000.0), "got {}", area);
}
