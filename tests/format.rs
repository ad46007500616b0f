//! Tests for display formatting helpers

use firemap::format::{CLUSTER_LARGE_THRESHOLD, CLUSTER_MEDIUM_THRESHOLD};
use firemap::{format_area_square_meters, format_distance_meters, ClusterSize};

#[test]
fn test_distance_labels() {
    assert_eq!(format_distance_meters(0.0), "0.00 m");
    assert_eq!(format_distance_meters(0.5), "0.50 m");
    assert_eq!(format_distance_meters(12.4), "12 m");
    assert_eq!(format_distance_meters(999.0), "999 m");
    assert_eq!(format_distance_meters(1_000.0), "1.00 km");
    assert_eq!(format_distance_meters(111_200.0), "111.20 km");
}

#[test]
fn test_area_labels() {
    assert_eq!(format_area_square_meters(0.0), "0 sq m");
    assert_eq!(format_area_square_meters(9_999.0), "9999 sq m");
    assert_eq!(format_area_square_meters(10_000.0), "1.00 ha");
    assert_eq!(format_area_square_meters(250_000.0), "25.00 ha");
    assert_eq!(format_area_square_meters(1_000_000.0), "1.00 sq km");
    assert_eq!(format_area_square_meters(12_345_678.0), "12.35 sq km");
}

#[test]
fn test_cluster_size_buckets() {
    assert_eq!(ClusterSize::from_count(2), ClusterSize::Small);
    assert_eq!(
        ClusterSize::from_count(CLUSTER_MEDIUM_THRESHOLD - 1),
        ClusterSize::Small
    );
    assert_eq!(
        ClusterSize::from_count(CLUSTER_MEDIUM_THRESHOLD),
        ClusterSize::Medium
    );
    assert_eq!(
        ClusterSize::from_count(CLUSTER_LARGE_THRESHOLD - 1),
        ClusterSize::Medium
    );
    assert_eq!(
        ClusterSize::from_count(CLUSTER_LARGE_THRESHOLD),
        ClusterSize::Large
    );
    assert_eq!(ClusterSize::Large.label(), "500+");
}
