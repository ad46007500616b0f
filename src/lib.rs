//! # Fire Map
//!
//! Map-side geometry engine for exploring georeferenced wildfire detections.
//!
//! This library provides:
//! - A hierarchical, zoom-aware cluster index over thousands of detections
//! - Great-circle distance and regional polygon area math
//! - A measurement state machine for click-driven distance/area tools
//! - Viewport auto-fit bounds with degenerate-set handling
//! - GeoJSON ingestion of detection feature collections
//!
//! ## Features
//!
//! - **`parallel`** - Project input points in parallel with rayon during index builds
//! - **`synthetic`** - Deterministic synthetic detection generators (benchmarks, tests)
//! - **`cli`** - Build the `firemap-cli` debug tool
//!
//! ## Quick Start
//!
//! ```rust
//! use firemap::{ClusterConfig, ClusterIndex, DetectionPoint};
//!
//! let points = vec![
//!     DetectionPoint::new(0, -120.50, 35.20, 50.0),
//!     DetectionPoint::new(1, -120.51, 35.21, 75.0),
//!     DetectionPoint::new(2, -119.80, 36.00, 20.0),
//! ];
//!
//! let index = ClusterIndex::build(&points, ClusterConfig::default());
//! let items = index.query([-121.0, 34.5, -119.0, 36.5], 6);
//! assert!(items.iter().any(|item| item.is_cluster()));
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{FireMapError, OptionExt, Result};

// Geographic utilities (distance, length, area, bounds)
pub mod geo_utils;

// Zoom-dependent cluster index
pub mod cluster;
pub use cluster::{ClusterId, ClusterIndex, ClusterItem, SharedClusterIndex};

// Click-driven distance/area measurement
pub mod measurement;
pub use measurement::{
    MeasurementEngine, MeasurementInput, MeasurementKey, MeasurementListener, MeasurementMode,
    MeasurementSession, MeasurementState, NoopListener,
};

// Camera framing
pub mod viewport;
pub use viewport::{bounds_from_points, AutoFit, AutoFitRequest, Viewport};

// GeoJSON ingestion
pub mod detections;
pub use detections::{parse_feature_collection, to_detection_points, FeatureCollection};

// Display helpers for external renderers
pub mod format;
pub use format::{format_area_square_meters, format_distance_meters, ClusterSize};

// Synthetic detection generator for benchmarks
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate with latitude and longitude in degrees.
///
/// # Example
/// ```
/// use firemap::LatLng;
/// let point = LatLng::new(37.7749, -122.4194); // San Francisco
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    /// Create a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        is_valid_coordinate(self.latitude, self.longitude)
    }
}

impl From<[f64; 2]> for LatLng {
    /// Build from a `[lat, lng]` tuple, the order used by map click events.
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }
}

/// A single georeferenced wildfire detection.
///
/// `weight` is the radiative power of the detection. It only feeds cluster
/// labeling and never affects geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionPoint {
    pub id: u64,
    pub longitude: f64,
    pub latitude: f64,
    pub weight: f64,
}

impl DetectionPoint {
    /// Create a detection. Negative or non-finite weights are stored as 0.
    pub fn new(id: u64, longitude: f64, latitude: f64, weight: f64) -> Self {
        Self {
            id,
            longitude,
            latitude,
            weight: sanitize_weight(weight),
        }
    }

    /// Check if the detection can be indexed.
    pub fn is_valid(&self) -> bool {
        is_valid_coordinate(self.latitude, self.longitude)
    }

    /// The detection position as a coordinate.
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

pub(crate) fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

pub(crate) fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from coordinates. Returns `None` for empty input.
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lng: first.longitude,
            max_lng: first.longitude,
        };

        for p in rest {
            bounds.min_lat = bounds.min_lat.min(p.latitude);
            bounds.max_lat = bounds.max_lat.max(p.latitude);
            bounds.min_lng = bounds.min_lng.min(p.longitude);
            bounds.max_lng = bounds.max_lng.max(p.longitude);
        }

        Some(bounds)
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Corner form `[[min_lat, min_lng], [max_lat, max_lng]]` expected by map controllers.
    pub fn to_corners(&self) -> [[f64; 2]; 2] {
        [
            [self.min_lat, self.min_lng],
            [self.max_lat, self.max_lng],
        ]
    }

    /// Inverse of [`to_corners`](Self::to_corners).
    pub fn from_corners([[min_lat, min_lng], [max_lat, max_lng]]: [[f64; 2]; 2]) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Query form `[west, south, east, north]` accepted by [`ClusterIndex::query`].
    pub fn to_bbox(&self) -> [f64; 4] {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
    }
}

/// Configuration for the cluster index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Merge radius in pixels of a tile of size `extent`.
    /// Default: 60.0
    pub radius: f64,

    /// Tile extent the radius is measured against.
    /// Default: 512.0
    pub extent: f64,

    /// Lowest zoom level at which clusters are generated.
    /// Default: 0
    pub min_zoom: u8,

    /// Highest zoom level at which clusters are generated. Above it every
    /// detection is shown individually. Values above 30 are clamped.
    /// Default: 13
    pub max_zoom: u8,

    /// Minimum number of detections needed to form a cluster.
    /// Default: 2
    pub min_points: u32,

    /// Highest zoom a map can display; caps expansion zooms.
    /// Default: 18
    pub max_display_zoom: u8,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius: 60.0,
            extent: 512.0,
            min_zoom: 0,
            max_zoom: 13,
            min_points: 2,
            max_display_zoom: 18,
        }
    }
}
