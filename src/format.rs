//! Display helpers for renderers: unit-aware metric labels and cluster size buckets.

use serde::{Deserialize, Serialize};

const KM_IN_METERS: f64 = 1_000.0;
const SQ_M_IN_SQ_KM: f64 = 1_000_000.0;
const SQ_M_IN_HECTARE: f64 = 10_000.0;

/// Clusters with at least this many detections are labelled medium.
pub const CLUSTER_MEDIUM_THRESHOLD: u32 = 100;
/// Clusters with at least this many detections are labelled large.
pub const CLUSTER_LARGE_THRESHOLD: u32 = 500;

/// Distance label: kilometres from 1 km, whole metres from 1 m, else centimetre precision.
pub fn format_distance_meters(value: f64) -> String {
    if value >= KM_IN_METERS {
        format!("{:.2} km", value / KM_IN_METERS)
    } else if value >= 1.0 {
        format!("{:.0} m", value)
    } else {
        format!("{:.2} m", value)
    }
}

/// Area label in square kilometres, hectares or square metres.
pub fn format_area_square_meters(value: f64) -> String {
    if value >= SQ_M_IN_SQ_KM {
        format!("{:.2} sq km", value / SQ_M_IN_SQ_KM)
    } else if value >= SQ_M_IN_HECTARE {
        format!("{:.2} ha", value / SQ_M_IN_HECTARE)
    } else {
        format!("{:.0} sq m", value)
    }
}

/// Display bucket for a cluster marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterSize {
    Small,
    Medium,
    Large,
}

impl ClusterSize {
    pub fn from_count(count: u32) -> Self {
        if count >= CLUSTER_LARGE_THRESHOLD {
            ClusterSize::Large
        } else if count >= CLUSTER_MEDIUM_THRESHOLD {
            ClusterSize::Medium
        } else {
            ClusterSize::Small
        }
    }

    /// Legend label.
    pub fn label(self) -> &'static str {
        match self {
            ClusterSize::Small => "< 100",
            ClusterSize::Medium => "100 - 499",
            ClusterSize::Large => "500+",
        }
    }
}
