//! # Cluster Index
//!
//! Zoom-dependent aggregation of detections into map markers.
//!
//! The index is built bottom-up: detections form the level just above
//! `max_zoom`, and every lower zoom greedily merges neighbours of the level
//! above that fall within a radius scaled by `2^zoom`, so the merge distance
//! stays roughly constant in screen pixels. A query only touches the level
//! for the requested zoom.
//!
//! ## Components
//!
//! - [`ClusterIndex`] - immutable index with `query`, `children`, `leaves`, `expansion_zoom`
//! - [`SharedClusterIndex`] - snapshot holder that swaps whole indices atomically
//! - [`ClusterItem`] - query result, either a cluster or a single detection

mod index;
mod shared;
pub(crate) mod tree;

pub use index::ClusterIndex;
pub use shared::SharedClusterIndex;

use serde::{Deserialize, Serialize};

/// Bits reserved for the formation zoom inside a [`ClusterId`].
const ZOOM_BITS: u32 = 5;
const ZOOM_MASK: u64 = (1 << ZOOM_BITS) - 1;

/// Identifier of a cluster within one [`ClusterIndex`].
///
/// Encodes the zoom at which the cluster formed and the slot of its seed
/// node one zoom above. Ids are only meaningful for the index that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(u64);

impl ClusterId {
    pub(crate) fn new(seed_slot: usize, zoom: u8) -> Self {
        Self(((seed_slot as u64) << ZOOM_BITS) | (u64::from(zoom) & ZOOM_MASK))
    }

    /// Rebuild an id from its raw value, e.g. one round-tripped through a UI.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Zoom level at which the cluster was formed.
    pub fn zoom(self) -> u8 {
        (self.0 & ZOOM_MASK) as u8
    }

    pub(crate) fn seed_slot(self) -> usize {
        (self.0 >> ZOOM_BITS) as usize
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One marker returned by a cluster query. Never stored by the index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClusterItem {
    /// Aggregate of several detections.
    Cluster {
        id: ClusterId,
        longitude: f64,
        latitude: f64,
        point_count: u32,
        /// Sum of member weights (radiative power).
        aggregate_weight: f64,
    },
    /// A single detection shown on its own.
    Leaf {
        /// Id of the detection.
        id: u64,
        longitude: f64,
        latitude: f64,
        /// Position of the detection in the slice passed to `build`.
        source_index: usize,
        weight: f64,
    },
}

impl ClusterItem {
    /// `(longitude, latitude)` of the marker.
    pub fn coordinates(&self) -> (f64, f64) {
        match *self {
            ClusterItem::Cluster {
                longitude,
                latitude,
                ..
            }
            | ClusterItem::Leaf {
                longitude,
                latitude,
                ..
            } => (longitude, latitude),
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, ClusterItem::Cluster { .. })
    }

    /// The cluster id, if this is a cluster.
    pub fn cluster_id(&self) -> Option<ClusterId> {
        match *self {
            ClusterItem::Cluster { id, .. } => Some(id),
            ClusterItem::Leaf { .. } => None,
        }
    }

    /// Number of detections represented (1 for a leaf).
    pub fn point_count(&self) -> u32 {
        match *self {
            ClusterItem::Cluster { point_count, .. } => point_count,
            ClusterItem::Leaf { .. } => 1,
        }
    }

    /// Total weight represented.
    pub fn weight(&self) -> f64 {
        match *self {
            ClusterItem::Cluster {
                aggregate_weight, ..
            } => aggregate_weight,
            ClusterItem::Leaf { weight, .. } => weight,
        }
    }
}
