//! Per-zoom node storage and R-tree lookups in projected space.
//!
//! Positions are Web Mercator coordinates normalised to the unit square, so
//! the world spans `[0, 1]` on both axes with `y` growing southwards.

use std::f64::consts::PI;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use super::ClusterId;
use crate::{sanitize_weight, DetectionPoint};

/// Longitude in degrees to normalised mercator x.
pub(crate) fn lng_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Latitude in degrees to normalised mercator y, clamped to the unit square.
pub(crate) fn lat_y(lat: f64) -> f64 {
    let sin = lat.to_radians().sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NodeKind {
    /// A single detection; `source` indexes the points handed to `build`.
    Leaf { source: usize },
    /// An aggregate formed at `id.zoom()`.
    Cluster { id: ClusterId },
}

/// A point or cluster living at one zoom level.
///
/// `x`/`y` drive the spatial search. `lng`/`lat` are the count-weighted
/// geographic centroid reported to callers, which stays exact where the
/// projection clamps near the poles.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub x: f64,
    pub y: f64,
    pub lng: f64,
    pub lat: f64,
    pub kind: NodeKind,
    pub count: u32,
    pub weight: f64,
    /// Cluster this node was merged into at the level below.
    pub parent: Option<ClusterId>,
    /// Set once the node has been considered while building the level below.
    pub claimed: bool,
}

impl Node {
    pub fn leaf(source: usize, point: &DetectionPoint) -> Self {
        Self {
            x: lng_x(point.longitude),
            y: lat_y(point.latitude),
            lng: point.longitude,
            lat: point.latitude,
            kind: NodeKind::Leaf { source },
            count: 1,
            weight: sanitize_weight(point.weight),
            parent: None,
            claimed: false,
        }
    }

    pub fn cluster(
        id: ClusterId,
        [x, y]: [f64; 2],
        [lng, lat]: [f64; 2],
        count: u32,
        weight: f64,
    ) -> Self {
        Self {
            x,
            y,
            lng,
            lat,
            kind: NodeKind::Cluster { id },
            count,
            weight,
            parent: None,
            claimed: false,
        }
    }

    /// Copy carried unchanged into the next lower zoom.
    pub fn promoted(&self) -> Self {
        Self {
            parent: None,
            claimed: false,
            ..self.clone()
        }
    }
}

/// R-tree entry pointing back into [`Level::nodes`].
#[derive(Debug, Clone, Copy)]
struct NodeRef {
    slot: usize,
    x: f64,
    y: f64,
}

impl RTreeObject for NodeRef {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for NodeRef {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// All nodes visible at a single zoom, with a spatial index over them.
#[derive(Debug)]
pub(crate) struct Level {
    pub nodes: Vec<Node>,
    tree: RTree<NodeRef>,
}

impl Level {
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            tree: RTree::new(),
        }
    }

    pub fn new(nodes: Vec<Node>) -> Self {
        let refs: Vec<NodeRef> = nodes
            .iter()
            .enumerate()
            .map(|(slot, n)| NodeRef {
                slot,
                x: n.x,
                y: n.y,
            })
            .collect();

        Self {
            nodes,
            tree: RTree::bulk_load(refs),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Slots within `radius` of `(x, y)`, inclusive, in slot order.
    pub fn within(&self, x: f64, y: f64, radius: f64) -> Vec<usize> {
        let mut slots: Vec<usize> = self
            .tree
            .locate_within_distance([x, y], radius * radius)
            .map(|r| r.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    /// Slots inside the projected rectangle, in slot order.
    pub fn in_rect(&self, min: [f64; 2], max: [f64; 2]) -> Vec<usize> {
        let envelope = AABB::from_corners(min, max);
        let mut slots: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|r| r.slot)
            .collect();
        slots.sort_unstable();
        slots
    }
}
