//! Immutable hierarchical cluster index.

use std::time::Instant;

use log::{debug, info, warn};

use super::tree::{lat_y, lng_x, Level, Node, NodeKind};
use super::{ClusterId, ClusterItem};
use crate::{ClusterConfig, DetectionPoint};

/// Highest zoom a [`ClusterId`] can encode.
const MAX_SUPPORTED_ZOOM: u8 = 30;

/// Zoom-dependent cluster index over a snapshot of detections.
///
/// Built once per point set and never mutated. Rebuild it whenever the
/// detections change.
#[derive(Debug)]
pub struct ClusterIndex {
    config: ClusterConfig,
    points: Vec<DetectionPoint>,
    /// One level per zoom in `0..=max_zoom + 1`; the top one holds raw detections.
    levels: Vec<Level>,
    indexed: usize,
}

impl Default for ClusterIndex {
    fn default() -> Self {
        Self::build(&[], ClusterConfig::default())
    }
}

impl ClusterIndex {
    /// Build an index over `points`.
    ///
    /// Detections with non-finite or out-of-range coordinates are skipped.
    /// Leaf items keep referring to positions in `points`.
    pub fn build(points: &[DetectionPoint], config: ClusterConfig) -> Self {
        let start = Instant::now();
        let config = normalize(config);

        let leaves = project_points(points);
        let skipped = points.len() - leaves.len();
        if skipped > 0 {
            warn!(
                "[ClusterIndex] Skipped {} detections with invalid coordinates",
                skipped
            );
        }
        let indexed = leaves.len();

        let top = usize::from(config.max_zoom) + 1;
        let mut levels: Vec<Level> = (0..=top).map(|_| Level::empty()).collect();
        let mut current = Level::new(leaves);

        for zoom in (config.min_zoom..=config.max_zoom).rev() {
            let next = cluster_level(&mut current, zoom, &config);
            debug!(
                "[ClusterIndex] zoom {}: {} nodes -> {} nodes",
                zoom,
                current.len(),
                next.len()
            );
            levels[usize::from(zoom) + 1] = current;
            current = Level::new(next);
        }
        levels[usize::from(config.min_zoom)] = current;

        info!(
            "[ClusterIndex] Indexed {} detections across zooms {}..={} in {:?}",
            indexed,
            config.min_zoom,
            config.max_zoom,
            start.elapsed()
        );

        Self {
            config,
            points: points.to_vec(),
            levels,
            indexed,
        }
    }

    /// Configuration the index was built with, after clamping.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Number of indexed detections.
    pub fn len(&self) -> usize {
        self.indexed
    }

    pub fn is_empty(&self) -> bool {
        self.indexed == 0
    }

    /// Clusters and detections inside `[west, south, east, north]` at `zoom`.
    ///
    /// An inverted or empty box yields an empty list. Longitude spans of 360
    /// degrees or more cover the whole world. Zooms below `min_zoom` are
    /// clamped up. Zooms above `max_zoom` are not clamped back to `max_zoom`:
    /// they select the unclustered level, so every detection is returned
    /// individually. Every returned item's coordinates lie inside the box.
    pub fn query(&self, bbox: [f64; 4], zoom: i32) -> Vec<ClusterItem> {
        let [west, south, east, north] = bbox;
        if !(west < east && south < north) {
            return Vec::new();
        }

        let (west, east) = if east - west >= 360.0 {
            (-180.0, 180.0)
        } else {
            (west.max(-180.0), east.min(180.0))
        };
        let (south, north) = (south.max(-90.0), north.min(90.0));
        if west > east || south > north {
            return Vec::new();
        }

        let level = &self.levels[self.limit_zoom(zoom)];
        level
            .in_rect(
                [lng_x(west), lat_y(north)],
                [lng_x(east), lat_y(south)],
            )
            .into_iter()
            .map(|slot| self.item(&level.nodes[slot]))
            .filter(|item| {
                // Mercator clamps latitudes near the poles, so the projected
                // rectangle alone can admit items outside the box.
                let (longitude, latitude) = item.coordinates();
                (west..=east).contains(&longitude) && (south..=north).contains(&latitude)
            })
            .collect()
    }

    /// Items merged into `id`, as seen one zoom above its formation.
    ///
    /// Unknown ids yield an empty list.
    pub fn children(&self, id: ClusterId) -> Vec<ClusterItem> {
        let Some((level, seed)) = self.resolve(id) else {
            return Vec::new();
        };

        let radius = self.radius_at(id.zoom());
        level
            .within(seed.x, seed.y, radius)
            .into_iter()
            .filter(|&slot| level.nodes[slot].parent == Some(id))
            .map(|slot| self.item(&level.nodes[slot]))
            .collect()
    }

    /// Original detections under `id`, skipping `offset` and returning at most `limit`.
    pub fn leaves(&self, id: ClusterId, limit: usize, offset: usize) -> Vec<ClusterItem> {
        let mut out = Vec::new();
        if limit == 0 {
            return out;
        }
        self.append_leaves(&mut out, id, limit, offset, 0);
        out
    }

    /// Zoom at which `id` splits into several markers, capped at `max_display_zoom`.
    ///
    /// Returns `None` for ids this index did not issue.
    pub fn expansion_zoom(&self, id: ClusterId) -> Option<u8> {
        self.resolve(id)?;

        let mut current = id;
        let mut zoom = id.zoom();
        loop {
            let children = self.children(current);
            zoom += 1;
            match children.as_slice() {
                [ClusterItem::Cluster { id: only, .. }] => current = *only,
                _ => break,
            }
        }

        Some(zoom.min(self.config.max_display_zoom))
    }

    fn append_leaves(
        &self,
        out: &mut Vec<ClusterItem>,
        id: ClusterId,
        limit: usize,
        offset: usize,
        mut skipped: usize,
    ) -> usize {
        for child in self.children(id) {
            match child {
                ClusterItem::Cluster {
                    id: child_id,
                    point_count,
                    ..
                } => {
                    let count = point_count as usize;
                    if skipped + count <= offset {
                        skipped += count;
                    } else {
                        skipped = self.append_leaves(out, child_id, limit, offset, skipped);
                    }
                }
                ClusterItem::Leaf { .. } => {
                    if skipped < offset {
                        skipped += 1;
                    } else {
                        out.push(child);
                    }
                }
            }
            if out.len() == limit {
                break;
            }
        }
        skipped
    }

    /// Level holding the children of `id` and the seed node, if `id` is ours.
    fn resolve(&self, id: ClusterId) -> Option<(&Level, &Node)> {
        let zoom = id.zoom();
        if zoom < self.config.min_zoom || zoom > self.config.max_zoom {
            return None;
        }
        let level = self.levels.get(usize::from(zoom) + 1)?;
        let seed = level.nodes.get(id.seed_slot())?;
        (seed.parent == Some(id)).then_some((level, seed))
    }

    fn limit_zoom(&self, zoom: i32) -> usize {
        let min = i32::from(self.config.min_zoom);
        let max = i32::from(self.config.max_zoom) + 1;
        zoom.clamp(min, max) as usize
    }

    fn radius_at(&self, zoom: u8) -> f64 {
        search_radius(&self.config, zoom)
    }

    fn item(&self, node: &Node) -> ClusterItem {
        match node.kind {
            NodeKind::Leaf { source } => {
                let p = &self.points[source];
                ClusterItem::Leaf {
                    id: p.id,
                    longitude: p.longitude,
                    latitude: p.latitude,
                    source_index: source,
                    weight: node.weight,
                }
            }
            NodeKind::Cluster { id } => ClusterItem::Cluster {
                id,
                longitude: node.lng,
                latitude: node.lat,
                point_count: node.count,
                aggregate_weight: node.weight,
            },
        }
    }
}

fn normalize(mut config: ClusterConfig) -> ClusterConfig {
    config.max_zoom = config.max_zoom.min(MAX_SUPPORTED_ZOOM);
    config.min_zoom = config.min_zoom.min(config.max_zoom);
    if !(config.radius.is_finite() && config.radius >= 0.0) {
        config.radius = 0.0;
    }
    if !(config.extent.is_finite() && config.extent > 0.0) {
        config.extent = ClusterConfig::default().extent;
    }
    config
}

/// Merge radius in projected units at `zoom`.
fn search_radius(config: &ClusterConfig, zoom: u8) -> f64 {
    config.radius / (config.extent * 2f64.powi(i32::from(zoom)))
}

#[cfg(feature = "parallel")]
fn project_points(points: &[DetectionPoint]) -> Vec<Node> {
    use rayon::prelude::*;

    points
        .par_iter()
        .enumerate()
        .filter(|(_, p)| p.is_valid())
        .map(|(i, p)| Node::leaf(i, p))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn project_points(points: &[DetectionPoint]) -> Vec<Node> {
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_valid())
        .map(|(i, p)| Node::leaf(i, p))
        .collect()
}

/// Greedily merge the nodes of `level` into the nodes of the next lower zoom.
fn cluster_level(level: &mut Level, zoom: u8, config: &ClusterConfig) -> Vec<Node> {
    let radius = search_radius(config, zoom);
    let mut next = Vec::new();

    for i in 0..level.nodes.len() {
        if level.nodes[i].claimed {
            continue;
        }
        level.nodes[i].claimed = true;

        let (x, y, count) = {
            let n = &level.nodes[i];
            (n.x, n.y, n.count)
        };
        let neighbors: Vec<usize> = level
            .within(x, y, radius)
            .into_iter()
            .filter(|&j| !level.nodes[j].claimed)
            .collect();

        let total: u32 = count
            + neighbors
                .iter()
                .map(|&j| level.nodes[j].count)
                .sum::<u32>();

        if total > count && total >= config.min_points {
            let id = ClusterId::new(i, zoom);
            let mut wx = x * f64::from(count);
            let mut wy = y * f64::from(count);
            let mut wlng = level.nodes[i].lng * f64::from(count);
            let mut wlat = level.nodes[i].lat * f64::from(count);
            let mut weight = level.nodes[i].weight;

            for &j in &neighbors {
                let n = &mut level.nodes[j];
                n.claimed = true;
                n.parent = Some(id);
                wx += n.x * f64::from(n.count);
                wy += n.y * f64::from(n.count);
                wlng += n.lng * f64::from(n.count);
                wlat += n.lat * f64::from(n.count);
                weight += n.weight;
            }
            level.nodes[i].parent = Some(id);

            let total_f = f64::from(total);
            next.push(Node::cluster(
                id,
                [wx / total_f, wy / total_f],
                [wlng / total_f, wlat / total_f],
                total,
                weight,
            ));
        } else {
            next.push(level.nodes[i].promoted());
            // Too few to merge: keep the neighbours individual at this zoom.
            for &j in &neighbors {
                level.nodes[j].claimed = true;
                next.push(level.nodes[j].promoted());
            }
        }
    }

    next
}
