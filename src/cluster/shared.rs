//! Snapshot holder for rebuilding an index while readers keep querying.

use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use super::{ClusterIndex, ClusterItem};
use crate::{ClusterConfig, DetectionPoint};

/// Publishes complete [`ClusterIndex`] snapshots behind an atomic swap.
///
/// Readers take an `Arc` to the current snapshot and keep using it even
/// after a newer index is published. A rebuild happens outside the lock, so
/// queries never observe a partially built index.
#[derive(Debug, Default)]
pub struct SharedClusterIndex {
    current: RwLock<Arc<ClusterIndex>>,
}

impl SharedClusterIndex {
    /// Wrap an already built index.
    pub fn new(index: ClusterIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// The index currently published.
    pub fn snapshot(&self) -> Arc<ClusterIndex> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Replace the published index, returning the previous snapshot.
    pub fn publish(&self, index: ClusterIndex) -> Arc<ClusterIndex> {
        self.swap(Arc::new(index))
    }

    /// Build a new index from `points` and publish it.
    pub fn rebuild(&self, points: &[DetectionPoint], config: ClusterConfig) -> Arc<ClusterIndex> {
        let index = ClusterIndex::build(points, config);
        debug!("[SharedClusterIndex] Publishing index of {} detections", index.len());
        let next = Arc::new(index);
        self.swap(Arc::clone(&next));
        next
    }

    /// Query the current snapshot.
    pub fn query(&self, bbox: [f64; 4], zoom: i32) -> Vec<ClusterItem> {
        self.snapshot().query(bbox, zoom)
    }

    fn swap(&self, next: Arc<ClusterIndex>) -> Arc<ClusterIndex> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}
