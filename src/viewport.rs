//! Camera framing for query results.
//!
//! [`bounds_from_points`] derives a box around a result set and
//! [`AutoFit`] holds at most one pending request for the map controller,
//! which applies it and then clears it.

use serde::{Deserialize, Serialize};

use crate::{Bounds, LatLng};

/// Half-size in degrees of the box placed around a single coordinate.
pub const SINGLE_POINT_DELTA: f64 = 0.25;

/// Padding in pixels applied when a request does not specify one.
pub const DEFAULT_PADDING: [f64; 2] = [24.0, 24.0];

/// Map camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
}

impl Default for Viewport {
    /// Continental United States.
    fn default() -> Self {
        Self {
            center: LatLng::new(37.8, -96.9),
            zoom: 4.0,
        }
    }
}

impl Viewport {
    /// Partial update; `None` keeps the current value.
    pub fn set(&mut self, center: Option<LatLng>, zoom: Option<f64>) {
        if let Some(center) = center {
            self.center = center;
        }
        if let Some(zoom) = zoom {
            self.zoom = zoom;
        }
    }
}

/// Bounds enclosing `points`, or `None` when there is nothing to frame.
///
/// Non-finite coordinates are skipped. A set collapsing to one coordinate is
/// widened by [`SINGLE_POINT_DELTA`] on each side so the map never receives a
/// zero-area box.
pub fn bounds_from_points(points: &[LatLng]) -> Option<Bounds> {
    let finite: Vec<LatLng> = points
        .iter()
        .copied()
        .filter(|p| p.latitude.is_finite() && p.longitude.is_finite())
        .collect();
    let bounds = Bounds::from_points(&finite)?;

    if bounds.min_lat == bounds.max_lat && bounds.min_lng == bounds.max_lng {
        return Some(Bounds {
            min_lat: bounds.min_lat - SINGLE_POINT_DELTA,
            max_lat: bounds.max_lat + SINGLE_POINT_DELTA,
            min_lng: bounds.min_lng - SINGLE_POINT_DELTA,
            max_lng: bounds.max_lng + SINGLE_POINT_DELTA,
        });
    }

    Some(bounds)
}

/// A one-shot instruction to frame `bounds` with `padding` pixels.
///
/// Serializes `bounds` in corner form, `[[min_lat, min_lng], [max_lat, max_lng]]`,
/// which map controllers accept directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoFitRequest {
    #[serde(with = "corners")]
    pub bounds: Bounds,
    pub padding: [f64; 2],
}

mod corners {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::Bounds;

    pub fn serialize<S: Serializer>(bounds: &Bounds, serializer: S) -> Result<S::Ok, S::Error> {
        bounds.to_corners().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bounds, D::Error> {
        <[[f64; 2]; 2]>::deserialize(deserializer).map(Bounds::from_corners)
    }
}

/// Holder of the single pending [`AutoFitRequest`].
///
/// A new request replaces an unconsumed one; there is no queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoFit {
    pending: Option<AutoFitRequest>,
}

impl AutoFit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a request, replacing any pending one. `None` padding means [`DEFAULT_PADDING`].
    pub fn request(&mut self, bounds: Bounds, padding: Option<[f64; 2]>) {
        self.pending = Some(AutoFitRequest {
            bounds,
            padding: padding.unwrap_or(DEFAULT_PADDING),
        });
    }

    /// Request a fit around `points` if they produce bounds. Returns whether a request was stored.
    pub fn request_for_points(&mut self, points: &[LatLng], padding: Option<[f64; 2]>) -> bool {
        match bounds_from_points(points) {
            Some(bounds) => {
                self.request(bounds, padding);
                true
            }
            None => false,
        }
    }

    /// The pending request, if any. Reading does not consume it.
    pub fn pending(&self) -> Option<&AutoFitRequest> {
        self.pending.as_ref()
    }

    /// Drop the pending request. Controllers call this right after applying it.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Read and clear in one step.
    pub fn take(&mut self) -> Option<AutoFitRequest> {
        self.pending.take()
    }
}
