//! GeoJSON ingestion of detection feature collections.
//!
//! Only `Point` features with finite, in-range coordinates become
//! detections. Anything else is skipped silently (with a `warn!` summary).

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FireMapError, Result};
use crate::{is_valid_coordinate, sanitize_weight, DetectionPoint, LatLng};

/// Property names carrying radiative power, in lookup order.
const WEIGHT_KEYS: [&str; 3] = ["frp", "FRP", "FRPValue"];

/// A GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// A GeoJSON `Feature`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// Feature geometry. Only points are kept; other types deserialize to `Other`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        #[serde(default)]
        coordinates: Vec<Value>,
    },
    #[serde(other)]
    Other,
}

impl Feature {
    /// `(longitude, latitude)` if this is a point with numeric coordinates.
    pub fn point_coordinates(&self) -> Option<(f64, f64)> {
        match &self.geometry {
            Some(Geometry::Point { coordinates }) => {
                let lng = coordinates.first()?.as_f64()?;
                let lat = coordinates.get(1)?.as_f64()?;
                Some((lng, lat))
            }
            _ => None,
        }
    }

    /// Convert into a detection, explaining why the feature is unusable otherwise.
    pub fn to_detection(&self, index: usize) -> Result<DetectionPoint> {
        let invalid = |reason: &str| FireMapError::InvalidGeometry {
            index,
            reason: reason.to_string(),
        };

        let (lng, lat) = match &self.geometry {
            Some(Geometry::Point { .. }) => self
                .point_coordinates()
                .ok_or_else(|| invalid("point coordinates are not numeric"))?,
            Some(Geometry::Other) => return Err(invalid("geometry is not a Point")),
            None => return Err(invalid("missing geometry")),
        };
        if !is_valid_coordinate(lat, lng) {
            return Err(invalid("coordinates out of range"));
        }

        Ok(DetectionPoint::new(index as u64, lng, lat, self.weight()))
    }

    /// Radiative power from the feature properties, or 0 when absent or unusable.
    pub fn weight(&self) -> f64 {
        let Some(properties) = &self.properties else {
            return 0.0;
        };

        WEIGHT_KEYS
            .iter()
            .find_map(|key| properties.get(*key).filter(|v| !v.is_null()))
            .and_then(numeric_value)
            .map(sanitize_weight)
            .unwrap_or(0.0)
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parse a GeoJSON document.
pub fn parse_feature_collection(json: &str) -> Result<FeatureCollection> {
    Ok(serde_json::from_str(json)?)
}

/// Detections for every valid point feature; `id` is the feature's position.
pub fn to_detection_points(collection: &FeatureCollection) -> Vec<DetectionPoint> {
    let points: Vec<DetectionPoint> = collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(index, feature)| match feature.to_detection(index) {
            Ok(point) => Some(point),
            Err(err) => {
                debug!("[Detections] {}", err);
                None
            }
        })
        .collect();

    let skipped = collection.features.len() - points.len();
    if skipped > 0 {
        warn!(
            "[Detections] Skipped {} of {} features without a valid point geometry",
            skipped,
            collection.features.len()
        );
    }

    points
}

/// Positions of every valid point feature, for viewport fitting.
pub fn extract_lat_lngs(collection: &FeatureCollection) -> Vec<LatLng> {
    collection
        .features
        .iter()
        .filter_map(Feature::point_coordinates)
        .filter(|&(lng, lat)| is_valid_coordinate(lat, lng))
        .map(|(lng, lat)| LatLng::new(lat, lng))
        .collect()
}
