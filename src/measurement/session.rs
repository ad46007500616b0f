//! Measurement session snapshot and derived metrics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo_utils::{polygon_area_square_meters, polyline_length};
use crate::LatLng;

/// What a measurement computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementMode {
    Distance,
    Area,
}

impl MeasurementMode {
    /// Points required before the measurement can be completed.
    pub fn min_points(self) -> usize {
        match self {
            MeasurementMode::Distance => 2,
            MeasurementMode::Area => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MeasurementMode::Distance => "distance",
            MeasurementMode::Area => "area",
        }
    }
}

impl fmt::Display for MeasurementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state derived from a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementState {
    /// No mode and no points.
    Idle,
    /// Collecting points for the given mode.
    Active(MeasurementMode),
    /// Finished; points and metrics are kept for display.
    Completed,
}

/// Points placed by the user and the metrics derived from them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementSession {
    pub mode: Option<MeasurementMode>,
    pub points: Vec<LatLng>,
    pub length_meters: f64,
    pub area_square_meters: f64,
}

impl MeasurementSession {
    /// Session with no mode, no points and zero metrics.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Empty session collecting points for `mode`.
    pub fn started(mode: MeasurementMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn state(&self) -> MeasurementState {
        match self.mode {
            Some(mode) => MeasurementState::Active(mode),
            None if self.points.is_empty() => MeasurementState::Idle,
            None => MeasurementState::Completed,
        }
    }

    /// Whether the active mode has enough points to complete.
    pub fn can_complete(&self) -> bool {
        self.mode
            .is_some_and(|mode| self.points.len() >= mode.min_points())
    }

    /// Copy of this session with `points` and freshly derived metrics.
    pub(crate) fn with_points(&self, points: Vec<LatLng>) -> Self {
        Self {
            mode: self.mode,
            length_meters: polyline_length(&points),
            area_square_meters: polygon_area_square_meters(&points),
            points,
        }
    }
}
