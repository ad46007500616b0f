//! Error types for the ingestion and tooling boundaries.
//!
//! Core geometry, clustering and measurement operations are total and never
//! return these errors. Only parsing input and the checked measurement API do.

use std::io;

use thiserror::Error;

use crate::MeasurementMode;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FireMapError>;

/// Errors raised at the edges of the library.
#[derive(Error, Debug)]
pub enum FireMapError {
    /// Reading an input file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input was not valid JSON or did not match the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A feature could not be turned into a detection
    #[error("Invalid geometry at feature {index}: {reason}")]
    InvalidGeometry { index: usize, reason: String },

    /// A measurement was completed with too few points
    #[error("{mode} measurement has {point_count} points, needs at least {minimum_required}")]
    InsufficientPoints {
        mode: MeasurementMode,
        point_count: usize,
        minimum_required: usize,
    },

    /// Operation invoked outside the state that permits it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Malformed command-line or configuration argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience conversions from `Option` into crate errors.
pub trait OptionExt<T> {
    /// Map `None` to [`FireMapError::InsufficientPoints`].
    fn ok_or_insufficient_points(
        self,
        mode: MeasurementMode,
        point_count: usize,
        minimum_required: usize,
    ) -> Result<T>;

    /// Map `None` to [`FireMapError::InvalidArgument`].
    fn ok_or_invalid_argument(self, message: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_insufficient_points(
        self,
        mode: MeasurementMode,
        point_count: usize,
        minimum_required: usize,
    ) -> Result<T> {
        self.ok_or(FireMapError::InsufficientPoints {
            mode,
            point_count,
            minimum_required,
        })
    }

    fn ok_or_invalid_argument(self, message: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| FireMapError::InvalidArgument(message.into()))
    }
}
