//! # Measurement Engine
//!
//! Click-driven distance and area measurement on the map.
//!
//! - `session` - immutable session snapshots and derived metrics
//! - `engine` - state machine over the session (`start`, `add_point`, `undo_last`, `complete`, `cancel`)
//! - `listener` - change and interaction-lock notifications
//!
//! ```rust
//! use firemap::{LatLng, MeasurementEngine, MeasurementMode};
//!
//! let mut engine = MeasurementEngine::new();
//! engine.start(MeasurementMode::Distance);
//! engine.add_point(LatLng::new(0.0, 0.0));
//! engine.add_point(LatLng::new(0.0, 1.0));
//! assert!(engine.can_complete());
//! engine.complete();
//! assert!((engine.length_meters() - 111_195.0).abs() < 50.0);
//! ```

pub mod engine;
pub mod listener;
pub mod session;

pub use engine::{MeasurementEngine, MeasurementInput, MeasurementKey};
pub use listener::{MeasurementListener, NoopListener, RecordingListener};
pub use session::{MeasurementMode, MeasurementSession, MeasurementState};
