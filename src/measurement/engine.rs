//! Measurement state machine.

use std::fmt;
use std::sync::Arc;

use log::debug;

use super::listener::{MeasurementListener, NoopListener};
use super::session::{MeasurementMode, MeasurementSession, MeasurementState};
use crate::error::{FireMapError, OptionExt, Result};
use crate::LatLng;

/// Keys the input layer forwards to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementKey {
    Escape,
    Enter,
    Backspace,
    Delete,
}

/// User input already translated to map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasurementInput {
    /// Primary click at a map position.
    PrimaryClick(LatLng),
    /// Secondary (context menu) click.
    SecondaryClick,
    DoubleClick,
    Key(MeasurementKey),
}

/// Drives one measurement session through start, add, undo, complete and cancel.
///
/// Every mutation replaces the session with a new immutable snapshot, so
/// readers holding an earlier [`snapshot`](Self::snapshot) never observe a
/// half-applied change. Operations called from a state that does not permit
/// them leave the session untouched and return `false`.
pub struct MeasurementEngine {
    session: Arc<MeasurementSession>,
    interaction_enabled: bool,
    listener: Arc<dyn MeasurementListener>,
}

impl Default for MeasurementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MeasurementEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementEngine")
            .field("session", &self.session)
            .field("interaction_enabled", &self.interaction_enabled)
            .finish_non_exhaustive()
    }
}

impl MeasurementEngine {
    /// Create an idle engine without a listener.
    pub fn new() -> Self {
        Self::with_listener(Arc::new(NoopListener))
    }

    /// Create an idle engine reporting to `listener`.
    pub fn with_listener(listener: Arc<dyn MeasurementListener>) -> Self {
        Self {
            session: Arc::new(MeasurementSession::idle()),
            interaction_enabled: true,
            listener,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn session(&self) -> &MeasurementSession {
        &self.session
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<MeasurementSession> {
        Arc::clone(&self.session)
    }

    pub fn state(&self) -> MeasurementState {
        self.session.state()
    }

    pub fn mode(&self) -> Option<MeasurementMode> {
        self.session.mode
    }

    pub fn points(&self) -> &[LatLng] {
        &self.session.points
    }

    pub fn length_meters(&self) -> f64 {
        self.session.length_meters
    }

    pub fn area_square_meters(&self) -> f64 {
        self.session.area_square_meters
    }

    /// Whether [`complete`](Self::complete) would take effect.
    pub fn can_complete(&self) -> bool {
        self.session.can_complete()
    }

    /// False while a measurement holds the map interaction lock.
    pub fn is_interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Begin a fresh measurement and lock map interaction.
    ///
    /// Only valid from idle or completed sessions.
    pub fn start(&mut self, mode: MeasurementMode) -> bool {
        if self.session.mode.is_some() {
            return false;
        }

        debug!("[Measurement] Start {}", mode);
        self.replace(MeasurementSession::started(mode));
        self.set_interaction(false);
        true
    }

    /// Append a point and recompute metrics. Non-finite points are ignored.
    pub fn add_point(&mut self, point: LatLng) -> bool {
        if self.session.mode.is_none() || !point.latitude.is_finite() || !point.longitude.is_finite()
        {
            return false;
        }

        let mut points = self.session.points.clone();
        points.push(point);
        let next = self.session.with_points(points);
        self.replace(next);
        true
    }

    /// Drop the most recent point and recompute metrics.
    pub fn undo_last(&mut self) -> bool {
        if self.session.mode.is_none() || self.session.points.is_empty() {
            return false;
        }

        let mut points = self.session.points.clone();
        points.pop();
        let next = self.session.with_points(points);
        self.replace(next);
        true
    }

    /// Finish the measurement, keeping its points and metrics, and unlock the map.
    ///
    /// No-op unless [`can_complete`](Self::can_complete) holds.
    pub fn complete(&mut self) -> bool {
        if !self.can_complete() {
            return false;
        }

        let next = MeasurementSession {
            mode: None,
            ..(*self.session).clone()
        };
        debug!(
            "[Measurement] Completed with {} points ({:.1} m, {:.1} sq m)",
            next.points.len(),
            next.length_meters,
            next.area_square_meters
        );
        self.replace(next);
        self.set_interaction(true);
        true
    }

    /// Checked variant of [`complete`](Self::complete) that explains why it failed.
    pub fn try_complete(&mut self) -> Result<()> {
        let mode = self
            .session
            .mode
            .ok_or_else(|| FireMapError::InvalidState("no measurement in progress".to_string()))?;

        let point_count = self.session.points.len();
        let minimum_required = mode.min_points();
        (point_count >= minimum_required)
            .then_some(())
            .ok_or_insufficient_points(mode, point_count, minimum_required)?;

        self.complete();
        Ok(())
    }

    /// Discard everything and unlock the map. Valid from any state.
    pub fn cancel(&mut self) {
        if *self.session != MeasurementSession::idle() {
            debug!("[Measurement] Cancelled");
            self.replace(MeasurementSession::idle());
        }
        self.set_interaction(true);
    }

    /// Apply a user input event.
    ///
    /// Inputs are only bound while a measurement is active; otherwise they
    /// are ignored.
    pub fn handle(&mut self, input: MeasurementInput) -> bool {
        if self.session.mode.is_none() {
            return false;
        }

        match input {
            MeasurementInput::PrimaryClick(point) => self.add_point(point),
            MeasurementInput::SecondaryClick
            | MeasurementInput::Key(MeasurementKey::Backspace)
            | MeasurementInput::Key(MeasurementKey::Delete) => self.undo_last(),
            MeasurementInput::DoubleClick | MeasurementInput::Key(MeasurementKey::Enter) => {
                self.complete()
            }
            MeasurementInput::Key(MeasurementKey::Escape) => {
                self.cancel();
                true
            }
        }
    }

    fn replace(&mut self, next: MeasurementSession) {
        self.session = Arc::new(next);
        self.listener.on_change(&self.session);
    }

    fn set_interaction(&mut self, enabled: bool) {
        if self.interaction_enabled != enabled {
            self.interaction_enabled = enabled;
            self.listener.on_interaction_lock(!enabled);
        }
    }
}
