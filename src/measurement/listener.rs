//! Change notifications for measurement sessions.
//!
//! The engine reports every new snapshot and every change of the map
//! interaction lock. Renderers subscribe however they like.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::MeasurementSession;

/// Receiver of measurement events.
///
/// May be shared with other event sources, so implementations must be
/// `Send + Sync`.
pub trait MeasurementListener: Send + Sync {
    /// Called after each mutation with the new snapshot.
    fn on_change(&self, session: &MeasurementSession);
    /// Called when the map must stop (`locked == true`) or resume panning and zooming.
    fn on_interaction_lock(&self, locked: bool);
}

/// Listener that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl MeasurementListener for NoopListener {
    fn on_change(&self, _session: &MeasurementSession) {}
    fn on_interaction_lock(&self, _locked: bool) {}
}

/// Listener that counts events and remembers the lock state.
/// Useful for tests and as a reference implementation.
#[derive(Debug, Default)]
pub struct RecordingListener {
    pub changes: AtomicU32,
    pub locked: AtomicBool,
    pub lock_events: AtomicU32,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn change_count(&self) -> u32 {
        self.changes.load(Ordering::SeqCst)
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}

impl MeasurementListener for RecordingListener {
    fn on_change(&self, _session: &MeasurementSession) {
        self.changes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_interaction_lock(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
        self.lock_events.fetch_add(1, Ordering::SeqCst);
    }
}
