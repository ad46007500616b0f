//! Tests for the measurement engine

use std::sync::Arc;

use firemap::measurement::RecordingListener;
use firemap::{
    FireMapError, LatLng, MeasurementEngine, MeasurementInput, MeasurementKey, MeasurementMode,
    MeasurementSession, MeasurementState,
};

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn engine_with_listener() -> (MeasurementEngine, Arc<RecordingListener>) {
    let listener = Arc::new(RecordingListener::new());
    let engine = MeasurementEngine::with_listener(listener.clone());
    (engine, listener)
}

#[test]
fn test_new_engine_is_idle() {
    let engine = MeasurementEngine::new();
    assert_eq!(engine.state(), MeasurementState::Idle);
    assert!(engine.is_interaction_enabled());
    assert!(!engine.can_complete());
    assert_eq!(*engine.session(), MeasurementSession::idle());
}

#[test]
fn test_distance_measurement_completes() {
    let (mut engine, listener) = engine_with_listener();

    assert!(engine.start(MeasurementMode::Distance));
    assert!(!engine.is_interaction_enabled());
    assert!(listener.is_locked());

    engine.add_point(LatLng::new(0.0, 0.0));
    assert!(!engine.can_complete());
    assert_eq!(engine.length_meters(), 0.0);

    engine.add_point(LatLng::new(0.0, 1.0));
    assert!(engine.can_complete());
    assert!(engine.complete());

    assert_eq!(engine.mode(), None);
    assert_eq!(engine.state(), MeasurementState::Completed);
    assert!(approx_eq(engine.length_meters(), 111_195.0, 50.0));
    assert_eq!(engine.points().len(), 2);
    assert!(engine.is_interaction_enabled());
    assert!(!listener.is_locked());
}

#[test]
fn test_area_cancel_clears_everything() {
    let (mut engine, listener) = engine_with_listener();

    engine.start(MeasurementMode::Area);
    engine.add_point(LatLng::new(0.0, 0.0));
    engine.add_point(LatLng::new(0.0, 1.0));
    engine.add_point(LatLng::new(1.0, 1.0));
    assert!(engine.area_square_meters() > 0.0);

    engine.cancel();

    assert_eq!(engine.points(), &[] as &[LatLng]);
    assert_eq!(engine.area_square_meters(), 0.0);
    assert_eq!(engine.length_meters(), 0.0);
    assert_eq!(engine.mode(), None);
    assert!(engine.is_interaction_enabled());
    assert!(!listener.is_locked());
}

#[test]
fn test_cancel_from_any_state_yields_idle() {
    let mut engine = MeasurementEngine::new();
    engine.cancel();
    assert_eq!(*engine.session(), MeasurementSession::idle());

    engine.start(MeasurementMode::Distance);
    engine.add_point(LatLng::new(10.0, 10.0));
    engine.add_point(LatLng::new(10.0, 11.0));
    engine.complete();
    assert_eq!(engine.state(), MeasurementState::Completed);

    engine.cancel();
    assert_eq!(*engine.session(), MeasurementSession::idle());
    assert_eq!(engine.state(), MeasurementState::Idle);
}

#[test]
fn test_complete_is_noop_below_threshold() {
    let mut engine = MeasurementEngine::new();
    engine.start(MeasurementMode::Area);
    engine.add_point(LatLng::new(0.0, 0.0));
    engine.add_point(LatLng::new(0.0, 1.0));
    let before = engine.session().clone();

    assert!(!engine.complete());
    assert_eq!(*engine.session(), before);
    assert_eq!(engine.state(), MeasurementState::Active(MeasurementMode::Area));
    assert!(!engine.is_interaction_enabled());
}

#[test]
fn test_try_complete_reports_reason() {
    let mut engine = MeasurementEngine::new();
    assert!(matches!(
        engine.try_complete(),
        Err(FireMapError::InvalidState(_))
    ));

    engine.start(MeasurementMode::Distance);
    engine.add_point(LatLng::new(0.0, 0.0));
    assert!(matches!(
        engine.try_complete(),
        Err(FireMapError::InsufficientPoints {
            mode: MeasurementMode::Distance,
            point_count: 1,
            minimum_required: 2,
        })
    ));

    engine.add_point(LatLng::new(0.0, 0.5));
    assert!(engine.try_complete().is_ok());
    assert_eq!(engine.state(), MeasurementState::Completed);
}

#[test]
fn test_idle_rejects_add_and_undo() {
    let (mut engine, listener) = engine_with_listener();
    assert!(!engine.add_point(LatLng::new(1.0, 1.0)));
    assert!(!engine.undo_last());
    assert!(engine.points().is_empty());
    assert_eq!(listener.change_count(), 0);
}

#[test]
fn test_completed_rejects_add_and_undo() {
    let mut engine = MeasurementEngine::new();
    engine.start(MeasurementMode::Distance);
    engine.add_point(LatLng::new(0.0, 0.0));
    engine.add_point(LatLng::new(0.0, 1.0));
    engine.complete();

    assert!(!engine.add_point(LatLng::new(0.0, 2.0)));
    assert!(!engine.undo_last());
    assert_eq!(engine.points().len(), 2);
}

#[test]
fn test_start_while_active_is_noop() {
    let mut engine = MeasurementEngine::new();
    engine.start(MeasurementMode::Distance);
    engine.add_point(LatLng::new(0.0, 0.0));

    assert!(!engine.start(MeasurementMode::Area));
    assert_eq!(engine.mode(), Some(MeasurementMode::Distance));
    assert_eq!(engine.points().len(), 1);
}

#[test]
fn test_restart_after_complete_resets_metrics() {
    let mut engine = MeasurementEngine::new();
    engine.start(MeasurementMode::Distance);
    engine.add_point(LatLng::new(0.0, 0.0));
    engine.add_point(LatLng::new(0.0, 1.0));
    engine.complete();

    assert!(engine.start(MeasurementMode::Area));
    assert!(engine.points().is_empty());
    assert_eq!(engine.length_meters(), 0.0);
    assert!(!engine.is_interaction_enabled());
}

#[test]
fn test_undo_recomputes_metrics() {
    let mut engine = MeasurementEngine::new();
    engine.start(MeasurementMode::Area);
    engine.add_point(LatLng::new(0.0, 0.0));
    engine.add_point(LatLng::new(0.0, 1.0));
    engine.add_point(LatLng::new(1.0, 1.0));
    let length_three = engine.length_meters();

    assert!(engine.undo_last());
    assert_eq!(engine.area_square_meters(), 0.0);
    assert!(engine.length_meters() < length_three);
    assert!(approx_eq(engine.length_meters(), 111_195.0, 50.0));

    assert!(engine.undo_last());
    assert_eq!(engine.length_meters(), 0.0);
    assert!(engine.undo_last());
    assert!(!engine.undo_last());
    assert_eq!(engine.state(), MeasurementState::Active(MeasurementMode::Area));
}

#[test]
fn test_metric_invariants_hold_throughout() {
    let mut engine = MeasurementEngine::new();
    engine.start(MeasurementMode::Area);
    for i in 0..6 {
        let p = engine.points().len();
        if p < 2 {
            assert_eq!(engine.length_meters(), 0.0);
        }
        if p < 3 {
            assert_eq!(engine.area_square_meters(), 0.0);
        }
        engine.add_point(LatLng::new(i as f64 * 0.1, (i * i) as f64 * 0.1));
    }
}

#[test]
fn test_listener_sees_every_change() {
    let (mut engine, listener) = engine_with_listener();
    engine.start(MeasurementMode::Distance);
    engine.add_point(LatLng::new(0.0, 0.0));
    engine.add_point(LatLng::new(0.0, 1.0));
    engine.undo_last();
    engine.cancel();

    assert_eq!(listener.change_count(), 5);
    assert_eq!(
        listener
            .lock_events
            .load(std::sync::atomic::Ordering::SeqCst),
        2
    );
}

#[test]
fn test_input_mapping() {
    let mut engine = MeasurementEngine::new();
    assert!(!engine.handle(MeasurementInput::PrimaryClick(LatLng::new(0.0, 0.0))));

    engine.start(MeasurementMode::Distance);
    assert!(engine.handle(MeasurementInput::PrimaryClick(LatLng::new(0.0, 0.0))));
    assert!(engine.handle(MeasurementInput::PrimaryClick(LatLng::new(0.0, 1.0))));
    assert!(engine.handle(MeasurementInput::PrimaryClick(LatLng::new(0.0, 2.0))));
    assert!(engine.handle(MeasurementInput::SecondaryClick));
    assert_eq!(engine.points().len(), 2);
    assert!(engine.handle(MeasurementInput::Key(MeasurementKey::Delete)));
    assert!(engine.handle(MeasurementInput::Key(MeasurementKey::Backspace)));
    assert!(engine.points().is_empty());

    engine.handle(MeasurementInput::PrimaryClick(LatLng::new(0.0, 0.0)));
    assert!(!engine.handle(MeasurementInput::DoubleClick));
    engine.handle(MeasurementInput::PrimaryClick(LatLng::new(0.0, 1.0)));
    assert!(engine.handle(MeasurementInput::Key(MeasurementKey::Enter)));
    assert_eq!(engine.state(), MeasurementState::Completed);

    // Completed sessions no longer react to input.
    assert!(!engine.handle(MeasurementInput::Key(MeasurementKey::Escape)));
    assert_eq!(engine.points().len(), 2);

    engine.start(MeasurementMode::Area);
    engine.handle(MeasurementInput::PrimaryClick(LatLng::new(0.0, 0.0)));
    assert!(engine.handle(MeasurementInput::Key(MeasurementKey::Escape)));
    assert_eq!(engine.state(), MeasurementState::Idle);
}

#[test]
fn test_session_serializes_camel_case() {
    let mut engine = MeasurementEngine::new();
    engine.start(MeasurementMode::Distance);
    engine.add_point(LatLng::new(1.0, 2.0));

    let json = serde_json::to_value(engine.session()).unwrap();
    assert_eq!(json["mode"], "distance");
    assert_eq!(json["lengthMeters"], 0.0);
    assert_eq!(json["points"][0]["latitude"], 1.0);
}
