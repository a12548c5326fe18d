//! Signal phase controller tests

use intersection_sim::simulation::{
    LightState, PhaseChange, Road, SignalController, DEFAULT_PHASE_DURATION,
};

#[test]
fn test_initial_green_road() {
    let signals = SignalController::new(2.0, Some(Road::C));
    assert!(signals.is_green(Road::C));
    assert_eq!(signals.green_count(), 1);
    for road in [Road::A, Road::B, Road::D] {
        assert_eq!(signals.state(road), LightState::Red);
    }
}

#[test]
fn test_phase_changes_only_after_duration() {
    let mut signals = SignalController::new(2.0, Some(Road::A));

    // 0.5 is exact in binary, so four updates hit 2.0 exactly
    assert_eq!(signals.update(0.5), None);
    assert_eq!(signals.update(0.5), None);
    assert_eq!(signals.update(0.5), None);
    assert!(signals.is_green(Road::A));

    let change = signals.update(0.5);
    assert_eq!(
        change,
        Some(PhaseChange {
            from: Some(Road::A),
            to: Road::B
        })
    );
    assert!(signals.is_green(Road::B));
    assert!(!signals.is_green(Road::A));
    assert_eq!(signals.elapsed(), 0.0);
}

#[test]
fn test_timer_resets_after_transition() {
    let mut signals = SignalController::new(2.0, Some(Road::A));
    // Overshoot is not carried into the next phase
    assert!(signals.update(3.0).is_some());
    assert_eq!(signals.elapsed(), 0.0);
    assert_eq!(signals.update(1.5), None);
    assert!(signals.is_green(Road::B));
}

#[test]
fn test_round_robin_order() {
    let mut signals = SignalController::new(1.0, Some(Road::A));
    let mut order = Vec::new();
    for _ in 0..8 {
        if let Some(change) = signals.update(1.0) {
            order.push(change.to);
        }
    }
    assert_eq!(
        order,
        vec![
            Road::B,
            Road::C,
            Road::D,
            Road::A,
            Road::B,
            Road::C,
            Road::D,
            Road::A
        ]
    );
}

#[test]
fn test_idle_start_turns_a_green_first() {
    let mut signals = SignalController::new(1.0, None);
    assert_eq!(signals.green_count(), 0);
    assert_eq!(signals.green_road(), None);

    let change = signals.update(1.0).expect("phase should change");
    assert_eq!(change.from, None);
    assert_eq!(change.to, Road::A);
    assert_eq!(signals.green_count(), 1);
}

#[test]
fn test_at_most_one_green_over_many_updates() {
    let mut signals = SignalController::new(0.7, Some(Road::D));
    for _ in 0..500 {
        signals.update(0.1);
        assert_eq!(signals.green_count(), 1);
    }
}

#[test]
fn test_invalid_phase_duration_falls_back_to_default() {
    for duration in [0.0, -3.0, f32::NAN, f32::INFINITY] {
        let mut signals = SignalController::new(duration, Some(Road::A));
        assert_eq!(signals.phase_duration(), DEFAULT_PHASE_DURATION);

        // A short tick must not switch phase
        assert_eq!(signals.update(0.1), None);
        assert!(signals.is_green(Road::A));
    }
}
