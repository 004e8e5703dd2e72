//! Adaptive signal controller behavior

use traffic_signal_sim::simulation::{
    QueueDepths, RoadId, SignalColor, SignalController, SignalPhase, SignalTiming,
    SignalTransition,
};

fn reference_timing() -> SignalTiming {
    SignalTiming {
        min_green: 5.0,
        max_green: 10.0,
        both_red: 1.0,
        vertical_threshold: 4,
        horizontal_threshold: 7,
    }
}

/// Step the controller until it starts a both-red dwell, returning the number of calls
fn steps_until_toggle(controller: &mut SignalController, dt: f32, depths: QueueDepths) -> usize {
    for step in 1..=1000 {
        if controller.simulate(dt, &depths) == SignalTransition::BothRedStarted {
            return step;
        }
    }
    panic!("controller never toggled");
}

#[test]
fn test_identical_start_colors_resolve_to_vertical_green() {
    let controller = SignalController::new(SignalColor::Red, SignalColor::Red, reference_timing());
    assert_eq!(controller.color_of(RoadId::Vertical), SignalColor::Green);
    assert_eq!(controller.color_of(RoadId::Horizontal), SignalColor::Red);
    assert_eq!(controller.phase(), SignalPhase::GreenVertical);

    let controller =
        SignalController::new(SignalColor::Green, SignalColor::Green, reference_timing());
    assert_eq!(controller.color_of(RoadId::Vertical), SignalColor::Green);
    assert_eq!(controller.color_of(RoadId::Horizontal), SignalColor::Red);
}

#[test]
fn test_distinct_start_colors_are_kept() {
    let controller =
        SignalController::new(SignalColor::Red, SignalColor::Green, reference_timing());
    assert_eq!(controller.phase(), SignalPhase::GreenHorizontal);
    assert_eq!(controller.green_road(), Some(RoadId::Horizontal));
}

#[test]
fn test_long_queue_cannot_cut_minimum_green() {
    let mut controller =
        SignalController::new(SignalColor::Red, SignalColor::Red, reference_timing());
    let depths = QueueDepths {
        vertical: 0,
        horizontal: 100,
    };

    let steps = steps_until_toggle(&mut controller, 0.1, depths);
    // 50 steps of 0.1s is the 5s minimum
    assert_eq!(steps, 50, "toggled after {} virtual seconds", steps as f32 * 0.1);
}

#[test]
fn test_empty_queue_still_toggles_at_maximum_green() {
    let mut controller =
        SignalController::new(SignalColor::Red, SignalColor::Red, reference_timing());
    let depths = QueueDepths::default();

    let steps = steps_until_toggle(&mut controller, 0.1, depths);
    assert_eq!(steps, 100, "toggled after {} virtual seconds", steps as f32 * 0.1);
}

#[test]
fn test_queue_must_exceed_threshold() {
    let mut at_threshold =
        SignalController::new(SignalColor::Green, SignalColor::Red, reference_timing());
    let depths = QueueDepths {
        vertical: 0,
        horizontal: 7,
    };
    // Equal to the horizontal threshold: waits for max green
    assert_eq!(steps_until_toggle(&mut at_threshold, 0.1, depths), 100);

    let mut over_threshold =
        SignalController::new(SignalColor::Green, SignalColor::Red, reference_timing());
    let depths = QueueDepths {
        vertical: 0,
        horizontal: 8,
    };
    assert_eq!(steps_until_toggle(&mut over_threshold, 0.1, depths), 50);
}

#[test]
fn test_threshold_is_read_for_the_red_road() {
    // Horizontal green, so the vertical threshold of 4 applies
    let mut controller =
        SignalController::new(SignalColor::Red, SignalColor::Green, reference_timing());
    let depths = QueueDepths {
        vertical: 5,
        horizontal: 0,
    };
    assert_eq!(steps_until_toggle(&mut controller, 0.1, depths), 50);
}

#[test]
fn test_both_red_dwell_completes_to_opposite_colors() {
    let mut controller =
        SignalController::new(SignalColor::Green, SignalColor::Red, reference_timing());
    controller.toggle_signals();

    assert_eq!(controller.color_of(RoadId::Vertical), SignalColor::Red);
    assert_eq!(controller.color_of(RoadId::Horizontal), SignalColor::Red);
    assert_eq!(controller.virtual_time_elapsed(), 0.0);

    let depths = QueueDepths {
        vertical: 50,
        horizontal: 50,
    };
    let mut previous_remaining = controller.both_red_remaining();
    let mut switches = 0;
    for step in 1..=10 {
        let transition = controller.simulate(0.1, &depths);
        match transition {
            SignalTransition::Switched { green } => {
                assert_eq!(step, 10, "dwell ended early");
                assert_eq!(green, RoadId::Horizontal);
                switches += 1;
            }
            SignalTransition::None => {
                let remaining = controller.both_red_remaining();
                assert!(remaining < previous_remaining);
                previous_remaining = remaining;
                assert!(matches!(controller.phase(), SignalPhase::BothRed { .. }));
            }
            SignalTransition::BothRedStarted => panic!("toggled during dwell"),
        }
    }

    assert_eq!(switches, 1);
    assert_eq!(controller.color_of(RoadId::Vertical), SignalColor::Red);
    assert_eq!(controller.color_of(RoadId::Horizontal), SignalColor::Green);
    assert_eq!(controller.phase(), SignalPhase::GreenHorizontal);
    assert_eq!(controller.both_red_remaining(), 0.0);
}

#[test]
fn test_dwell_time_does_not_count_toward_green() {
    let mut controller =
        SignalController::new(SignalColor::Green, SignalColor::Red, reference_timing());
    let depths = QueueDepths::default();

    // Finish one full green (10s) plus the dwell (1s)
    assert_eq!(steps_until_toggle(&mut controller, 0.1, depths), 100);
    for _ in 0..10 {
        controller.simulate(0.1, &depths);
    }
    assert_eq!(controller.phase(), SignalPhase::GreenHorizontal);
    assert_eq!(controller.virtual_time_elapsed(), 0.0);

    // The next green again lasts the full maximum
    assert_eq!(steps_until_toggle(&mut controller, 0.1, depths), 100);
}

#[test]
fn test_never_both_green() {
    let mut controller =
        SignalController::new(SignalColor::Red, SignalColor::Red, reference_timing());

    for step in 0..5000usize {
        let depths = QueueDepths {
            vertical: (step / 7) % 9,
            horizontal: (step / 11) % 12,
        };
        controller.simulate(0.05, &depths);

        let vertical = controller.color_of(RoadId::Vertical);
        let horizontal = controller.color_of(RoadId::Horizontal);
        assert!(
            !(vertical == SignalColor::Green && horizontal == SignalColor::Green),
            "both green at step {step}"
        );
        if vertical == SignalColor::Red && horizontal == SignalColor::Red {
            assert!(matches!(controller.phase(), SignalPhase::BothRed { .. }));
        }
    }
}
