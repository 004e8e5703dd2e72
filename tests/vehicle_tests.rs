//! Vehicle state machine: stop-line arbitration and car following

use traffic_signal_sim::simulation::{
    LaneSide, Position, RoadId, SignalColor, SimConfig, SimId, SimVehicle, VehicleId,
    VehicleState,
};

/// 11.11 m/s * 0.05 s * 10 px/m = 5.555 px per step
const DT: f32 = 0.05;

fn vertical_vehicle(id: usize, y: f32, config: &SimConfig) -> SimVehicle {
    SimVehicle::new(
        VehicleId(SimId(id)),
        RoadId::Vertical,
        LaneSide::Left,
        Position::new(570.0, y),
        config,
    )
}

fn step(
    vehicle: &mut SimVehicle,
    signal: SignalColor,
    ahead: Option<&SimVehicle>,
    config: &SimConfig,
) {
    let planned = vehicle.plan(signal, ahead, DT, config);
    vehicle.apply(planned);
}

#[test]
fn test_dimensions_follow_road_orientation() {
    let config = SimConfig::default();
    let vertical = vertical_vehicle(0, 720.0, &config);
    assert_eq!((vertical.width, vertical.height), (60.0, 80.0));
    assert_eq!(vertical.length(), 80.0);
    assert_eq!(vertical.stop_line_position, 440.0);

    let horizontal = SimVehicle::new(
        VehicleId(SimId(1)),
        RoadId::Horizontal,
        LaneSide::Right,
        Position::new(1280.0, 290.0),
        &config,
    );
    assert_eq!((horizontal.width, horizontal.height), (80.0, 60.0));
    assert_eq!(horizontal.stop_line_position, 720.0);
}

#[test]
fn test_green_moves_along_travel_axis() {
    let config = SimConfig::default();
    let mut vehicle = vertical_vehicle(0, 700.0, &config);
    step(&mut vehicle, SignalColor::Green, None, &config);

    assert_eq!(vehicle.state, VehicleState::Moving);
    assert_eq!(vehicle.position.x, 570.0);
    assert!((vehicle.position.y - (700.0 - 5.555)).abs() < 1e-3);

    let mut horizontal = SimVehicle::new(
        VehicleId(SimId(1)),
        RoadId::Horizontal,
        LaneSide::Left,
        Position::new(1000.0, 370.0),
        &config,
    );
    step(&mut horizontal, SignalColor::Green, None, &config);
    assert_eq!(horizontal.position.y, 370.0);
    assert!(horizontal.position.x < 1000.0);
}

#[test]
fn test_red_snaps_vehicle_to_stop_line() {
    let config = SimConfig::default();
    let mut vehicle = vertical_vehicle(0, 444.0, &config);
    step(&mut vehicle, SignalColor::Red, None, &config);

    assert_eq!(vehicle.state, VehicleState::Waiting);
    assert_eq!(vehicle.front(), 440.0);
    assert_eq!(vehicle.position.x, 570.0);
}

#[test]
fn test_waiting_at_stop_line_is_frozen() {
    let config = SimConfig::default();
    let mut vehicle = vertical_vehicle(0, 440.0, &config);

    for _ in 0..20 {
        step(&mut vehicle, SignalColor::Red, None, &config);
        assert_eq!(vehicle.state, VehicleState::Waiting);
        assert_eq!(vehicle.front(), 440.0);
    }

    step(&mut vehicle, SignalColor::Green, None, &config);
    assert_eq!(vehicle.state, VehicleState::Moving);
    assert!(vehicle.front() < 440.0);
}

#[test]
fn test_tolerance_band_holds_vehicle() {
    let config = SimConfig::default();
    let mut vehicle = vertical_vehicle(0, 438.0, &config);
    step(&mut vehicle, SignalColor::Red, None, &config);
    assert_eq!(vehicle.state, VehicleState::Waiting);
    assert_eq!(vehicle.front(), 438.0);
}

#[test]
fn test_vehicle_past_stop_line_ignores_red() {
    let config = SimConfig::default();
    let mut vehicle = vertical_vehicle(0, 400.0, &config);

    for _ in 0..10 {
        let before = vehicle.front();
        step(&mut vehicle, SignalColor::Red, None, &config);
        assert_eq!(vehicle.state, VehicleState::Moving);
        assert!(vehicle.front() < before);
    }
}

#[test]
fn test_approaching_vehicle_keeps_moving_on_red() {
    let config = SimConfig::default();
    let mut vehicle = vertical_vehicle(0, 600.0, &config);
    step(&mut vehicle, SignalColor::Red, None, &config);
    assert_eq!(vehicle.state, VehicleState::Moving);
    assert!(vehicle.front() < 600.0);
}

#[test]
fn test_rear_vehicle_stops_when_gap_reaches_minimum() {
    let config = SimConfig::default();
    let min_gap = config.min_following_gap_px();

    // Ahead rear edge at 680, rear vehicle 20px behind it
    let mut ahead = vertical_vehicle(0, 600.0, &config);
    ahead.state = VehicleState::Waiting;
    let mut rear = vertical_vehicle(1, 700.0, &config);
    assert_eq!(rear.gap_to(&ahead), 20.0);

    let mut ticks = 0;
    loop {
        ticks += 1;
        let gap_before = rear.gap_to(&ahead);
        step(&mut rear, SignalColor::Green, Some(&ahead), &config);

        if rear.state == VehicleState::Waiting {
            assert!(gap_before - 5.555 <= min_gap, "stopped early with gap {gap_before}");
            break;
        }
        assert!(rear.gap_to(&ahead) > min_gap, "moved inside the gap");
        assert!(ticks < 10, "rear vehicle never stopped");
    }

    // 20px -> 14.4px, then the next move would end at 8.9px so it stops at 10px
    assert_eq!(ticks, 2);
    assert_eq!(rear.front(), 690.0);
    assert_eq!(rear.gap_to(&ahead), min_gap);

    let frozen = rear.front();
    step(&mut rear, SignalColor::Green, Some(&ahead), &config);
    assert_eq!(rear.state, VehicleState::Waiting);
    assert_eq!(rear.front(), frozen);
}

#[test]
fn test_long_step_never_closes_inside_following_gap() {
    let config = SimConfig::default();
    let min_gap = config.min_following_gap_px();
    // 3x speed at 20 fps: 16.665px per step, more than the 10px gap
    let dt = 0.15;

    let mut ahead = vertical_vehicle(0, 440.0, &config);
    ahead.state = VehicleState::Waiting;
    let mut rear = vertical_vehicle(1, 720.0, &config);

    for _ in 0..40 {
        let planned = rear.plan(SignalColor::Red, Some(&ahead), dt, &config);
        rear.apply(planned);
        assert!(rear.gap_to(&ahead) >= min_gap, "gap {}", rear.gap_to(&ahead));
    }

    assert_eq!(rear.state, VehicleState::Waiting);
    assert_eq!(rear.front(), 530.0);
}

#[test]
fn test_hold_behind_never_moves_backwards() {
    let config = SimConfig::default();
    let rear = vertical_vehicle(1, 525.0, &config);

    // Already 5px behind a rear edge at 520: stays put and waits
    let planned = rear.plan(SignalColor::Green, None, DT, &config);
    let held = rear.hold_behind(planned, 520.0, &config);
    assert_eq!(held.state, VehicleState::Waiting);
    assert_eq!(held.position.y, 525.0);

    // Far enough back: the step is untouched
    let far = vertical_vehicle(2, 600.0, &config);
    let planned = far.plan(SignalColor::Green, None, DT, &config);
    assert_eq!(far.hold_behind(planned, 520.0, &config), planned);
}

#[test]
fn test_moving_vehicle_ahead_does_not_stop_follower() {
    let config = SimConfig::default();
    let ahead = vertical_vehicle(0, 600.0, &config);
    let mut rear = vertical_vehicle(1, 685.0, &config);
    assert!(rear.gap_to(&ahead) < config.min_following_gap_px());

    step(&mut rear, SignalColor::Green, Some(&ahead), &config);
    assert_eq!(rear.state, VehicleState::Moving);
}

#[test]
fn test_queue_propagates_past_stop_line() {
    let config = SimConfig::default();
    // Both vehicles already past the line; the ahead one is stuck in a queue
    let mut ahead = vertical_vehicle(0, 200.0, &config);
    ahead.state = VehicleState::Waiting;
    let mut rear = vertical_vehicle(1, 285.0, &config);

    step(&mut rear, SignalColor::Red, Some(&ahead), &config);
    assert_eq!(rear.state, VehicleState::Waiting);
    assert_eq!(rear.front(), 285.0);
}

#[test]
fn test_off_screen_once_fully_past_top_edge() {
    let config = SimConfig::default();
    assert!(!vertical_vehicle(0, -79.0, &config).is_off_screen());
    assert!(vertical_vehicle(0, -80.0, &config).is_off_screen());
}
