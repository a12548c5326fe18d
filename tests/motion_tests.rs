//! Vehicle motion tests: leader gap, stop line, turns and removal

use intersection_sim::simulation::{
    advance_lane, gap_allows_advance, LaneKey, Maneuver, Position, RemovalPolicy, Road, SimConfig,
    SimWorld, VehicleId,
};

const THROUGH: usize = 0;
const TURN: usize = 1;

/// World where `green` holds the green for the whole test
fn world_with_green(green: Road) -> SimWorld {
    let config = SimConfig {
        initial_green: Some(green),
        phase_duration: 1_000.0,
        ..SimConfig::default()
    };
    SimWorld::new(config)
}

fn lane_ids(world: &SimWorld, key: LaneKey) -> Vec<VehicleId> {
    world
        .queues
        .lane(key)
        .map(|queue| queue.iter().collect())
        .unwrap_or_default()
}

fn position_of(world: &SimWorld, id: VehicleId) -> Position {
    world.queues.vehicle(id).expect("vehicle exists").position
}

fn step_lane(world: &mut SimWorld, key: LaneKey) {
    advance_lane(&mut world.queues, key, &world.signals, &world.config);
}

#[test]
fn test_gap_rule_thresholds() {
    let leader = Position::new(425.0, 100.0);
    assert!(!gap_allows_advance(&leader, &Position::new(425.0, 65.0), 40.0));
    assert!(gap_allows_advance(&leader, &Position::new(425.0, 50.0), 40.0));
    assert!(gap_allows_advance(&leader, &Position::new(425.0, 60.0), 40.0));
}

#[test]
fn test_follower_holds_inside_following_distance() {
    // Leader parked on a red stop line at y=100
    let mut world = world_with_green(Road::B);
    world.config.geometry[Road::A.index()].stop_line = 100.0;
    let key = LaneKey::new(Road::A, THROUGH);

    assert!(world.spawn_vehicle(Road::A, THROUGH, 425.0, 100.0, 3.0));
    assert!(world.spawn_vehicle(Road::A, THROUGH, 425.0, 65.0, 3.0));
    let ids = lane_ids(&world, key);

    step_lane(&mut world, key);
    assert_eq!(position_of(&world, ids[0]).y, 100.0);
    assert_eq!(position_of(&world, ids[1]).y, 65.0);
}

#[test]
fn test_follower_advances_outside_following_distance() {
    let mut world = world_with_green(Road::B);
    world.config.geometry[Road::A.index()].stop_line = 100.0;
    let key = LaneKey::new(Road::A, THROUGH);

    assert!(world.spawn_vehicle(Road::A, THROUGH, 425.0, 100.0, 3.0));
    assert!(world.spawn_vehicle(Road::A, THROUGH, 425.0, 50.0, 3.0));
    let ids = lane_ids(&world, key);

    step_lane(&mut world, key);
    assert_eq!(position_of(&world, ids[0]).y, 100.0);
    assert_eq!(position_of(&world, ids[1]).y, 53.0);
}

#[test]
fn test_red_light_clamps_at_stop_line() {
    let mut world = world_with_green(Road::C);
    let key = LaneKey::new(Road::A, THROUGH);
    assert!(world.spawn_vehicle(Road::A, THROUGH, 425.0, 295.0, 10.0));
    let id = lane_ids(&world, key)[0];

    step_lane(&mut world, key);
    assert_eq!(position_of(&world, id).y, 300.0);
    step_lane(&mut world, key);
    assert_eq!(position_of(&world, id).y, 300.0);
    assert_eq!(
        world.queues.vehicle(id).map(|v| v.maneuver),
        Some(Maneuver::Approach)
    );
}

#[test]
fn test_green_light_releases_vehicle() {
    let mut world = world_with_green(Road::A);
    let key = LaneKey::new(Road::A, THROUGH);
    assert!(world.spawn_vehicle(Road::A, THROUGH, 425.0, 300.0, 4.0));
    let id = lane_ids(&world, key)[0];

    step_lane(&mut world, key);
    let vehicle = world.queues.vehicle(id).expect("vehicle");
    assert_eq!(vehicle.position.y, 304.0);
    assert_eq!(vehicle.maneuver, Maneuver::Crossing);
}

#[test]
fn test_through_vehicle_reaches_exit_segment() {
    let mut world = world_with_green(Road::A);
    let key = LaneKey::new(Road::A, THROUGH);
    assert!(world.spawn_vehicle(Road::A, THROUGH, 425.0, 495.0, 10.0));
    let id = lane_ids(&world, key)[0];

    step_lane(&mut world, key);
    assert_eq!(
        world.queues.vehicle(id).map(|v| v.maneuver),
        Some(Maneuver::Crossing)
    );
    step_lane(&mut world, key);
    assert_eq!(
        world.queues.vehicle(id).map(|v| v.maneuver),
        Some(Maneuver::Exiting)
    );
}

#[test]
fn test_follower_stops_at_red_even_behind_released_leader() {
    let mut world = world_with_green(Road::B);
    let key = LaneKey::new(Road::A, THROUGH);

    // Leader already in the box, follower just short of the line
    assert!(world.spawn_vehicle(Road::A, THROUGH, 425.0, 400.0, 5.0));
    assert!(world.spawn_vehicle(Road::A, THROUGH, 425.0, 298.0, 5.0));
    let ids = lane_ids(&world, key);

    step_lane(&mut world, key);
    assert_eq!(position_of(&world, ids[0]).y, 405.0);
    assert_eq!(position_of(&world, ids[1]).y, 300.0);
}

#[test]
fn test_released_follower_snaps_to_leader_lane_position() {
    let mut world = world_with_green(Road::A);
    let key = LaneKey::new(Road::A, THROUGH);
    assert!(world.spawn_vehicle(Road::A, THROUGH, 430.0, 600.0, 2.0));
    assert!(world.spawn_vehicle(Road::A, THROUGH, 420.0, 520.0, 2.0));
    let ids = lane_ids(&world, key);
    for id in &ids {
        if let Some(vehicle) = world.queues.vehicle_mut(*id) {
            vehicle.maneuver = Maneuver::Exiting;
        }
    }

    step_lane(&mut world, key);
    assert_eq!(position_of(&world, ids[0]), Position::new(430.0, 602.0));
    assert_eq!(position_of(&world, ids[1]), Position::new(430.0, 522.0));
}

#[test]
fn test_turn_lane_ignores_red() {
    let mut world = world_with_green(Road::C);
    let key = LaneKey::new(Road::A, TURN);
    assert!(world.spawn_vehicle(Road::A, TURN, 475.0, 100.0, 5.0));
    let id = lane_ids(&world, key)[0];

    step_lane(&mut world, key);
    assert_eq!(position_of(&world, id).y, 105.0);
}

#[test]
fn test_turn_changes_axis_after_threshold() {
    let mut world = world_with_green(Road::B);
    let key = LaneKey::new(Road::A, TURN);
    assert!(world.spawn_vehicle(Road::A, TURN, 475.0, 320.0, 10.0));
    let id = lane_ids(&world, key)[0];

    // Road A turns at y=325 and then heads towards +x
    let report = advance_lane(&mut world.queues, key, &world.signals, &world.config);
    assert_eq!(report.turned, vec![id]);
    let vehicle = world.queues.vehicle(id).expect("vehicle");
    assert_eq!(vehicle.position, Position::new(475.0, 325.0));
    assert!(vehicle.turned_left);

    step_lane(&mut world, key);
    assert_eq!(position_of(&world, id), Position::new(485.0, 325.0));
    step_lane(&mut world, key);
    assert_eq!(position_of(&world, id), Position::new(495.0, 325.0));
}

#[test]
fn test_every_road_turns_left() {
    let world = world_with_green(Road::A);
    // (approach axis sign, turn axis sign) pairs for a keep-left layout
    let expected = [
        (Road::A, 1.0, 1.0),
        (Road::B, -1.0, 1.0),
        (Road::C, -1.0, -1.0),
        (Road::D, 1.0, -1.0),
    ];
    for (road, sign, turn_sign) in expected {
        let geometry = world.config.geometry(road);
        assert_eq!(geometry.sign, sign, "road {}", road);
        assert_eq!(geometry.turn_sign, turn_sign, "road {}", road);
        assert_ne!(geometry.axis, geometry.turn_axis);
    }
}

#[test]
fn test_turn_on_road_b() {
    let mut world = world_with_green(Road::A);
    let key = LaneKey::new(Road::B, TURN);
    // Road B travels -x on y=475 and turns at x=475 towards +y
    assert!(world.spawn_vehicle(Road::B, TURN, 480.0, 475.0, 10.0));
    let id = lane_ids(&world, key)[0];

    step_lane(&mut world, key);
    assert_eq!(position_of(&world, id), Position::new(475.0, 475.0));
    step_lane(&mut world, key);
    assert_eq!(position_of(&world, id), Position::new(475.0, 485.0));
}

#[test]
fn test_vehicle_removed_after_leaving_frame() {
    let mut world = world_with_green(Road::A);
    let key = LaneKey::new(Road::A, THROUGH);
    assert!(world.spawn_vehicle(Road::A, THROUGH, 425.0, 795.0, 10.0));
    assert!(world.spawn_vehicle(Road::A, THROUGH, 425.0, 600.0, 10.0));
    let ids = lane_ids(&world, key);

    let report = advance_lane(&mut world.queues, key, &world.signals, &world.config);
    assert_eq!(report.removed, vec![ids[0]]);
    assert_eq!(lane_ids(&world, key), vec![ids[1]]);
    assert!(world.queues.vehicle(ids[0]).is_none());
}

#[test]
fn test_vehicle_before_entry_edge_is_kept() {
    let mut world = world_with_green(Road::A);
    let key = LaneKey::new(Road::C, THROUGH);
    // Road C enters from the bottom; y > 800 is upstream, not gone
    assert!(world.spawn_vehicle(Road::C, THROUGH, 375.0, 900.0, 2.0));

    let report = advance_lane(&mut world.queues, key, &world.signals, &world.config);
    assert!(report.removed.is_empty());
    assert_eq!(world.queues.len(key), 1);
}

#[test]
fn test_turned_vehicle_kept_under_exit_frame_policy() {
    let mut world = world_with_green(Road::A);
    let key = LaneKey::new(Road::A, TURN);
    assert!(world.spawn_vehicle(Road::A, TURN, 475.0, 320.0, 10.0));

    let report = advance_lane(&mut world.queues, key, &world.signals, &world.config);
    assert_eq!(report.turned.len(), 1);
    assert!(report.removed.is_empty());
    assert_eq!(world.queues.len(key), 1);
}

#[test]
fn test_turned_vehicle_removed_under_turn_complete_policy() {
    let mut world = world_with_green(Road::A);
    world.config.removal_policy = RemovalPolicy::ExitFrameOrTurnComplete;
    let key = LaneKey::new(Road::A, TURN);
    assert!(world.spawn_vehicle(Road::A, TURN, 475.0, 320.0, 10.0));
    let id = lane_ids(&world, key)[0];

    let report = advance_lane(&mut world.queues, key, &world.signals, &world.config);
    assert_eq!(report.turned, vec![id]);
    assert_eq!(report.removed, vec![id]);
    assert!(world.queues.is_empty(key));
}
