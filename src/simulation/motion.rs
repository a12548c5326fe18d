//! Motion engine: moves every queued vehicle by one tick
//!
//! Lanes are walked head to tail so each follower sees its leader's
//! position for this tick.

use log::debug;

use super::config::{RemovalPolicy, SimConfig};
use super::queue::QueueStore;
use super::signal::SignalController;
use super::types::{LaneKey, LaneKind, Position, VehicleId};
use super::vehicle::{Maneuver, SimVehicle, VehicleUpdateResult};

/// Per-lane outcome of a motion pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotionReport {
    /// Vehicles that completed their left turn this tick
    pub turned: Vec<VehicleId>,
    /// Vehicles removed from their queue this tick
    pub removed: Vec<VehicleId>,
}

impl MotionReport {
    fn merge(&mut self, other: MotionReport) {
        self.turned.extend(other.turned);
        self.removed.extend(other.removed);
    }
}

/// The part of a leader a follower needs
#[derive(Debug, Clone, Copy)]
struct LeaderView {
    position: Position,
    maneuver: Maneuver,
}

/// True when a follower may move given its leader's position
pub fn gap_allows_advance(leader: &Position, follower: &Position, following_distance: f32) -> bool {
    leader.distance(follower) >= following_distance
}

fn should_remove(vehicle: &SimVehicle, config: &SimConfig) -> bool {
    let geometry = config.geometry(vehicle.road);
    if vehicle.has_left_frame(geometry, &config.frame) {
        return true;
    }
    config.removal_policy == RemovalPolicy::ExitFrameOrTurnComplete && vehicle.turned_left
}

/// Move every vehicle of one lane, then apply the removal policy
pub fn advance_lane(
    store: &mut QueueStore,
    key: LaneKey,
    signals: &SignalController,
    config: &SimConfig,
) -> MotionReport {
    let mut report = MotionReport::default();
    let Some(kind) = config.lane_kind(key.lane) else {
        return report;
    };
    let Some(queue) = store.lane(key) else {
        return report;
    };

    let ids: Vec<VehicleId> = queue.iter().collect();
    let geometry = config.geometry(key.road);
    let green = signals.is_green(key.road);

    let mut leader: Option<LeaderView> = None;
    let mut finished = Vec::new();

    for id in ids {
        let Some(vehicle) = store.vehicle_mut(id) else {
            continue;
        };

        let may_move = leader.map_or(true, |ahead| {
            gap_allows_advance(&ahead.position, &vehicle.position, config.following_distance)
        });

        if may_move {
            let result = match kind {
                LaneKind::Through => {
                    let leader_lateral = leader
                        .filter(|ahead| vehicle.maneuver.is_released() && ahead.maneuver.is_released())
                        .map(|ahead| ahead.position.coord(geometry.turn_axis));
                    vehicle.step_through(geometry, green, leader_lateral)
                }
                LaneKind::Turn => vehicle.step_turn(geometry),
            };
            if result == VehicleUpdateResult::Turned {
                report.turned.push(id);
            }
        }

        if should_remove(vehicle, config) {
            finished.push(id);
        }

        leader = Some(LeaderView {
            position: vehicle.position,
            maneuver: vehicle.maneuver,
        });
    }

    for id in finished {
        let removed = if store.lane(key).and_then(|queue| queue.front()) == Some(id) {
            store.dequeue(key)
        } else {
            store.remove(key, id)
        };
        if removed.is_some() {
            debug!("Vehicle {:?} left lane {:?}", id, key);
            report.removed.push(id);
        }
    }

    report
}

/// Move every vehicle in every lane by one tick
pub fn advance_all(
    store: &mut QueueStore,
    signals: &SignalController,
    config: &SimConfig,
) -> MotionReport {
    let mut report = MotionReport::default();
    for key in store.lane_keys() {
        report.merge(advance_lane(store, key, signals, config));
    }
    report
}
