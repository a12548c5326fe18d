//! Vehicle state and per-vehicle movement rules

use super::config::FrameConfig;
use super::geometry::RoadGeometry;
use super::types::{Axis, LaneKind, Position, Road, VehicleId};

/// Where a vehicle is in its traversal of the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    /// Driving towards the stop line (through) or the turn point (turn)
    Approach,
    /// Released by a green, inside the box
    Crossing,
    /// Past the far side of the box
    Exiting,
    /// Left turn done, travelling along the turn axis
    Turned,
}

impl Maneuver {
    /// Whether the vehicle has been let through the stop line
    pub fn is_released(self) -> bool {
        matches!(self, Maneuver::Crossing | Maneuver::Exiting)
    }
}

/// What the motion step did to a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    Moved,
    /// Blocked by the leader gap or the stop line
    Held,
    /// Rotated onto the turn axis this tick
    Turned,
}

/// A vehicle in the intersection simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub position: Position,
    /// Pixels per tick, always positive
    pub speed: f32,
    pub road: Road,
    /// Zero-based lane index within the road
    pub lane: usize,
    pub lane_kind: LaneKind,
    pub maneuver: Maneuver,
    /// Set once the left turn completes
    pub turned_left: bool,
}

impl SimVehicle {
    pub fn new(
        id: VehicleId,
        position: Position,
        speed: f32,
        road: Road,
        lane: usize,
        lane_kind: LaneKind,
    ) -> Self {
        Self {
            id,
            position,
            speed,
            road,
            lane,
            lane_kind,
            maneuver: Maneuver::Approach,
            turned_left: false,
        }
    }

    /// Axis and sign the vehicle currently moves along
    pub fn heading(&self, geometry: &RoadGeometry) -> (Axis, f32) {
        match self.maneuver {
            Maneuver::Turned => (geometry.turn_axis, geometry.turn_sign),
            _ => (geometry.axis, geometry.sign),
        }
    }

    fn advance(&mut self, geometry: &RoadGeometry) {
        let (axis, sign) = self.heading(geometry);
        let coord = self.position.coord(axis);
        self.position.set_coord(axis, coord + sign * self.speed);
    }

    /// One tick of through-lane movement
    ///
    /// Unreleased vehicles stop at the stop line on red. A released vehicle
    /// snaps to `leader_lateral` when given so a flowing lane moves as a
    /// convoy.
    pub fn step_through(
        &mut self,
        geometry: &RoadGeometry,
        green: bool,
        leader_lateral: Option<f32>,
    ) -> VehicleUpdateResult {
        match self.maneuver {
            Maneuver::Approach => {
                // Already inside the box, e.g. spawned there
                if geometry.has_passed(&self.position, geometry.stop_line) {
                    self.maneuver = Maneuver::Crossing;
                    self.advance(geometry);
                    return VehicleUpdateResult::Moved;
                }

                let before = self.position.coord(geometry.axis);
                self.advance(geometry);

                if green {
                    if geometry.has_passed(&self.position, geometry.stop_line) {
                        self.maneuver = Maneuver::Crossing;
                    }
                    return VehicleUpdateResult::Moved;
                }

                if geometry.has_passed(&self.position, geometry.stop_line) {
                    self.position.set_coord(geometry.axis, geometry.stop_line);
                }
                if self.position.coord(geometry.axis) == before {
                    VehicleUpdateResult::Held
                } else {
                    VehicleUpdateResult::Moved
                }
            }
            Maneuver::Crossing | Maneuver::Exiting => {
                self.advance(geometry);
                if let Some(lateral) = leader_lateral {
                    self.position.set_coord(geometry.turn_axis, lateral);
                }
                if self.maneuver == Maneuver::Crossing
                    && geometry.has_passed(&self.position, geometry.box_exit)
                {
                    self.maneuver = Maneuver::Exiting;
                }
                VehicleUpdateResult::Moved
            }
            // Through vehicles never turn; keep going along whatever heading
            Maneuver::Turned => {
                self.advance(geometry);
                VehicleUpdateResult::Moved
            }
        }
    }

    /// One tick of turn-lane movement
    ///
    /// Drives straight until the turn point, lands exactly on it and marks
    /// the turn done. From the next tick on it moves along the turn axis.
    pub fn step_turn(&mut self, geometry: &RoadGeometry) -> VehicleUpdateResult {
        if self.maneuver == Maneuver::Turned {
            self.advance(geometry);
            return VehicleUpdateResult::Moved;
        }

        self.advance(geometry);
        if geometry.has_reached(&self.position, geometry.turn_at) {
            self.position.set_coord(geometry.axis, geometry.turn_at);
            self.maneuver = Maneuver::Turned;
            self.turned_left = true;
            return VehicleUpdateResult::Turned;
        }
        VehicleUpdateResult::Moved
    }

    /// Past the far edge of the frame in the current direction of travel
    pub fn has_left_frame(&self, geometry: &RoadGeometry, frame: &FrameConfig) -> bool {
        let (axis, sign) = self.heading(geometry);
        let coord = self.position.coord(axis);
        if sign > 0.0 {
            coord > frame.extent(axis)
        } else {
            coord < 0.0
        }
    }
}
