//! Per-road geometry of the intersection
//!
//! Every road approaches the box from a different side, so "forward" means
//! +y for one road and -x for another. All movement rules are written once
//! against a [`RoadGeometry`] instead of once per road.

use super::config::FrameConfig;
use super::types::{Axis, Position, Road};

/// Orientation and threshold coordinates for one road
///
/// Thresholds are world coordinates on the relevant axis. A coordinate has
/// "passed" a threshold when it lies beyond it in the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadGeometry {
    /// Axis vehicles travel along while approaching
    pub axis: Axis,
    /// +1.0 when approaching means increasing coordinate, -1.0 otherwise
    pub sign: f32,
    /// Coordinate of the stop line on `axis`
    pub stop_line: f32,
    /// Coordinate of the far side of the box on `axis`
    pub box_exit: f32,
    /// Coordinate on `axis` where turn-lane vehicles rotate
    pub turn_at: f32,
    /// Axis of travel after a left turn
    pub turn_axis: Axis,
    /// Direction of travel along `turn_axis` after a left turn
    pub turn_sign: f32,
    /// Road centreline on the lateral axis (`turn_axis`)
    pub lateral_center: f32,
}

impl RoadGeometry {
    /// Geometry for a road of a square-symmetric intersection
    ///
    /// The box spans `road_half_width` on each side of the frame centre.
    /// Traffic keeps left, so a left turn is the short turn and the turn
    /// lane sits `turn_lane_offset` from the centreline on the driver's left.
    pub fn symmetric(road: Road, frame: &FrameConfig, turn_lane_offset: f32) -> Self {
        let (axis, sign) = match road {
            Road::A => (Axis::Y, 1.0),
            Road::B => (Axis::X, -1.0),
            Road::C => (Axis::Y, -1.0),
            Road::D => (Axis::X, 1.0),
        };

        // Driver's left in a y-down frame
        let turn_axis = axis.other();
        let turn_sign = match axis {
            Axis::Y => sign,
            Axis::X => -sign,
        };

        let center = frame.center(axis);
        let half = frame.road_half_width;

        Self {
            axis,
            sign,
            stop_line: center - sign * half,
            box_exit: center + sign * half,
            turn_at: center - sign * turn_lane_offset,
            turn_axis,
            turn_sign,
            lateral_center: frame.center(turn_axis),
        }
    }

    /// Progress of `position` along the approach direction
    pub fn progress(&self, position: &Position) -> f32 {
        self.sign * position.coord(self.axis)
    }

    /// Strictly beyond `threshold` in the direction of travel
    pub fn has_passed(&self, position: &Position, threshold: f32) -> bool {
        self.progress(position) > self.sign * threshold
    }

    /// At or beyond `threshold` in the direction of travel
    pub fn has_reached(&self, position: &Position, threshold: f32) -> bool {
        self.progress(position) >= self.sign * threshold
    }

    /// Spawn position for a lane `lateral_offset` left of the centreline,
    /// `behind_entry` pixels before the frame edge the road enters from
    pub fn lane_position(
        &self,
        frame: &FrameConfig,
        lateral_offset: f32,
        behind_entry: f32,
    ) -> Position {
        let entry = if self.sign > 0.0 {
            0.0
        } else {
            frame.extent(self.axis)
        };

        let mut position = Position::default();
        position.set_coord(self.axis, entry - self.sign * behind_entry);
        position.set_coord(
            self.turn_axis,
            self.lateral_center + self.turn_sign * lateral_offset,
        );
        position
    }
}
