//! Read-only view of the simulation for renderers
//!
//! A renderer gets everything it needs to draw a frame from a
//! [`SimSnapshot`] and never touches the queues directly.

use super::config::FrameConfig;
use super::types::{LaneKind, LightState, Position, Road, VehicleId};

/// Pixels per terminal character in [`SimSnapshot::draw_map`]
const MAP_CELL_SIZE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalView {
    pub road: Road,
    pub state: LightState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleView {
    pub id: VehicleId,
    pub road: Road,
    /// Zero-based lane index
    pub lane: usize,
    pub lane_kind: LaneKind,
    pub position: Position,
    pub turned_left: bool,
}

/// State of the intersection after a tick
#[derive(Debug, Clone, PartialEq)]
pub struct SimSnapshot {
    pub tick: u64,
    /// Simulated seconds
    pub time: f32,
    pub frame: FrameConfig,
    pub signals: Vec<SignalView>,
    pub vehicles: Vec<VehicleView>,
}

impl SimSnapshot {
    pub fn signal(&self, road: Road) -> Option<LightState> {
        self.signals
            .iter()
            .find(|signal| signal.road == road)
            .map(|signal| signal.state)
    }

    pub fn vehicles_on(&self, road: Road) -> impl Iterator<Item = &VehicleView> + '_ {
        self.vehicles.iter().filter(move |vehicle| vehicle.road == road)
    }

    /// Draw the frame as text in the terminal
    ///
    /// Roads are `.`, vehicles are their road letter (lower case in a turn
    /// lane). The signal line lists each road's light.
    pub fn draw_map(&self) {
        let cols = (self.frame.width / MAP_CELL_SIZE).ceil() as usize;
        let rows = (self.frame.height / MAP_CELL_SIZE).ceil() as usize;
        if cols == 0 || rows == 0 {
            return;
        }

        let mut grid = vec![vec![' '; cols]; rows];

        let center_x = self.frame.width / 2.0;
        let center_y = self.frame.height / 2.0;
        let half = self.frame.road_half_width;
        for (row, line) in grid.iter_mut().enumerate() {
            for (col, cell) in line.iter_mut().enumerate() {
                let x = (col as f32 + 0.5) * MAP_CELL_SIZE;
                let y = (row as f32 + 0.5) * MAP_CELL_SIZE;
                if (x - center_x).abs() < half || (y - center_y).abs() < half {
                    *cell = '.';
                }
            }
        }

        for vehicle in &self.vehicles {
            let Position { x, y } = vehicle.position;
            if x < 0.0 || y < 0.0 || x >= self.frame.width || y >= self.frame.height {
                continue;
            }
            let col = ((x / MAP_CELL_SIZE) as usize).min(cols - 1);
            let row = ((y / MAP_CELL_SIZE) as usize).min(rows - 1);
            let letter = vehicle.road.letter();
            grid[row][col] = match vehicle.lane_kind {
                LaneKind::Through => letter,
                LaneKind::Turn => letter.to_ascii_lowercase(),
            };
        }

        let lights: Vec<String> = self
            .signals
            .iter()
            .map(|signal| {
                let state = match signal.state {
                    LightState::Green => "GREEN",
                    LightState::Red => "red",
                };
                format!("{}={}", signal.road, state)
            })
            .collect();

        println!("\n=== Intersection Map (tick {}, {:.1}s) ===", self.tick, self.time);
        println!("Signals: {}", lights.join("  "));
        println!("Legend: .=Road, A-D=Through vehicle, a-d=Turn vehicle");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
