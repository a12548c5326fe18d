//! Simulation parameters
//!
//! Every tunable of the simulation lives in [`SimConfig`]. The defaults are
//! the named constants below.

use std::path::PathBuf;

use super::geometry::RoadGeometry;
use super::types::{Axis, LaneKind, Road};

/// Width of the intersection frame in pixels
pub const FRAME_WIDTH: f32 = 800.0;
/// Height of the intersection frame in pixels
pub const FRAME_HEIGHT: f32 = 800.0;
/// Half the width of each road; the box spans 300..500 on both axes
pub const ROAD_HALF_WIDTH: f32 = 100.0;

/// Seconds of simulated time each road keeps the green
pub const DEFAULT_PHASE_DURATION: f32 = 5.0;
/// Minimum gap a follower keeps to its leader, in pixels
pub const DEFAULT_FOLLOWING_DISTANCE: f32 = 40.0;

/// Lateral offset of the through lane from the road centreline
pub const THROUGH_LANE_OFFSET: f32 = 25.0;
/// Lateral offset of the turn lane from the road centreline
pub const TURN_LANE_OFFSET: f32 = 75.0;

/// Directory holding the per-road record files
pub const DEFAULT_RECORDS_DIR: &str = "records";

/// Size of the intersection frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameConfig {
    pub width: f32,
    pub height: f32,
    pub road_half_width: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            road_half_width: ROAD_HALF_WIDTH,
        }
    }
}

impl FrameConfig {
    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    pub fn center(&self, axis: Axis) -> f32 {
        self.extent(axis) / 2.0
    }
}

/// One lane of a road
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneSpec {
    pub kind: LaneKind,
    /// Distance left of the road centreline, used when spawning vehicles
    pub lateral_offset: f32,
}

/// Which record shapes the ingestion adapter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFormat {
    /// `lane,x,y,speed`
    FourField,
    /// `road,lane,x,y,speed`
    FiveField,
    /// Either shape, chosen by field count
    #[default]
    Auto,
}

/// When a vehicle leaves its lane queue. Applies to every road and lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPolicy {
    /// Once it passes the far edge of the frame
    #[default]
    ExitFrame,
    /// Once it passes the far edge, or as soon as its left turn completes
    ExitFrameOrTurnComplete,
}

/// Full configuration of a simulation run
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub frame: FrameConfig,
    /// Seconds per green; must be positive, the signal controller falls back
    /// to [`DEFAULT_PHASE_DURATION`] otherwise
    pub phase_duration: f32,
    pub following_distance: f32,
    /// Lanes of every road; record lane numbers are 1-based indices here
    pub lanes: Vec<LaneSpec>,
    /// Geometry per road, indexed by [`Road::index`]
    pub geometry: [RoadGeometry; 4],
    /// Maximum vehicles per lane queue; `None` is unbounded
    pub queue_capacity: Option<usize>,
    /// Run ingestion every this many ticks
    pub ingest_every_ticks: u32,
    pub record_format: RecordFormat,
    pub removal_policy: RemovalPolicy,
    /// Road that starts green; `None` starts all red
    pub initial_green: Option<Road>,
    pub records_dir: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        let frame = FrameConfig::default();
        Self {
            frame,
            phase_duration: DEFAULT_PHASE_DURATION,
            following_distance: DEFAULT_FOLLOWING_DISTANCE,
            lanes: vec![
                LaneSpec {
                    kind: LaneKind::Through,
                    lateral_offset: THROUGH_LANE_OFFSET,
                },
                LaneSpec {
                    kind: LaneKind::Turn,
                    lateral_offset: TURN_LANE_OFFSET,
                },
            ],
            geometry: Road::ALL.map(|road| RoadGeometry::symmetric(road, &frame, TURN_LANE_OFFSET)),
            queue_capacity: None,
            ingest_every_ticks: 1,
            record_format: RecordFormat::Auto,
            removal_policy: RemovalPolicy::ExitFrame,
            initial_green: Some(Road::A),
            records_dir: PathBuf::from(DEFAULT_RECORDS_DIR),
        }
    }
}

impl SimConfig {
    pub fn geometry(&self, road: Road) -> &RoadGeometry {
        &self.geometry[road.index()]
    }

    pub fn lane_kind(&self, lane: usize) -> Option<LaneKind> {
        self.lanes.get(lane).map(|lane| lane.kind)
    }

    /// Path of the record file for a road, e.g. `records/laneA.txt`
    pub fn record_path(&self, road: Road) -> PathBuf {
        self.records_dir.join(format!("lane{}.txt", road.letter()))
    }
}
