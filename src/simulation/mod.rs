//! Standalone intersection simulation module
//!
//! This module contains the simulation core: signal phases, lane queues,
//! record ingestion and vehicle motion. Rendering only ever sees a
//! [`SimSnapshot`].

mod config;
mod generator;
mod geometry;
mod ingestion;
mod motion;
mod queue;
mod signal;
mod snapshot;
mod types;
mod vehicle;
mod world;

pub use config::{
    FrameConfig, LaneSpec, RecordFormat, RemovalPolicy, SimConfig, DEFAULT_FOLLOWING_DISTANCE,
    DEFAULT_PHASE_DURATION, DEFAULT_RECORDS_DIR, FRAME_HEIGHT, FRAME_WIDTH, ROAD_HALF_WIDTH,
    THROUGH_LANE_OFFSET, TURN_LANE_OFFSET,
};
pub use generator::{
    append_records, has_pending_records, RecordGenerator, MAX_SPAWN_SPEED, MIN_SPAWN_SPEED,
};
pub use geometry::RoadGeometry;
pub use ingestion::{ingest_records, ingest_road, parse_record, IngestReport, VehicleRecord};
pub use motion::{advance_all, advance_lane, gap_allows_advance, MotionReport};
pub use queue::{LaneQueue, QueueStore};
pub use signal::{PhaseChange, SignalController};
pub use snapshot::{SignalView, SimSnapshot, VehicleView};
pub use types::{Axis, LaneKey, LaneKind, LightState, Position, Road, SimId, VehicleId};
pub use vehicle::{Maneuver, SimVehicle, VehicleUpdateResult};
pub use world::{SimStats, SimWorld};
