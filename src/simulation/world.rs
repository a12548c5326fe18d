//! Main simulation world that ties everything together
//!
//! One tick: update the signals, ingest records for every road, then move
//! every lane. Ingestion for all roads finishes before any vehicle moves.

use log::{debug, info, warn};

use super::config::SimConfig;
use super::ingestion::{self, IngestReport};
use super::motion;
use super::queue::QueueStore;
use super::signal::SignalController;
use super::snapshot::{SignalView, SimSnapshot, VehicleView};
use super::types::{LaneKey, LaneKind, Position, Road};
use super::vehicle::SimVehicle;

/// Running totals for a simulation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimStats {
    pub vehicles_ingested: usize,
    pub records_malformed: usize,
    /// Records lost to full lanes
    pub records_dropped: usize,
    pub vehicles_removed: usize,
    pub vehicles_turned: usize,
    pub phase_changes: usize,
    /// Ingestion passes that failed on an unreadable or unwritable file
    pub ingest_failures: usize,
}

/// The main simulation world
pub struct SimWorld {
    pub config: SimConfig,

    /// Lane queues and the vehicles in them
    pub queues: QueueStore,

    pub signals: SignalController,

    pub stats: SimStats,

    /// Ticks run so far
    pub tick_count: u64,

    /// Simulation time in seconds
    pub time: f32,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl SimWorld {
    pub fn new(config: SimConfig) -> Self {
        let queues = QueueStore::new(config.lanes.len(), config.queue_capacity);
        let signals = SignalController::new(config.phase_duration, config.initial_green);
        Self {
            config,
            queues,
            signals,
            stats: SimStats::default(),
            tick_count: 0,
            time: 0.0,
        }
    }

    /// Queue a vehicle directly, bypassing the record files
    ///
    /// Returns false when the lane is unknown or full.
    pub fn spawn_vehicle(
        &mut self,
        road: Road,
        lane: usize,
        x: f32,
        y: f32,
        speed: f32,
    ) -> bool {
        let Some(lane_kind) = self.config.lane_kind(lane) else {
            return false;
        };
        if !speed.is_finite() || speed <= 0.0 {
            return false;
        }
        let id = self.queues.next_vehicle_id();
        let vehicle = SimVehicle::new(id, Position::new(x, y), speed, road, lane, lane_kind);
        self.queues.enqueue(LaneKey::new(road, lane), vehicle)
    }

    /// Run one ingestion pass over every road's record file
    ///
    /// A road whose file cannot be read or truncated is skipped for this
    /// pass; the others still run.
    pub fn ingest_all(&mut self) -> IngestReport {
        let mut total = IngestReport::default();

        for road in Road::ALL {
            let path = self.config.record_path(road);
            match ingestion::ingest_road(road, &path, &mut self.queues, &self.config) {
                Ok(report) => {
                    if report.accepted > 0 || report.malformed > 0 || report.dropped > 0 {
                        debug!(
                            "Road {}: accepted={}, malformed={}, dropped={}",
                            road, report.accepted, report.malformed, report.dropped
                        );
                    }
                    total.merge(report);
                }
                Err(e) => {
                    warn!("Skipping ingestion for road {}: {:#}", road, e);
                    self.stats.ingest_failures += 1;
                }
            }
        }

        self.stats.vehicles_ingested += total.accepted;
        self.stats.records_malformed += total.malformed;
        self.stats.records_dropped += total.dropped;
        total
    }

    fn should_ingest(&self) -> bool {
        let every = u64::from(self.config.ingest_every_ticks.max(1));
        self.tick_count % every == 0
    }

    /// Main simulation tick
    pub fn tick(&mut self, delta_secs: f32) {
        self.tick_count += 1;
        self.time += delta_secs;

        if let Some(change) = self.signals.update(delta_secs) {
            self.stats.phase_changes += 1;
            debug!(
                "Tick {}: road {} green (was {:?})",
                self.tick_count, change.to, change.from
            );
        }

        if self.should_ingest() {
            self.ingest_all();
        }

        let report = motion::advance_all(&mut self.queues, &self.signals, &self.config);
        self.stats.vehicles_turned += report.turned.len();
        self.stats.vehicles_removed += report.removed.len();
    }

    /// Tick until `keep_running` returns false, then shut down
    pub fn run_until<F>(&mut self, delta_secs: f32, mut keep_running: F)
    where
        F: FnMut(&SimWorld) -> bool,
    {
        while keep_running(self) {
            self.tick(delta_secs);
        }
        self.shutdown();
    }

    /// Release every queued vehicle
    pub fn shutdown(&mut self) -> usize {
        let released = self.queues.clear();
        info!("Released {} queued vehicles", released);
        released
    }

    /// Current state for renderers
    pub fn snapshot(&self) -> SimSnapshot {
        let signals = Road::ALL
            .iter()
            .map(|&road| SignalView {
                road,
                state: self.signals.state(road),
            })
            .collect();

        let vehicles = self
            .queues
            .vehicles()
            .map(|vehicle| VehicleView {
                id: vehicle.id,
                road: vehicle.road,
                lane: vehicle.lane,
                lane_kind: vehicle.lane_kind,
                position: vehicle.position,
                turned_left: vehicle.turned_left,
            })
            .collect();

        SimSnapshot {
            tick: self.tick_count,
            time: self.time,
            frame: self.config.frame,
            signals,
            vehicles,
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Intersection Simulation Summary ===");
        println!("Tick: {}, Time: {:.2}s", self.tick_count, self.time);
        println!(
            "Green: {}, phase elapsed {:.1}/{:.1}s",
            self.signals
                .green_road()
                .map_or_else(|| "none".to_string(), |road| road.to_string()),
            self.signals.elapsed(),
            self.signals.phase_duration()
        );
        println!("Vehicles queued: {}", self.queues.vehicle_count());

        println!("--- Lanes ---");
        for key in self.queues.lane_keys() {
            let kind = self
                .config
                .lane_kind(key.lane)
                .map_or("?", |kind| match kind {
                    LaneKind::Through => "through",
                    LaneKind::Turn => "turn",
                });
            let head = self
                .queues
                .front(key)
                .map(|vehicle| format!("({:.1}, {:.1})", vehicle.position.x, vehicle.position.y))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  Road {} lane {} [{}]: {} vehicles, head {}",
                key.road,
                key.lane + 1,
                kind,
                self.queues.len(key),
                head
            );
        }
    }

    /// Log the end-of-run statistics
    pub fn log_stats(&self) {
        let stats = &self.stats;
        info!("=== SIMULATION COMPLETE ===");
        info!("Ticks: {}", self.tick_count);
        info!("Elapsed time: {:.2}s", self.time);
        info!("Vehicles ingested: {}", stats.vehicles_ingested);
        info!("Vehicles removed: {}", stats.vehicles_removed);
        info!("Vehicles turned: {}", stats.vehicles_turned);
        info!("Malformed records: {}", stats.records_malformed);
        info!("Dropped records: {}", stats.records_dropped);
        info!("Phase changes: {}", stats.phase_changes);
        if stats.ingest_failures > 0 {
            warn!("Failed ingestion passes: {}", stats.ingest_failures);
        }
    }
}
