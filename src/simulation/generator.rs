//! Vehicle record generator
//!
//! Stands in for the external process that feeds the simulation. It writes
//! 4-field `lane,x,y,speed` records into each road's record file. New
//! vehicles join behind the last queued vehicle of their lane, or on the
//! frame edge the road enters from when that lane is clear, so a lane stays
//! ordered from the stop line back.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::config::SimConfig;
use super::queue::QueueStore;
use super::types::{LaneKey, Road};

/// Slowest generated speed in pixels per tick
pub const MIN_SPAWN_SPEED: u32 = 2;
/// Fastest generated speed in pixels per tick
pub const MAX_SPAWN_SPEED: u32 = 4;

/// Writes batches of random vehicle records
#[derive(Debug, Default)]
pub struct RecordGenerator {
    /// Optional seeded RNG for reproducible runs
    rng: Option<StdRng>,
}

impl RecordGenerator {
    pub fn new() -> Self {
        Self { rng: None }
    }

    /// Create a generator with a seeded RNG for reproducible runs
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    fn random_range(&mut self, range: std::ops::RangeInclusive<u32>) -> u32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Build `count` record lines for `road`, spread over its lanes
    ///
    /// Vehicles in the same lane are spaced one following distance apart,
    /// starting one following distance behind the lane's tail in `queues`.
    pub fn generate(
        &mut self,
        road: Road,
        count: usize,
        config: &SimConfig,
        queues: &QueueStore,
    ) -> Vec<String> {
        if config.lanes.is_empty() {
            return Vec::new();
        }

        let geometry = config.geometry(road);
        let entry = geometry.progress(&geometry.lane_position(&config.frame, 0.0, 0.0));

        // Distance behind the entry edge of the next free slot per lane
        let mut next_behind: Vec<f32> = (0..config.lanes.len())
            .map(|lane| {
                queues
                    .lane_vehicles(LaneKey::new(road, lane))
                    .last()
                    .map_or(0.0, |tail| {
                        let tail_progress = geometry.progress(&tail.position);
                        (entry - tail_progress + config.following_distance).max(0.0)
                    })
            })
            .collect();

        let mut lines = Vec::with_capacity(count);

        for _ in 0..count {
            let lane = self.random_range(0..=(config.lanes.len() as u32 - 1)) as usize;
            let behind = next_behind[lane];
            next_behind[lane] += config.following_distance;

            let position =
                geometry.lane_position(&config.frame, config.lanes[lane].lateral_offset, behind);
            let speed = self.random_range(MIN_SPAWN_SPEED..=MAX_SPAWN_SPEED) as f32;

            lines.push(format!(
                "{},{:.2},{:.2},{:.2}",
                lane + 1,
                position.x,
                position.y,
                speed
            ));
        }

        lines
    }

    /// Append freshly generated records for `road` to `path`
    ///
    /// Placement only sees vehicles already in `queues`. Records still
    /// waiting in the file are not taken into account.
    pub fn write_road(
        &mut self,
        road: Road,
        count: usize,
        path: &Path,
        config: &SimConfig,
        queues: &QueueStore,
    ) -> Result<usize> {
        let lines = self.generate(road, count, config, queues);
        append_records(path, &lines)?;
        Ok(lines.len())
    }
}

/// Whether `path` still holds records the simulation has not ingested
pub fn has_pending_records(path: &Path) -> bool {
    fs::metadata(path).map_or(false, |meta| meta.len() > 0)
}

/// Append record lines to a record file, creating it if needed
pub fn append_records(path: &Path, lines: &[String]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open record file {}", path.display()))?;

    for line in lines {
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write record file {}", path.display()))?;
    }
    Ok(())
}
